use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self, ValidationError};

/// Registered patient. `id_number` is the clinic-facing identifier used
/// for lookups; `id` is the internal key other records reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub id_number: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration payload for `POST /patients`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub id_number: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl NewPatient {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        validation::require("idNumber", &self.id_number)?;
        validation::require("firstName", &self.first_name)?;
        validation::require("lastName", &self.last_name)?;
        if let Some(dob) = self.date_of_birth {
            validation::not_in_future("dateOfBirth", dob, today)?;
        }
        Ok(())
    }
}

/// Name fields inlined into appointment listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientName {
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn deserializes_camel_case_with_optional_fields() {
        let p: NewPatient = serde_json::from_str(
            r#"{"idNumber":"P123","firstName":"Ana","lastName":"Mensah"}"#,
        )
        .unwrap();
        assert_eq!(p.id_number, "P123");
        assert!(p.date_of_birth.is_none());
        assert!(p.validate(today()).is_ok());
    }

    #[test]
    fn blank_id_number_rejected() {
        let p = NewPatient {
            id_number: " ".into(),
            first_name: "Ana".into(),
            last_name: "Mensah".into(),
            date_of_birth: None,
            phone_number: None,
        };
        assert_eq!(p.validate(today()).unwrap_err().field, "idNumber");
    }

    #[test]
    fn future_birth_date_rejected() {
        let p = NewPatient {
            id_number: "P1".into(),
            first_name: "Ana".into(),
            last_name: "Mensah".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2030, 1, 1),
            phone_number: None,
        };
        assert_eq!(p.validate(today()).unwrap_err().field, "dateOfBirth");
    }
}
