use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self, ValidationError};

/// A doctor-attributed visit note for a registered patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: String,
    pub visit_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /patients/:idNumber/medical-history`.
/// `visitDate` defaults to the day the entry is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicalHistory {
    pub doctor_id: String,
    #[serde(default)]
    pub visit_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewMedicalHistory {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require("doctorId", &self.doctor_id)
    }
}
