use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patient::PatientName;
use super::validation::{self, ValidationError};

/// A scheduled encounter between a patient and a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub doctor: String,
    pub reason: String,
}

/// Appointment with the referenced patient's name inlined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetail {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient: PatientName,
}

/// Booking payload for `POST /appointments`. The patient is addressed by
/// their clinic `idNumber`, resolved server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub id_number: String,
    pub date: NaiveDate,
    pub time: String,
    pub doctor: String,
    pub reason: String,
}

impl NewAppointment {
    /// Check required fields and rewrite `time` to zero-padded `HH:MM`.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validation::require("idNumber", &self.id_number)?;
        self.time = validation::canonical_clock_time("time", &self.time)?;
        validation::require("doctor", &self.doctor)?;
        validation::require("reason", &self.reason)?;
        Ok(())
    }
}

/// Body of `PUT /appointments/:id`. Only these fields may change;
/// anything else in the body is rejected at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppointmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// One permitted field change on an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentChange {
    Date(NaiveDate),
    Time(String),
    Doctor(String),
    Reason(String),
}

impl AppointmentChange {
    pub fn apply(&self, appointment: &mut Appointment) {
        match self {
            AppointmentChange::Date(date) => appointment.date = *date,
            AppointmentChange::Time(time) => appointment.time = time.clone(),
            AppointmentChange::Doctor(doctor) => appointment.doctor = doctor.clone(),
            AppointmentChange::Reason(reason) => appointment.reason = reason.clone(),
        }
    }
}

impl AppointmentPatch {
    /// Validate each present field and turn the patch into change commands.
    pub fn into_changes(self) -> Result<Vec<AppointmentChange>, ValidationError> {
        let mut changes = Vec::new();
        if let Some(date) = self.date {
            changes.push(AppointmentChange::Date(date));
        }
        if let Some(time) = self.time {
            let time = validation::canonical_clock_time("time", &time)?;
            changes.push(AppointmentChange::Time(time));
        }
        if let Some(doctor) = self.doctor {
            validation::require("doctor", &doctor)?;
            changes.push(AppointmentChange::Doctor(doctor));
        }
        if let Some(reason) = self.reason {
            validation::require("reason", &reason)?;
            changes.push(AppointmentChange::Reason(reason));
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            time: "09:30".into(),
            doctor: "Dr. Osei".into(),
            reason: "Follow-up".into(),
        }
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let result: Result<AppointmentPatch, _> =
            serde_json::from_str(r#"{"doctor":"Dr. Lee","patientId":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn patch_changes_only_named_field() {
        let patch: AppointmentPatch = serde_json::from_str(r#"{"reason":"Lab review"}"#).unwrap();
        let changes = patch.into_changes().unwrap();
        assert_eq!(changes, vec![AppointmentChange::Reason("Lab review".into())]);

        let before = sample();
        let mut after = before.clone();
        for change in &changes {
            change.apply(&mut after);
        }
        assert_eq!(after.reason, "Lab review");
        assert_eq!(after.doctor, before.doctor);
        assert_eq!(after.date, before.date);
        assert_eq!(after.time, before.time);
    }

    #[test]
    fn patch_validates_time() {
        let patch = AppointmentPatch {
            time: Some("noon".into()),
            ..Default::default()
        };
        assert_eq!(patch.into_changes().unwrap_err().field, "time");
    }

    #[test]
    fn patch_pads_single_digit_hour() {
        let patch: AppointmentPatch = serde_json::from_str(r#"{"time":"7:05"}"#).unwrap();
        assert_eq!(
            patch.into_changes().unwrap(),
            vec![AppointmentChange::Time("07:05".into())]
        );
    }

    #[test]
    fn empty_patch_has_no_changes() {
        let patch: AppointmentPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.into_changes().unwrap().is_empty());
    }

    #[test]
    fn detail_serializes_flat_with_patient() {
        let detail = AppointmentDetail {
            appointment: sample(),
            patient: PatientName {
                first_name: "Ana".into(),
                last_name: "Mensah".into(),
            },
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["doctor"], "Dr. Osei");
        assert_eq!(json["date"], "2024-03-04");
        assert_eq!(json["patient"]["firstName"], "Ana");
        assert!(json["patientId"].is_string());
    }

    #[test]
    fn new_appointment_requires_doctor() {
        let mut new = NewAppointment {
            id_number: "P1".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            time: "10:00".into(),
            doctor: "".into(),
            reason: "Checkup".into(),
        };
        assert_eq!(new.validate().unwrap_err().field, "doctor");
    }

    #[test]
    fn validate_stores_zero_padded_time() {
        let mut new = NewAppointment {
            id_number: "P1".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            time: " 9:30".into(),
            doctor: "Dr. Osei".into(),
            reason: "Checkup".into(),
        };
        new.validate().unwrap();
        assert_eq!(new.time, "09:30");
    }
}
