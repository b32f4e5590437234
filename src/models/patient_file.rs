//! Comprehensive per-patient medical record.
//!
//! The nested body (`PatientRecord`) is persisted as a single JSON document
//! keyed by `patient_id`. Every section other than `fullName` is optional on
//! input and defaults to empty.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientFile {
    pub id: Uuid,
    pub patient_id: String,
    #[serde(flatten)]
    pub record: PatientRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /patient-files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatientFile {
    pub patient_id: String,
    #[serde(flatten)]
    pub record: PatientRecord,
}

impl NewPatientFile {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        validation::require("patientId", &self.patient_id)?;
        self.record.validate(today)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub full_name: FullName,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub medical_history: MedicalBackground,
    #[serde(default)]
    pub family_history: FamilyHistory,
    #[serde(default)]
    pub consultation_records: Vec<ConsultationRecord>,
    #[serde(default)]
    pub lab_results: Vec<LabResult>,
    #[serde(default)]
    pub vital_signs: VitalSigns,
    #[serde(default)]
    pub insurance_and_billing: InsuranceAndBilling,
    #[serde(default)]
    pub additional_information: Option<String>,
    #[serde(default)]
    pub appointment_history: AppointmentHistory,
}

impl PatientRecord {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        self.full_name.validate()?;
        if let Some(dob) = self.date_of_birth {
            validation::not_in_future("dateOfBirth", dob, today)?;
        }
        if let Some(email) = &self.email_address {
            validation::email("emailAddress", email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullName {
    pub first_name: String,
    pub last_name: String,
}

impl FullName {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::require("fullName.firstName", &self.first_name)?;
        validation::require("fullName.lastName", &self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub phone_number: Option<String>,
}

/// Free-text history lists (the `medicalHistory` section of a file).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalBackground {
    pub conditions: Vec<String>,
    pub surgeries: Vec<String>,
    pub chronic_illnesses: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    pub vaccinations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FamilyHistory {
    pub genetic_conditions: Vec<String>,
    pub family_illnesses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsultationRecord {
    pub date: Option<NaiveDate>,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub prescribed_medications: Vec<String>,
    pub referrals: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabResult {
    pub test_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub result: Option<String>,
    pub reference_range: Option<String>,
    pub notes: Option<String>,
}

/// Latest vitals snapshot. Overwritten on update, not historized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VitalSigns {
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<f64>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub bmi: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceAndBilling {
    pub provider: Option<String>,
    pub policy_number: Option<String>,
    pub billing_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentHistory {
    pub upcoming: Vec<String>,
    pub past: Vec<String>,
}

/// Body of `PUT /patient-files/:patientId`. Each present section replaces
/// the stored one. `patientId`, `id` and timestamps are not updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatientFilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<FullName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<MedicalBackground>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_history: Option<FamilyHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_records: Option<Vec<ConsultationRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_results: Option<Vec<LabResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_signs: Option<VitalSigns>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_and_billing: Option<InsuranceAndBilling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_history: Option<AppointmentHistory>,
}

/// One permitted section replacement on a patient file.
#[derive(Debug, Clone, PartialEq)]
pub enum PatientFileChange {
    FullName(FullName),
    Gender(String),
    DateOfBirth(NaiveDate),
    Address(String),
    PhoneNumber(String),
    EmailAddress(String),
    EmergencyContact(EmergencyContact),
    MedicalHistory(MedicalBackground),
    FamilyHistory(FamilyHistory),
    ConsultationRecords(Vec<ConsultationRecord>),
    LabResults(Vec<LabResult>),
    VitalSigns(VitalSigns),
    InsuranceAndBilling(InsuranceAndBilling),
    AdditionalInformation(String),
    AppointmentHistory(AppointmentHistory),
}

impl PatientFileChange {
    pub fn apply(&self, record: &mut PatientRecord) {
        match self {
            Self::FullName(v) => record.full_name = v.clone(),
            Self::Gender(v) => record.gender = Some(v.clone()),
            Self::DateOfBirth(v) => record.date_of_birth = Some(*v),
            Self::Address(v) => record.address = Some(v.clone()),
            Self::PhoneNumber(v) => record.phone_number = Some(v.clone()),
            Self::EmailAddress(v) => record.email_address = Some(v.clone()),
            Self::EmergencyContact(v) => record.emergency_contact = v.clone(),
            Self::MedicalHistory(v) => record.medical_history = v.clone(),
            Self::FamilyHistory(v) => record.family_history = v.clone(),
            Self::ConsultationRecords(v) => record.consultation_records = v.clone(),
            Self::LabResults(v) => record.lab_results = v.clone(),
            Self::VitalSigns(v) => record.vital_signs = v.clone(),
            Self::InsuranceAndBilling(v) => record.insurance_and_billing = v.clone(),
            Self::AdditionalInformation(v) => record.additional_information = Some(v.clone()),
            Self::AppointmentHistory(v) => record.appointment_history = v.clone(),
        }
    }
}

impl PatientFilePatch {
    /// Validate each present section and turn the patch into change commands.
    pub fn into_changes(self, today: NaiveDate) -> Result<Vec<PatientFileChange>, ValidationError> {
        use PatientFileChange as C;

        let mut changes = Vec::new();
        if let Some(v) = self.full_name {
            v.validate()?;
            changes.push(C::FullName(v));
        }
        if let Some(v) = self.gender {
            changes.push(C::Gender(v));
        }
        if let Some(v) = self.date_of_birth {
            validation::not_in_future("dateOfBirth", v, today)?;
            changes.push(C::DateOfBirth(v));
        }
        if let Some(v) = self.address {
            changes.push(C::Address(v));
        }
        if let Some(v) = self.phone_number {
            changes.push(C::PhoneNumber(v));
        }
        if let Some(v) = self.email_address {
            validation::email("emailAddress", &v)?;
            changes.push(C::EmailAddress(v));
        }
        if let Some(v) = self.emergency_contact {
            changes.push(C::EmergencyContact(v));
        }
        if let Some(v) = self.medical_history {
            changes.push(C::MedicalHistory(v));
        }
        if let Some(v) = self.family_history {
            changes.push(C::FamilyHistory(v));
        }
        if let Some(v) = self.consultation_records {
            changes.push(C::ConsultationRecords(v));
        }
        if let Some(v) = self.lab_results {
            changes.push(C::LabResults(v));
        }
        if let Some(v) = self.vital_signs {
            changes.push(C::VitalSigns(v));
        }
        if let Some(v) = self.insurance_and_billing {
            changes.push(C::InsuranceAndBilling(v));
        }
        if let Some(v) = self.additional_information {
            changes.push(C::AdditionalInformation(v));
        }
        if let Some(v) = self.appointment_history {
            changes.push(C::AppointmentHistory(v));
        }
        Ok(changes)
    }
}
