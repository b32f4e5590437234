//! API endpoint handlers.
//!
//! Each module corresponds to one resource. Handlers validate input,
//! make one repository call and wrap the result in the response envelope.

pub mod appointments;
pub mod health;
pub mod medical_history;
pub mod patient_files;
pub mod patients;
