pub mod appointment;
pub mod medical_history;
pub mod patient;
pub mod patient_file;
pub mod validation;

pub use appointment::*;
pub use medical_history::*;
pub use patient::*;
pub use patient_file::*;
pub use validation::ValidationError;
