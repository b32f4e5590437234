//! Field-level validation shared by the create and update payloads.

use chrono::{NaiveDate, NaiveTime};

/// A rejected input field. Surfaces to clients as `400 BAD_REQUEST`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Reject blank (empty or whitespace-only) required strings.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

/// Accept a 24h `HH:MM` clock time. A single-digit hour ("9:30") parses.
pub fn clock_time(field: &'static str, value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ValidationError::new(field, "must be a time in HH:MM format"))
}

/// Parse like `clock_time` and re-render zero-padded, so stored times
/// sort chronologically as text.
pub fn canonical_clock_time(field: &'static str, value: &str) -> Result<String, ValidationError> {
    clock_time(field, value).map(|t| t.format("%H:%M").to_string())
}

pub fn not_in_future(
    field: &'static str,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if date > today {
        return Err(ValidationError::new(field, "cannot be in the future"));
    }
    Ok(())
}

/// Shallow address check: exactly one `@` with something on both sides,
/// and a domain of two or more non-empty dot-separated labels. Empty
/// strings are treated as "not provided".
pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    let mut parts = value.split('@');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && domain.split('.').all(|label| !label.is_empty())
        }
        _ => false,
    };
    if !valid {
        return Err(ValidationError::new(field, "is not a valid email address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_whitespace() {
        assert!(require("doctor", "   ").is_err());
        assert!(require("doctor", "Dr. Osei").is_ok());
    }

    #[test]
    fn clock_time_accepts_24h() {
        assert_eq!(
            clock_time("time", "14:30").unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap()
        );
        assert!(clock_time("time", "25:00").is_err());
        assert!(clock_time("time", "2pm").is_err());
    }

    #[test]
    fn canonical_clock_time_pads_hour() {
        assert_eq!(canonical_clock_time("time", "9:30").unwrap(), "09:30");
        assert_eq!(canonical_clock_time("time", " 14:05 ").unwrap(), "14:05");
        assert!(canonical_clock_time("time", "9h30").is_err());
    }

    #[test]
    fn future_dates_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(not_in_future("dateOfBirth", today, today).is_ok());
        let err = not_in_future("dateOfBirth", today.succ_opt().unwrap(), today).unwrap_err();
        assert_eq!(err.field, "dateOfBirth");
    }

    #[test]
    fn email_shapes() {
        assert!(email("emailAddress", "").is_ok());
        assert!(email("emailAddress", "ana@clinic.org").is_ok());
        assert!(email("emailAddress", "ana.clinic.org").is_err());
        assert!(email("emailAddress", "ana@@clinic.org").is_err());
        assert!(email("emailAddress", "@clinic.org").is_err());
        assert!(email("emailAddress", "ana@localhost").is_err());
        assert!(email("emailAddress", "ana@clinic..org").is_err());
        assert!(email("emailAddress", "ana@.clinic.org").is_err());
        assert!(email("emailAddress", "ana@clinic.org.").is_err());
        assert!(email("emailAddress", "ana@mail.clinic.org").is_ok());
    }

    #[test]
    fn display_names_field() {
        let err = ValidationError::new("time", "must be a time in HH:MM format");
        assert_eq!(err.to_string(), "time: must be a time in HH:MM format");
    }
}
