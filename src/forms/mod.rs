//! Request payloads and their conversion into domain drafts and patches.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::{CustomerEmail, NonEmptyString, PhoneNumber};

pub mod bookings;
pub mod notifications;
pub mod support_tickets;
pub mod work_orders;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid url")]
    InvalidUrl,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("start time is in the past")]
    PastStartTime,

    #[error("schedule is out of order or out of range")]
    InvalidSchedule,
}

/// Sanitized required text; markup-only input counts as empty.
pub(crate) fn required_text(value: String, field: &'static str) -> Result<String, FormError> {
    NonEmptyString::sanitized(value)
        .map(NonEmptyString::into_inner)
        .map_err(|_| FormError::EmptyField(field))
}

/// Sanitized optional text; blank input becomes `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| NonEmptyString::sanitized(v).ok().map(NonEmptyString::into_inner))
}

pub(crate) fn optional_email(value: Option<String>) -> Result<Option<CustomerEmail>, FormError> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(email) => CustomerEmail::new(email)
            .map(Some)
            .map_err(|_| FormError::InvalidEmail),
        None => Ok(None),
    }
}

pub(crate) fn optional_phone(value: Option<String>) -> Result<Option<PhoneNumber>, FormError> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(phone) => PhoneNumber::new(phone)
            .map(Some)
            .map_err(|_| FormError::InvalidPhoneNumber),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_only_text_is_empty() {
        assert!(matches!(
            required_text("<script>x</script>".into(), "title"),
            Err(FormError::EmptyField("title"))
        ));
        assert_eq!(required_text(" Call ".into(), "title").unwrap(), "Call");
    }

    #[test]
    fn blank_optionals_are_dropped() {
        assert_eq!(optional_text(Some("   ".into())), None);
        assert!(optional_email(Some(" ".into())).unwrap().is_none());
        assert!(optional_phone(None).unwrap().is_none());
    }

    #[test]
    fn malformed_contacts_are_rejected() {
        assert!(matches!(
            optional_email(Some("nope".into())),
            Err(FormError::InvalidEmail)
        ));
        assert!(matches!(
            optional_phone(Some("abc".into())),
            Err(FormError::InvalidPhoneNumber)
        ));
    }
}
