//! Validity predicates over normalized field values.

use super::normalizers::NATIONAL_DIGITS;
use crate::types::{FieldStatus, ReasonCode};
use once_cell::sync::Lazy;
use regex::Regex;

/// `localpart@domain.tld` with no whitespace and a single `@`.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// Required fields (name, email) must be non-empty.
pub fn validate_required(value: &str) -> FieldStatus {
    if value.is_empty() {
        FieldStatus::Invalid(ReasonCode::Empty)
    } else {
        FieldStatus::Valid
    }
}

/// Email shape check.
///
/// An empty value is reported as `MissingRequired`; the record processor
/// runs [`validate_required`] first, so on a record an absent email shows
/// up as `Empty`.
pub fn validate_email(value: &str) -> FieldStatus {
    if value.is_empty() {
        return FieldStatus::Invalid(ReasonCode::MissingRequired);
    }
    if EMAIL_PATTERN.is_match(value) {
        FieldStatus::Valid
    } else {
        FieldStatus::Invalid(ReasonCode::MalformedEmail)
    }
}

/// Phone is optional: empty or `+44` followed by exactly 10 digits.
pub fn validate_phone(value: &str) -> FieldStatus {
    if value.is_empty() {
        return FieldStatus::Valid;
    }
    let well_formed = value.strip_prefix("+44").is_some_and(|rest| {
        rest.len() == NATIONAL_DIGITS && rest.chars().all(|c| c.is_ascii_digit())
    });
    if well_formed {
        FieldStatus::Valid
    } else {
        FieldStatus::Invalid(ReasonCode::MalformedPhone)
    }
}

/// Company has no validity rule.
pub fn validate_company(_value: &str) -> FieldStatus {
    FieldStatus::Valid
}
