//! Field validators
//!
//! The free functions are the format rules themselves. `FieldValidator`
//! wraps each rule with a user-facing message, and `ValidatorSet` selects the
//! validator for a field by its kind.

use super::kind::FieldKind;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Domains an email address is allowed to end with
pub const ALLOWED_EMAIL_DOMAINS: [&str; 6] = [
    "ya.ru",
    "yandex.ru",
    "yandex.ua",
    "yandex.by",
    "yandex.kz",
    "yandex.com",
];

/// Default ceiling for the sum of digits in a phone number
pub const DEFAULT_MAX_DIGIT_SUM: u32 = 30;

/// Local part of dot-separated atoms, then a hostname with a 2-6 letter TLD
/// or a dotted IPv4 address with an optional port. Case folding is ASCII only.
static EMAIL_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i-u)^([A-Za-z0-9_!#$%&'*+/=?^`{|}~-]+\.)*[A-Za-z0-9_!#$%&'*+/=?^`{|}~-]+@(((([a-z0-9][a-z0-9-]{0,62}[a-z0-9])|[a-z])\.)+[a-z]{2,6}|([0-9]{1,3}\.){3}[0-9]{1,3}(:[0-9]{1,5})?)$",
    )
    .expect("valid regex literal")
});

static PHONE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+7\([0-9]{3}\)[0-9]{3}-[0-9]{2}-[0-9]{2}$").expect("valid regex literal")
});

/// Sum of every decimal digit appearing in `value`, ignoring everything else
pub fn digit_sum(value: &str) -> u32 {
    value.chars().filter_map(|c| c.to_digit(10)).sum()
}

/// Exactly three whitespace-separated words
pub fn is_full_name_valid(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value.split_whitespace().count() == 3
}

pub fn is_email_valid(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    let allowed_suffixes = ALLOWED_EMAIL_DOMAINS
        .iter()
        .filter(|domain| value.ends_with(*domain))
        .count();
    EMAIL_GRAMMAR.is_match(value) && allowed_suffixes == 1
}

pub fn is_phone_valid(value: &str, max_digit_sum: u32) -> bool {
    if value.is_empty() {
        return false;
    }
    if digit_sum(value) > max_digit_sum {
        return false;
    }
    PHONE_FORMAT.is_match(value)
}

/// Outcome of checking one field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Checks a raw field value and explains a failure
pub trait FieldValidator: Send + Sync {
    fn validate(&self, value: &str) -> ValidationResult;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FullNameValidator;

impl FieldValidator for FullNameValidator {
    fn validate(&self, value: &str) -> ValidationResult {
        if is_full_name_valid(value) {
            ValidationResult::ok()
        } else {
            ValidationResult::invalid("Full name must consist of exactly three words")
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl FieldValidator for EmailValidator {
    fn validate(&self, value: &str) -> ValidationResult {
        if is_email_valid(value) {
            ValidationResult::ok()
        } else {
            ValidationResult::invalid(format!(
                "Email must be a valid address in one of the domains: {}",
                ALLOWED_EMAIL_DOMAINS.join(", ")
            ))
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PhoneValidator {
    pub max_digit_sum: u32,
}

impl Default for PhoneValidator {
    fn default() -> Self {
        Self {
            max_digit_sum: DEFAULT_MAX_DIGIT_SUM,
        }
    }
}

impl FieldValidator for PhoneValidator {
    fn validate(&self, value: &str) -> ValidationResult {
        if is_phone_valid(value, self.max_digit_sum) {
            return ValidationResult::ok();
        }
        // Split the single rule so the user learns which half failed
        if PHONE_FORMAT.is_match(value) {
            ValidationResult::invalid(format!(
                "Phone digits must add up to no more than {}",
                self.max_digit_sum
            ))
        } else {
            ValidationResult::invalid("Phone must look like +7(999)999-99-99")
        }
    }
}

/// Mapping from field kind to the validator that checks it
#[derive(Clone, Default)]
pub struct ValidatorSet {
    validators: HashMap<FieldKind, Arc<dyn FieldValidator>>,
}

impl ValidatorSet {
    /// No validators: every field is valid
    pub fn empty() -> Self {
        Self::default()
    }

    /// Full name, email and phone rules with the given phone digit ceiling
    pub fn standard(max_digit_sum: u32) -> Self {
        Self::empty()
            .with(FieldKind::FullName, FullNameValidator)
            .with(FieldKind::Email, EmailValidator)
            .with(FieldKind::Phone, PhoneValidator { max_digit_sum })
    }

    pub fn with(mut self, kind: FieldKind, validator: impl FieldValidator + 'static) -> Self {
        self.validators.insert(kind, Arc::new(validator));
        self
    }

    pub fn get(&self, kind: FieldKind) -> Option<Arc<dyn FieldValidator>> {
        self.validators.get(&kind).cloned()
    }
}

impl std::fmt::Debug for ValidatorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.validators.keys().collect();
        kinds.sort();
        f.debug_struct("ValidatorSet").field("kinds", &kinds).finish()
    }
}
