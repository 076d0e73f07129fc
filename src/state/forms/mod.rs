//! Form domain layer
//!
//! Validators, fields bound to page elements, and the form that aggregates
//! them and drives submission.

mod field;
mod form_state;
mod kind;
mod retry;
mod validators;

pub use field::FormField;
pub use form_state::{
    ErrorMessages, Form, FormBuilder, FormData, FormValidation, SubmitEvent, SubmitOutcome,
};
pub use kind::{FieldKind, FieldSpec};
pub use retry::{FormEvent, RetryHandle, RetryScheduler};
pub use validators::{
    digit_sum, is_email_valid, is_full_name_valid, is_phone_valid, EmailValidator,
    FieldValidator, FullNameValidator, PhoneValidator, ValidationResult, ValidatorSet,
    ALLOWED_EMAIL_DOMAINS, DEFAULT_MAX_DIGIT_SUM,
};
