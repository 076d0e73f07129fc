//! Domain errors for the form layer
//!
//! These are configuration failures: a page without the expected elements, a
//! form built from a bad field list, or untyped input of the wrong shape.
//! Invalid user input is never an error; it is a `ValidationResult`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    /// No bound element carries the field's name
    #[error("can't find element by name `{0}`, form constructor invalid")]
    ElementNotFound(String),

    /// More than one bound element carries the field's name
    #[error("found {count} elements with name `{name}`, form invalid")]
    AmbiguousElement { name: String, count: usize },

    /// A value of the wrong JSON type reached a textual slot
    #[error("value for `{0}` must be a string")]
    Type(String),

    /// The form was built without a usable field list
    #[error("invalid form construction: {0}")]
    Construction(String),

    #[error("failed to encode form data: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type FormResult<T> = std::result::Result<T, FormError>;
