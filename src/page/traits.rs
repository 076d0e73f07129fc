//! Trait abstraction for the page a form is mounted on, enabling mocking in tests

use std::fmt;
use std::sync::Arc;

/// Marker shown on the result area after a response arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultState {
    Success,
    Error,
    Progress,
}

impl ResultState {
    /// Class name as the server spells the status
    pub fn as_str(self) -> &'static str {
        match self {
            ResultState::Success => "success",
            ResultState::Error => "error",
            ResultState::Progress => "progress",
        }
    }
}

impl fmt::Display for ResultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An input element that stores one field's value
pub trait BoundElement: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    /// Add or remove the `error` marker
    fn set_error_marker(&self, marked: bool);
    fn has_error_marker(&self) -> bool;
}

/// Finds bound elements by their name attribute
#[cfg_attr(test, mockall::automock)]
pub trait ElementLookup: Send + Sync {
    fn lookup_elements_by_name(&self, name: &str) -> Vec<Arc<dyn BoundElement>>;
}

/// Container listing the current error messages, one entry per message
#[cfg_attr(test, mockall::automock)]
pub trait ErrorDisplay: Send + Sync {
    /// Replace whatever is shown with `messages`
    fn render_errors(&self, messages: &[String]);
}

/// The control that triggers submission
pub trait SubmitControl: Send + Sync {
    fn set_disabled(&self, disabled: bool);
    fn is_disabled(&self) -> bool;
}

/// Area showing the outcome of the last submission
#[cfg_attr(test, mockall::automock)]
pub trait ResultArea: Send + Sync {
    /// Replace the text and the state marker
    fn show(&self, text: &str, state: ResultState);
    /// Replace only the state marker
    fn mark(&self, state: ResultState);
    fn state(&self) -> Option<ResultState>;
}
