//! In-memory page model
//!
//! Holds everything a rendered form shows: named input elements, the error
//! list, the submit button state and the result area. The TUI draws from it
//! and the form mutates it through the collaborator traits.

use super::traits::{
    BoundElement, ElementLookup, ErrorDisplay, ResultArea, ResultState, SubmitControl,
};
use crate::state::FieldSpec;
use parking_lot::RwLock;
use std::sync::Arc;

/// A named text input
#[derive(Debug)]
pub struct MemoryElement {
    name: String,
    value: RwLock<String>,
    error: RwLock<bool>,
}

impl MemoryElement {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: RwLock::new(String::new()),
            error: RwLock::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl BoundElement for MemoryElement {
    fn value(&self) -> String {
        self.value.read().clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.write() = value.to_string();
    }

    fn set_error_marker(&self, marked: bool) {
        *self.error.write() = marked;
    }

    fn has_error_marker(&self) -> bool {
        *self.error.read()
    }
}

/// What the result area currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultView {
    pub text: String,
    pub state: Option<ResultState>,
}

#[derive(Debug, Default)]
pub struct MemoryPage {
    elements: RwLock<Vec<Arc<MemoryElement>>>,
    errors: RwLock<Vec<String>>,
    submit_disabled: RwLock<bool>,
    result: RwLock<ResultView>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with one input per field spec
    pub fn with_fields(specs: &[FieldSpec]) -> Self {
        let page = Self::new();
        for spec in specs {
            page.add_element(spec.kind.wire_name());
        }
        page
    }

    /// Append an input; names are not required to be unique
    pub fn add_element(&self, name: &str) -> Arc<MemoryElement> {
        let element = Arc::new(MemoryElement::new(name));
        self.elements.write().push(Arc::clone(&element));
        element
    }

    /// First input with the given name
    pub fn element(&self, name: &str) -> Option<Arc<MemoryElement>> {
        self.elements
            .read()
            .iter()
            .find(|e| e.name == name)
            .cloned()
    }

    /// Messages as last rendered by the form
    pub fn errors(&self) -> Vec<String> {
        self.errors.read().clone()
    }

    pub fn result(&self) -> ResultView {
        self.result.read().clone()
    }
}

impl ElementLookup for MemoryPage {
    fn lookup_elements_by_name(&self, name: &str) -> Vec<Arc<dyn BoundElement>> {
        self.elements
            .read()
            .iter()
            .filter(|e| e.name == name)
            .map(|e| Arc::clone(e) as Arc<dyn BoundElement>)
            .collect()
    }
}

impl ErrorDisplay for MemoryPage {
    fn render_errors(&self, messages: &[String]) {
        *self.errors.write() = messages.to_vec();
    }
}

impl SubmitControl for MemoryPage {
    fn set_disabled(&self, disabled: bool) {
        *self.submit_disabled.write() = disabled;
    }

    fn is_disabled(&self) -> bool {
        *self.submit_disabled.read()
    }
}

impl ResultArea for MemoryPage {
    fn show(&self, text: &str, state: ResultState) {
        let mut result = self.result.write();
        result.text = text.to_string();
        result.state = Some(state);
    }

    fn mark(&self, state: ResultState) {
        self.result.write().state = Some(state);
    }

    fn state(&self) -> Option<ResultState> {
        self.result.read().state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldKind;

    #[test]
    fn test_with_fields_creates_one_element_per_spec() {
        let page = MemoryPage::with_fields(&FieldSpec::defaults());
        for kind in FieldKind::ALL {
            assert_eq!(page.lookup_elements_by_name(kind.wire_name()).len(), 1);
        }
    }

    #[test]
    fn test_lookup_returns_every_element_with_name() {
        let page = MemoryPage::new();
        page.add_element("email");
        page.add_element("email");
        page.add_element("phone");
        assert_eq!(page.lookup_elements_by_name("email").len(), 2);
        assert!(page.lookup_elements_by_name("fio").is_empty());
    }

    #[test]
    fn test_element_value_is_shared_with_lookup() {
        let page = MemoryPage::new();
        let element = page.add_element("fio");
        page.lookup_elements_by_name("fio")[0].set_value("Ivanov Ivan Ivanovich");
        assert_eq!(element.value(), "Ivanov Ivan Ivanovich");
    }

    #[test]
    fn test_error_marker_toggles() {
        let element = MemoryElement::new("phone");
        assert!(!element.has_error_marker());
        element.set_error_marker(true);
        assert!(element.has_error_marker());
        element.set_error_marker(false);
        assert!(!element.has_error_marker());
    }

    #[test]
    fn test_render_errors_replaces_previous_list() {
        let page = MemoryPage::new();
        page.render_errors(&["a".to_string(), "b".to_string()]);
        page.render_errors(&["c".to_string()]);
        assert_eq!(page.errors(), vec!["c".to_string()]);
    }

    #[test]
    fn test_mark_keeps_text() {
        let page = MemoryPage::new();
        page.show("Try later", ResultState::Error);
        page.mark(ResultState::Progress);
        assert_eq!(
            page.result(),
            ResultView {
                text: "Try later".to_string(),
                state: Some(ResultState::Progress),
            }
        );
    }

    #[test]
    fn test_submit_control_starts_enabled() {
        let page = MemoryPage::new();
        assert!(!page.is_disabled());
        page.set_disabled(true);
        assert!(page.is_disabled());
    }
}
