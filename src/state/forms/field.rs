//! Form field bound to a page element
//!
//! A field owns no value of its own. Reads and writes go through the single
//! page element carrying the field's wire name, and validity is recomputed
//! from that value on demand.

use super::form_state::ErrorMessages;
use super::kind::{FieldKind, FieldSpec};
use super::validators::{FieldValidator, ValidationResult};
use crate::error::{FormError, FormResult};
use crate::page::{BoundElement, ElementLookup};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Represents a single form field with its configuration and bound element
#[derive(Clone)]
pub struct FormField {
    pub kind: FieldKind,
    pub label: String,
    validator: Option<Arc<dyn FieldValidator>>,
    lookup: Arc<dyn ElementLookup>,
}

impl FormField {
    /// Create a field; `validator` of `None` means the field is always valid
    pub fn new(
        spec: FieldSpec,
        validator: Option<Arc<dyn FieldValidator>>,
        lookup: Arc<dyn ElementLookup>,
    ) -> Self {
        Self {
            kind: spec.kind,
            label: spec.label,
            validator,
            lookup,
        }
    }

    /// Name of the bound element
    pub fn name(&self) -> &'static str {
        self.kind.wire_name()
    }

    /// The one element carrying this field's name
    fn bound_element(&self) -> FormResult<Arc<dyn BoundElement>> {
        let mut elements = self.lookup.lookup_elements_by_name(self.name());
        match elements.len() {
            1 => Ok(elements.remove(0)),
            0 => Err(FormError::ElementNotFound(self.name().to_string())),
            count => Err(FormError::AmbiguousElement {
                name: self.name().to_string(),
                count,
            }),
        }
    }

    /// Get the current value from the bound element
    pub fn value(&self) -> FormResult<String> {
        Ok(self.bound_element()?.value())
    }

    /// Write the value and re-evaluate validity, reporting into `errors`
    pub fn set_value(
        &self,
        value: &str,
        errors: &mut ErrorMessages,
    ) -> FormResult<ValidationResult> {
        self.bound_element()?.set_value(value);
        self.refresh_validity(errors)
    }

    pub fn check_validity(&self) -> FormResult<ValidationResult> {
        let value = self.value()?;
        Ok(match &self.validator {
            Some(validator) => validator.validate(&value),
            None => ValidationResult::ok(),
        })
    }

    /// Recompute validity, toggle the element's error marker and record the
    /// failure message if there is one
    pub fn refresh_validity(&self, errors: &mut ErrorMessages) -> FormResult<ValidationResult> {
        let element = self.bound_element()?;
        let result = self.check_validity()?;

        element.set_error_marker(!result.valid);
        if let Some(message) = result.message.as_deref().filter(|_| !result.valid) {
            errors.push(message);
        }

        trace!(field = self.name(), valid = result.valid, "Refreshed field validity");
        Ok(result)
    }
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormField")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MemoryPage, MockElementLookup};
    use crate::state::forms::validators::{FullNameValidator, PhoneValidator};

    fn full_name_field(page: Arc<MemoryPage>) -> FormField {
        FormField::new(
            FieldSpec::new(FieldKind::FullName, "FIO"),
            Some(Arc::new(FullNameValidator)),
            page,
        )
    }

    mod lookup {
        use super::*;

        #[test]
        fn test_missing_element_is_not_found() {
            let mut lookup = MockElementLookup::new();
            lookup
                .expect_lookup_elements_by_name()
                .times(1)
                .returning(|_| Vec::new());

            let field = FormField::new(
                FieldSpec::new(FieldKind::FullName, "FIO"),
                None,
                Arc::new(lookup),
            );

            assert!(matches!(
                field.value(),
                Err(FormError::ElementNotFound(name)) if name == "fio"
            ));
        }

        #[test]
        fn test_duplicate_elements_are_ambiguous() {
            let page = MemoryPage::new();
            page.add_element("phone");
            page.add_element("phone");
            let field = FormField::new(
                FieldSpec::new(FieldKind::Phone, "PHONE"),
                None,
                Arc::new(page),
            );

            assert!(matches!(
                field.value(),
                Err(FormError::AmbiguousElement { count: 2, .. })
            ));
        }

        #[test]
        fn test_set_value_fails_without_element() {
            let page = Arc::new(MemoryPage::new());
            let field = full_name_field(page);
            let mut errors = ErrorMessages::default();

            assert!(field.set_value("Ivanov Ivan Ivanovich", &mut errors).is_err());
            assert!(errors.is_empty());
        }
    }

    mod value {
        use super::*;

        #[test]
        fn test_value_reads_bound_element() {
            let page = Arc::new(MemoryPage::new());
            let element = page.add_element("fio");
            element.set_value("Petrov Petr Petrovich");

            assert_eq!(full_name_field(page).value().unwrap(), "Petrov Petr Petrovich");
        }

        #[test]
        fn test_new_element_starts_empty() {
            let page = Arc::new(MemoryPage::new());
            page.add_element("fio");
            assert_eq!(full_name_field(page).value().unwrap(), "");
        }

        #[test]
        fn test_set_value_writes_and_revalidates() {
            let page = Arc::new(MemoryPage::new());
            let element = page.add_element("fio");
            let field = full_name_field(Arc::clone(&page));
            let mut errors = ErrorMessages::default();

            let result = field.set_value("Ivanov Ivan", &mut errors).unwrap();

            assert!(!result.valid);
            assert_eq!(element.value(), "Ivanov Ivan");
            assert!(element.has_error_marker());
            assert_eq!(errors.len(), 1);
        }
    }

    mod validity {
        use super::*;

        #[test]
        fn test_field_without_validator_is_always_valid() {
            let page = Arc::new(MemoryPage::new());
            page.add_element("email");
            let field = FormField::new(FieldSpec::new(FieldKind::Email, "EMAIL"), None, page);

            assert_eq!(field.check_validity().unwrap(), ValidationResult::ok());
        }

        #[test]
        fn test_refresh_clears_marker_once_valid() {
            let page = Arc::new(MemoryPage::new());
            let element = page.add_element("fio");
            let field = full_name_field(Arc::clone(&page));
            let mut errors = ErrorMessages::default();

            field.set_value("Ivanov", &mut errors).unwrap();
            assert!(element.has_error_marker());

            field.set_value("Ivanov Ivan Ivanovich", &mut errors).unwrap();
            assert!(!element.has_error_marker());
        }

        #[test]
        fn test_refresh_does_not_duplicate_messages() {
            let page = Arc::new(MemoryPage::new());
            page.add_element("phone");
            let field = FormField::new(
                FieldSpec::new(FieldKind::Phone, "PHONE"),
                Some(Arc::new(PhoneValidator::default())),
                page,
            );
            let mut errors = ErrorMessages::default();

            field.refresh_validity(&mut errors).unwrap();
            field.refresh_validity(&mut errors).unwrap();

            assert_eq!(errors.len(), 1);
        }

        #[test]
        fn test_check_validity_has_no_side_effects() {
            let page = Arc::new(MemoryPage::new());
            let element = page.add_element("fio");
            let field = full_name_field(page);

            let result = field.check_validity().unwrap();

            assert!(!result.valid);
            assert!(!element.has_error_marker());
        }
    }

    #[test]
    fn test_debug_omits_collaborators() {
        let page = Arc::new(MemoryPage::new());
        let debug_str = format!("{:?}", full_name_field(page));
        assert!(debug_str.contains("FormField"));
        assert!(debug_str.contains("FullName"));
    }
}
