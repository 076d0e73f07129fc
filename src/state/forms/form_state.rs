//! Form state and the submit cycle

use super::field::FormField;
use super::kind::{FieldKind, FieldSpec};
use super::retry::{RetryHandle, RetryScheduler};
use super::validators::{ValidatorSet, DEFAULT_MAX_DIGIT_SUM};
use crate::api::{SubmitResult, SubmitTransport};
use crate::error::{FormError, FormResult};
use crate::page::{ElementLookup, ErrorDisplay, ResultArea, ResultState, SubmitControl};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Field values keyed by kind, serialized as `{"fio": ..., "email": ..., "phone": ...}`
pub type FormData = BTreeMap<FieldKind, String>;

/// Current validation messages, without duplicates, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMessages(Vec<String>);

impl ErrorMessages {
    /// Append `message` unless an identical one is already listed.
    /// Returns whether it was added.
    pub fn push(&mut self, message: &str) -> bool {
        if self.0.iter().any(|m| m == message) {
            return false;
        }
        self.0.push(message.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Attributes of the control that triggered a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    pub method: String,
    pub action: String,
}

impl SubmitEvent {
    pub fn new(method: &str, action: &str) -> Self {
        Self {
            method: method.to_string(),
            action: action.to_string(),
        }
    }
}

/// Aggregate validity of every field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValidation {
    pub is_valid: bool,
    /// Kinds that failed, in field order
    pub error_fields: Vec<FieldKind>,
}

/// What one call to `Form::submit` ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Some fields are invalid; nothing was sent
    Rejected { error_fields: Vec<FieldKind> },
    Succeeded,
    /// The backend refused the submission
    Failed { reason: String },
    /// The backend asked to try again; a resubmit is pending
    RetryScheduled { delay: Duration },
    /// The request failed or the reply could not be understood
    Unreachable { reason: String },
}

impl SubmitOutcome {
    /// Whether the submit cycle is over (no resubmit pending)
    pub fn is_final(&self) -> bool {
        !matches!(self, SubmitOutcome::RetryScheduled { .. })
    }
}

/// Builder wiring a form to its page and transport
#[derive(Default)]
pub struct FormBuilder {
    fields: Option<Vec<FieldSpec>>,
    validators: Option<ValidatorSet>,
    lookup: Option<Arc<dyn ElementLookup>>,
    error_display: Option<Arc<dyn ErrorDisplay>>,
    submit_control: Option<Arc<dyn SubmitControl>>,
    result_area: Option<Arc<dyn ResultArea>>,
    transport: Option<Arc<dyn SubmitTransport>>,
    retry: Option<RetryScheduler>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(mut self, specs: Vec<FieldSpec>) -> Self {
        self.fields = Some(specs);
        self
    }

    /// Take the field list from untyped JSON, which must be an array of
    /// `{"name": ..., "label": ...}` objects
    pub fn fields_json(self, value: &Value) -> FormResult<Self> {
        let entries = value
            .as_array()
            .ok_or_else(|| FormError::Construction("fields must be an array".to_string()))?;

        let specs = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value::<FieldSpec>(entry.clone()).map_err(|e| {
                    FormError::Construction(format!("field entry {index} is invalid: {e}"))
                })
            })
            .collect::<FormResult<Vec<_>>>()?;

        Ok(self.fields(specs))
    }

    pub fn validators(mut self, validators: ValidatorSet) -> Self {
        self.validators = Some(validators);
        self
    }

    /// Use one object for every page collaborator
    pub fn page<P>(self, page: Arc<P>) -> Self
    where
        P: ElementLookup + ErrorDisplay + SubmitControl + ResultArea + 'static,
    {
        self.lookup(page.clone())
            .error_display(page.clone())
            .submit_control(page.clone())
            .result_area(page)
    }

    pub fn lookup(mut self, lookup: Arc<dyn ElementLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn error_display(mut self, display: Arc<dyn ErrorDisplay>) -> Self {
        self.error_display = Some(display);
        self
    }

    pub fn submit_control(mut self, control: Arc<dyn SubmitControl>) -> Self {
        self.submit_control = Some(control);
        self
    }

    pub fn result_area(mut self, area: Arc<dyn ResultArea>) -> Self {
        self.result_area = Some(area);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn SubmitTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn retry_scheduler(mut self, scheduler: RetryScheduler) -> Self {
        self.retry = Some(scheduler);
        self
    }

    pub fn build(self) -> FormResult<Form> {
        let specs = self.fields.ok_or_else(|| {
            FormError::Construction("a field list is required to build a form".to_string())
        })?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = specs.iter().find(|spec| !seen.insert(spec.kind)) {
            return Err(FormError::Construction(format!(
                "field `{}` is listed more than once",
                duplicate.kind
            )));
        }

        let lookup = required(self.lookup, "element lookup")?;
        let validators = self
            .validators
            .unwrap_or_else(|| ValidatorSet::standard(DEFAULT_MAX_DIGIT_SUM));
        let fields = specs
            .into_iter()
            .map(|spec| {
                let validator = validators.get(spec.kind);
                FormField::new(spec, validator, Arc::clone(&lookup))
            })
            .collect();

        Ok(Form {
            fields,
            errors: ErrorMessages::default(),
            error_display: required(self.error_display, "error display")?,
            submit_control: required(self.submit_control, "submit control")?,
            result_area: required(self.result_area, "result area")?,
            transport: required(self.transport, "transport")?,
            retry: required(self.retry, "retry scheduler")?,
            pending_retry: None,
        })
    }
}

fn required<T>(value: Option<T>, what: &str) -> FormResult<T> {
    value.ok_or_else(|| FormError::Construction(format!("no {what} configured")))
}

/// An ordered set of fields plus the collaborators they render into
pub struct Form {
    fields: Vec<FormField>,
    errors: ErrorMessages,
    error_display: Arc<dyn ErrorDisplay>,
    submit_control: Arc<dyn SubmitControl>,
    result_area: Arc<dyn ResultArea>,
    transport: Arc<dyn SubmitTransport>,
    retry: RetryScheduler,
    pending_retry: Option<RetryHandle>,
}

impl Form {
    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, kind: FieldKind) -> Option<&FormField> {
        self.fields.iter().find(|field| field.kind == kind)
    }

    /// Messages collected since the last full validity pass
    pub fn errors(&self) -> &[String] {
        self.errors.as_slice()
    }

    pub fn validate(&self) -> FormResult<FormValidation> {
        let mut error_fields = Vec::new();
        for field in &self.fields {
            if !field.check_validity()?.valid {
                error_fields.push(field.kind);
            }
        }
        Ok(FormValidation {
            is_valid: error_fields.is_empty(),
            error_fields,
        })
    }

    pub fn data(&self) -> FormResult<FormData> {
        self.fields
            .iter()
            .map(|field| -> FormResult<(FieldKind, String)> { Ok((field.kind, field.value()?)) })
            .collect()
    }

    /// Overwrite the value of every field named in `data`
    pub fn set_data(&mut self, data: &FormData) -> FormResult<()> {
        for (kind, value) in data {
            self.set_field_value(*kind, value)?;
        }
        Ok(())
    }

    /// Like `set_data`, for an untyped JSON object. Keys that are not field
    /// kinds are skipped; values must be strings.
    pub fn set_data_json(&mut self, data: &Value) -> FormResult<()> {
        let object = data
            .as_object()
            .ok_or_else(|| FormError::Type("form data".to_string()))?;

        for (key, value) in object {
            let Ok(kind) = key.parse::<FieldKind>() else {
                debug!(key = %key, "Skipping unknown form data key");
                continue;
            };
            let text = value
                .as_str()
                .ok_or_else(|| FormError::Type(key.clone()))?;
            self.set_field_value(kind, text)?;
        }
        Ok(())
    }

    fn set_field_value(&mut self, kind: FieldKind, value: &str) -> FormResult<()> {
        if let Some(field) = self.fields.iter().find(|field| field.kind == kind) {
            field.set_value(value, &mut self.errors)?;
        }
        Ok(())
    }

    /// Apply `edit` to a field's current value and write the result back
    pub fn edit_value(&mut self, kind: FieldKind, edit: impl FnOnce(&mut String)) -> FormResult<()> {
        let Some(field) = self.fields.iter().find(|field| field.kind == kind) else {
            return Ok(());
        };
        let mut value = field.value()?;
        edit(&mut value);
        field.set_value(&value, &mut self.errors)?;
        Ok(())
    }

    /// Rebuild the error list from scratch and render it
    pub fn refresh_all_validity(&mut self) -> FormResult<()> {
        self.errors.clear();
        for field in &self.fields {
            field.refresh_validity(&mut self.errors)?;
        }
        self.error_display.render_errors(self.errors.as_slice());
        debug!(errors = self.errors.len(), "Refreshed form validity");
        Ok(())
    }

    /// Record a message unless it is already listed
    pub fn add_error_message(&mut self, message: &str) -> bool {
        self.errors.push(message)
    }

    /// Run one submission attempt
    ///
    /// Nothing is sent while any field is invalid; the control is left
    /// enabled and any pending resubmit dropped. Otherwise the submit
    /// control is disabled for the duration of the request and the reply
    /// decides what happens next:
    /// - success and error replies are shown and the control re-enabled;
    /// - a progress reply marks the result area and schedules a resubmit
    ///   with the same event, leaving the control disabled.
    pub async fn submit(&mut self, event: &SubmitEvent) -> FormResult<SubmitOutcome> {
        self.refresh_all_validity()?;

        let validation = self.validate()?;
        if !validation.is_valid {
            debug!(fields = ?validation.error_fields, "Form invalid, not submitting");
            // A resubmit may land here after the user broke a field mid-cycle
            self.cancel_pending_retry();
            self.submit_control.set_disabled(false);
            return Ok(SubmitOutcome::Rejected {
                error_fields: validation.error_fields,
            });
        }

        let json = serde_json::to_string(&self.data()?)?;
        self.submit_control.set_disabled(true);
        info!(method = %event.method, url = %event.action, "Submitting form");

        let response = self
            .transport
            .submit(&event.method, &event.action, json)
            .await;

        let outcome = match response {
            Ok(SubmitResult::Success) => {
                self.result_area.show("Success", ResultState::Success);
                self.submit_control.set_disabled(false);
                SubmitOutcome::Succeeded
            }
            Ok(SubmitResult::Error { reason }) => {
                self.result_area.show(&reason, ResultState::Error);
                self.submit_control.set_disabled(false);
                SubmitOutcome::Failed { reason }
            }
            Ok(SubmitResult::Progress { timeout }) => {
                if self.result_area.state() != Some(ResultState::Progress) {
                    self.result_area.mark(ResultState::Progress);
                }
                let delay = Duration::from_millis(timeout);
                self.schedule_retry(event.clone(), delay);
                SubmitOutcome::RetryScheduled { delay }
            }
            Err(err) => {
                warn!(error = %err, "Form submission failed");
                let reason = format!("{err:#}");
                self.result_area.show(&reason, ResultState::Error);
                self.submit_control.set_disabled(false);
                SubmitOutcome::Unreachable { reason }
            }
        };

        Ok(outcome)
    }

    fn schedule_retry(&mut self, event: SubmitEvent, delay: Duration) {
        self.cancel_pending_retry();
        debug!(?delay, "Scheduling resubmit");
        self.pending_retry = Some(self.retry.schedule(event, delay));
    }

    /// Cancel a scheduled resubmit; returns whether one was pending
    pub fn cancel_pending_retry(&mut self) -> bool {
        match self.pending_retry.take() {
            Some(handle) if !handle.is_finished() => {
                handle.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn has_pending_retry(&self) -> bool {
        self.pending_retry
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Form {
    fn drop(&mut self) {
        self.retry.shutdown();
    }
}
