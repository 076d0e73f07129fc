//! Application state definitions

use super::forms::SubmitOutcome;

/// What the cursor is on: one of the fields, or the submit button after them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(usize),
    Submit,
}

/// UI state that lives outside the form itself
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Index into fields followed by the submit button (== field_count)
    pub active_index: usize,
    /// Number of form fields
    pub field_count: usize,
    /// One-line feedback shown in the status bar
    pub status_message: Option<String>,
    /// How the last submit call ended
    pub last_outcome: Option<SubmitOutcome>,
}

impl AppState {
    pub fn new(field_count: usize) -> Self {
        Self {
            field_count,
            ..Default::default()
        }
    }

    fn focus_count(&self) -> usize {
        self.field_count + 1
    }

    pub fn focus(&self) -> Focus {
        if self.active_index < self.field_count {
            Focus::Field(self.active_index)
        } else {
            Focus::Submit
        }
    }

    pub fn next_focus(&mut self) {
        self.active_index = (self.active_index + 1) % self.focus_count();
    }

    pub fn prev_focus(&mut self) {
        if self.active_index == 0 {
            self.active_index = self.focus_count() - 1;
        } else {
            self.active_index -= 1;
        }
    }

    pub fn focus_submit(&mut self) {
        self.active_index = self.field_count;
    }

    pub fn is_field_active(&self, index: usize) -> bool {
        self.focus() == Focus::Field(index)
    }

    /// Record a submit outcome and derive the status line from it
    pub fn record_outcome(&mut self, outcome: SubmitOutcome) {
        self.status_message = Some(match &outcome {
            SubmitOutcome::Rejected { error_fields } => {
                format!("Fix {} field(s) before submitting", error_fields.len())
            }
            SubmitOutcome::Succeeded => "Submitted".to_string(),
            SubmitOutcome::Failed { .. } => "Submission refused".to_string(),
            SubmitOutcome::RetryScheduled { delay } => {
                format!("Server busy, retrying in {} ms", delay.as_millis())
            }
            SubmitOutcome::Unreachable { .. } => "Server unreachable".to_string(),
        });
        self.last_outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldKind;
    use std::time::Duration;

    #[test]
    fn test_starts_on_first_field() {
        let state = AppState::new(3);
        assert_eq!(state.focus(), Focus::Field(0));
        assert!(state.is_field_active(0));
    }

    #[test]
    fn test_next_focus_reaches_submit_then_wraps() {
        let mut state = AppState::new(3);
        state.next_focus();
        state.next_focus();
        state.next_focus();
        assert_eq!(state.focus(), Focus::Submit);
        state.next_focus();
        assert_eq!(state.focus(), Focus::Field(0));
    }

    #[test]
    fn test_prev_focus_wraps_to_submit() {
        let mut state = AppState::new(3);
        state.prev_focus();
        assert_eq!(state.focus(), Focus::Submit);
        state.prev_focus();
        assert_eq!(state.focus(), Focus::Field(2));
    }

    #[test]
    fn test_form_without_fields_always_focuses_submit() {
        let mut state = AppState::new(0);
        assert_eq!(state.focus(), Focus::Submit);
        state.next_focus();
        assert_eq!(state.focus(), Focus::Submit);
    }

    #[test]
    fn test_focus_submit() {
        let mut state = AppState::new(3);
        state.focus_submit();
        assert_eq!(state.focus(), Focus::Submit);
    }

    #[test]
    fn test_record_outcome_sets_status() {
        let mut state = AppState::new(3);
        state.record_outcome(SubmitOutcome::Rejected {
            error_fields: vec![FieldKind::Phone],
        });
        assert_eq!(
            state.status_message.as_deref(),
            Some("Fix 1 field(s) before submitting")
        );

        state.record_outcome(SubmitOutcome::RetryScheduled {
            delay: Duration::from_millis(1500),
        });
        assert_eq!(
            state.status_message.as_deref(),
            Some("Server busy, retrying in 1500 ms")
        );
        assert!(matches!(
            state.last_outcome,
            Some(SubmitOutcome::RetryScheduled { .. })
        ));
    }
}
