//! Application state and core logic

use crate::api::HttpTransport;
use crate::config::FormConfig;
use crate::page::{MemoryPage, SubmitControl};
use crate::platform::SUBMIT_MODIFIER;
use crate::state::{
    AppState, FieldKind, FieldSpec, Focus, Form, FormEvent, RetryScheduler, SubmitEvent,
    SubmitOutcome, ValidatorSet,
};
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// A form wired to an in-memory page, plus the channel its resubmits arrive on
pub struct MountedForm {
    pub form: Form,
    pub page: Arc<MemoryPage>,
    pub events: mpsc::UnboundedReceiver<FormEvent>,
    pub submit_event: SubmitEvent,
}

impl MountedForm {
    /// Build the form described by `config`, with one page element per field
    pub fn new(config: &FormConfig) -> Result<Self> {
        let page = Arc::new(MemoryPage::new());
        let transport = HttpTransport::new(config.request_timeout())?;
        let (scheduler, events) = RetryScheduler::new();

        let builder = Form::builder();
        let builder = match &config.fields {
            Some(fields) => builder
                .fields_json(fields)
                .context("invalid `fields` in config")?,
            None => builder.fields(FieldSpec::defaults()),
        };
        let form = builder
            .validators(ValidatorSet::standard(config.max_digit_sum()))
            .page(Arc::clone(&page))
            .transport(Arc::new(transport))
            .retry_scheduler(scheduler)
            .build()?;

        for field in form.fields() {
            page.add_element(field.name());
        }

        Ok(Self {
            form,
            page,
            events,
            submit_event: SubmitEvent::new(&config.submit_method(), &config.submit_url()),
        })
    }

    /// Submit and keep following resubmit requests until the cycle ends
    pub async fn submit_to_completion(&mut self) -> Result<SubmitOutcome> {
        let mut outcome = self.form.submit(&self.submit_event).await?;
        while !outcome.is_final() {
            let Some(FormEvent::Resubmit(event)) = self.events.recv().await else {
                anyhow::bail!("resubmit was cancelled");
            };
            outcome = self.form.submit(&event).await?;
        }
        Ok(outcome)
    }
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// The form and the page it renders into
    pub mounted: MountedForm,
    /// Phone digit-sum ceiling, shown as a hint next to the phone field
    pub max_digit_sum: u32,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(config: &FormConfig) -> Result<Self> {
        let mounted = MountedForm::new(config)?;
        let state = AppState::new(mounted.form.fields().len());
        Ok(Self {
            state,
            mounted,
            max_digit_sum: config.max_digit_sum(),
            quit: false,
        })
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn form(&self) -> &Form {
        &self.mounted.form
    }

    pub fn page(&self) -> &MemoryPage {
        &self.mounted.page
    }

    /// Kind of the field under the cursor, if the cursor is on a field
    pub fn active_kind(&self) -> Option<FieldKind> {
        match self.state.focus() {
            Focus::Field(index) => self.form().fields().get(index).map(|f| f.kind),
            Focus::Submit => None,
        }
    }

    /// Handle one key press
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let submit_combo = ctrl || key.modifiers.contains(SUBMIT_MODIFIER);

        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if ctrl => self.quit = true,
            KeyCode::Tab | KeyCode::Down => self.state.next_focus(),
            KeyCode::BackTab | KeyCode::Up => self.state.prev_focus(),
            KeyCode::Char('s') if submit_combo => self.submit().await?,
            KeyCode::Char('u') if ctrl => self.edit_active(|value| value.clear())?,
            KeyCode::Enter => match self.state.focus() {
                Focus::Submit => self.submit().await?,
                Focus::Field(_) => self.state.next_focus(),
            },
            KeyCode::Char(c) if !submit_combo => self.edit_active(|value| value.push(c))?,
            KeyCode::Backspace => self.edit_active(|value| {
                value.pop();
            })?,
            _ => {}
        }
        Ok(())
    }

    fn edit_active(&mut self, edit: impl FnOnce(&mut String)) -> Result<()> {
        if let Some(kind) = self.active_kind() {
            self.mounted.form.edit_value(kind, edit)?;
        }
        Ok(())
    }

    /// Press the submit button; ignored while it is disabled
    pub async fn submit(&mut self) -> Result<()> {
        if self.mounted.page.is_disabled() {
            debug!("Submit ignored, button disabled");
            return Ok(());
        }
        let event = self.mounted.submit_event.clone();
        self.run_submit(&event).await
    }

    async fn run_submit(&mut self, event: &SubmitEvent) -> Result<()> {
        let outcome = self.mounted.form.submit(event).await?;
        if let SubmitOutcome::Rejected { error_fields } = &outcome {
            // Jump to the first field that needs fixing
            if let Some(index) = error_fields.first().and_then(|kind| {
                self.form().fields().iter().position(|f| f.kind == *kind)
            }) {
                self.state.active_index = index;
            }
        }
        self.state.record_outcome(outcome);
        Ok(())
    }

    /// Process resubmits that came due since the last tick
    pub async fn poll_form_events(&mut self) -> Result<()> {
        while let Ok(FormEvent::Resubmit(event)) = self.mounted.events.try_recv() {
            self.run_submit(&event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::BoundElement;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app() -> App {
        App::new(&FormConfig::default()).unwrap()
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_mount_creates_element_per_field() {
        let app = app();
        for kind in FieldKind::ALL {
            assert!(app.page().element(kind.wire_name()).is_some());
        }
        assert_eq!(app.state.field_count, 3);
    }

    #[tokio::test]
    async fn test_mount_uses_configured_fields() {
        let config = FormConfig {
            fields: Some(serde_json::json!([{"name": "email", "label": "Mail"}])),
            ..Default::default()
        };
        let app = App::new(&config).unwrap();
        assert_eq!(app.form().fields().len(), 1);
        assert_eq!(app.form().fields()[0].label, "Mail");
        assert!(app.page().element("fio").is_none());
    }

    #[tokio::test]
    async fn test_mount_rejects_malformed_fields() {
        let config = FormConfig {
            fields: Some(serde_json::json!({"name": "email"})),
            ..Default::default()
        };
        assert!(App::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_typing_edits_active_field() {
        let mut app = app();
        type_text(&mut app, "Ivanov Ivan Ivanovich").await;

        let element = app.page().element("fio").unwrap();
        assert_eq!(element.value(), "Ivanov Ivan Ivanovich");
        assert!(!element.has_error_marker());
    }

    #[tokio::test]
    async fn test_backspace_and_clear() {
        let mut app = app();
        type_text(&mut app, "abc").await;
        app.handle_key(key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(app.page().element("fio").unwrap().value(), "ab");

        app.handle_key(ctrl('u')).await.unwrap();
        assert_eq!(app.page().element("fio").unwrap().value(), "");
    }

    #[tokio::test]
    async fn test_tab_moves_typing_to_next_field() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut app, "aa@ya.ru").await;

        assert_eq!(app.page().element("email").unwrap().value(), "aa@ya.ru");
        assert_eq!(app.page().element("fio").unwrap().value(), "");
    }

    #[tokio::test]
    async fn test_typing_on_submit_button_is_ignored() {
        let mut app = app();
        app.state.focus_submit();
        type_text(&mut app, "x").await;
        for kind in FieldKind::ALL {
            assert_eq!(app.page().element(kind.wire_name()).unwrap().value(), "");
        }
    }

    #[tokio::test]
    async fn test_invalid_submit_focuses_first_bad_field() {
        let mut app = app();
        type_text(&mut app, "Ivanov Ivan Ivanovich").await;
        app.state.focus_submit();

        app.handle_key(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.state.focus(), Focus::Field(1));
        assert!(matches!(
            app.state.last_outcome,
            Some(SubmitOutcome::Rejected { .. })
        ));
        assert_eq!(app.page().errors().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_ignored_while_disabled() {
        let mut app = app();
        app.mounted.page.set_disabled(true);

        app.handle_key(ctrl('s')).await.unwrap();

        assert!(app.state.last_outcome.is_none());
    }

    #[tokio::test]
    async fn test_escape_quits() {
        let mut app = app();
        assert!(!app.should_quit());
        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert!(app.should_quit());
    }
}
