//! Sign-up form view

use super::field_renderer::{draw_field, FieldView};
use crate::app::App;
use crate::page::{BoundElement, ResultState, SubmitControl};
use crate::state::{digit_sum, FieldKind, FormField};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const FIELD_HEIGHT: u16 = 3;
const RESULT_HEIGHT: u16 = 3;

/// Draw the whole form: inputs, submit button, error list and result area
pub fn draw_signup_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Sign up ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = app.form().fields();

    let mut constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Length(BUTTON_HEIGHT));
    constraints.push(Constraint::Length(RESULT_HEIGHT));
    constraints.push(Constraint::Min(0)); // Errors

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (index, field) in fields.iter().enumerate() {
        draw_form_field(frame, chunks[index], app, index, field);
    }

    let page = app.page();
    let enabled = !page.is_disabled();
    let label = if enabled { "Submit" } else { "Sending..." };
    let button_area = Rect {
        width: chunks[fields.len()].width.min(16),
        ..chunks[fields.len()]
    };
    render_button(
        frame,
        button_area,
        label,
        app.active_kind().is_none(),
        enabled,
    );

    draw_result(frame, chunks[fields.len() + 1], app);
    draw_errors(frame, chunks[fields.len() + 2], app);
}

fn draw_form_field(frame: &mut Frame, area: Rect, app: &App, index: usize, field: &FormField) {
    let element = app.page().element(field.name());
    let value = element.as_ref().map(|e| e.value()).unwrap_or_default();
    let is_invalid = element.as_ref().is_some_and(|e| e.has_error_marker());

    let hint = (field.kind == FieldKind::Phone && !value.is_empty())
        .then(|| format!("digits {}/{}", digit_sum(&value), app.max_digit_sum));

    let view = FieldView {
        label: &field.label,
        value: &value,
        hint,
        is_active: app.state.is_field_active(index),
        is_invalid,
    };
    draw_field(frame, area, &view);
}

fn draw_result(frame: &mut Frame, area: Rect, app: &App) {
    let result = app.page().result();
    let (title, color) = match result.state {
        Some(ResultState::Success) => ("Success", Color::Green),
        Some(ResultState::Error) => ("Error", Color::Red),
        Some(ResultState::Progress) => ("In progress", Color::Yellow),
        None => ("Result", Color::DarkGray),
    };

    // The progress marker leaves the previous reply's text in place
    let text = match result.state {
        Some(ResultState::Progress) => "Waiting for the server...",
        _ => result.text.as_str(),
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(paragraph, area);
}

fn draw_errors(frame: &mut Frame, area: Rect, app: &App) {
    let errors = app.page().errors();
    if errors.is_empty() {
        return;
    }

    let lines: Vec<Line> = errors
        .iter()
        .map(|message| {
            Line::from(vec![
                Span::styled(" • ", Style::default().fg(Color::Red)),
                Span::raw(message.as_str()),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(
                " Please fix ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::config::FormConfig;
    use crate::page::{ResultArea, ResultState};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let backend = TestBackend::new(60, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| crate::ui::draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_draws_labels_and_button() {
        let app = App::new(&FormConfig::default()).unwrap();
        let screen = render(&app);
        assert!(screen.contains("FIO"));
        assert!(screen.contains("EMAIL"));
        assert!(screen.contains("PHONE"));
        assert!(screen.contains("Submit"));
    }

    #[tokio::test]
    async fn test_draws_error_list_after_rejected_submit() {
        let mut app = App::new(&FormConfig::default()).unwrap();
        app.submit().await.unwrap();
        let screen = render(&app);
        assert!(screen.contains("Please fix"));
    }

    #[tokio::test]
    async fn test_phone_hint_shows_digit_sum() {
        let mut app = App::new(&FormConfig::default()).unwrap();
        app.state.active_index = 2;
        for c in "+7(111)".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .await
                .unwrap();
        }
        let screen = render(&app);
        assert!(screen.contains("digits 10/30"));
    }

    #[tokio::test]
    async fn test_progress_hides_previous_reply_text() {
        let app = App::new(&FormConfig::default()).unwrap();
        app.page().show("Number already registered", ResultState::Error);
        app.page().mark(ResultState::Progress);
        let screen = render(&app);
        assert!(screen.contains("Waiting for the server"));
        assert!(!screen.contains("Number already registered"));
    }

    #[tokio::test]
    async fn test_draws_result_text() {
        let app = App::new(&FormConfig::default()).unwrap();
        app.page().show("Success", ResultState::Success);
        let screen = render(&app);
        assert!(screen.contains("Success"));
    }
}
