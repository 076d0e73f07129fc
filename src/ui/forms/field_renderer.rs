//! Field rendering utilities for forms

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// What a single input box shows
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a str,
    /// Right-aligned note in the border (e.g. digit sum for phones)
    pub hint: Option<String>,
    pub is_active: bool,
    /// The bound element carries the error marker
    pub is_invalid: bool,
}

/// Draw one input box. Invalid fields get a red border regardless of focus.
pub fn draw_field(frame: &mut Frame, area: Rect, view: &FieldView<'_>) {
    let accent = if view.is_invalid {
        Color::Red
    } else if view.is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let text_style = if view.is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };

    let display_value = if view.value.is_empty() && !view.is_active {
        "(empty)"
    } else {
        view.value
    };

    let cursor = if view.is_active { "▌" } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_value, text_style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let mut block = Block::default()
        .title(format!(" {} ", view.label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    if let Some(hint) = &view.hint {
        block = block.title(
            Line::from(Span::styled(
                format!(" {hint} "),
                Style::default().fg(accent),
            ))
            .right_aligned(),
        );
    }

    frame.render_widget(content.block(block), area);
}
