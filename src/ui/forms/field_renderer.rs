//! Field rendering utilities for forms

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// A bordered input box
pub struct FieldBox<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub is_active: bool,
    pub is_multiline: bool,
    /// Show the text cursor when active
    pub editable: bool,
    /// Border color override, e.g. red for a field with violations
    pub accent: Option<Color>,
}

impl<'a> FieldBox<'a> {
    pub fn new(label: &'a str, value: &'a str, is_active: bool) -> Self {
        Self {
            label,
            value,
            is_active,
            is_multiline: false,
            editable: true,
            accent: None,
        }
    }

    pub fn multiline(mut self, is_multiline: bool) -> Self {
        self.is_multiline = is_multiline;
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn accent(mut self, color: Option<Color>) -> Self {
        self.accent = color;
        self
    }
}

/// Draw a form field box: cyan when active, "(empty)" placeholder when blank
pub fn draw_field(frame: &mut Frame, area: Rect, field: FieldBox) {
    let base_color = if field.is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let text_style = if field.is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let border_style = Style::default().fg(field.accent.unwrap_or(base_color));

    let display_value = if field.value.is_empty() && !field.is_active {
        "(empty)"
    } else {
        field.value
    };
    let placeholder_style = if field.value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        text_style
    };

    let cursor = if field.is_active && field.editable {
        Span::styled("▌", Style::default().fg(Color::Cyan))
    } else {
        Span::raw("")
    };

    let content = if field.is_multiline {
        let mut lines: Vec<Line> = display_value
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), placeholder_style)))
            .collect();
        match lines.last_mut() {
            Some(last) => last.spans.push(cursor),
            None => lines.push(Line::from(cursor)),
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display_value, placeholder_style),
            cursor,
        ]))
    };

    let block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

/// Draw a line of dim help text
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
