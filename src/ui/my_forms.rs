//! Saved forms list

use super::widgets::{render_scrollable_list, selection_style};
use crate::app::App;
use chrono::DateTime;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let forms = &app.state.forms;
    let block = Block::default()
        .title(format!(" My Forms ({}) ", forms.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if forms.is_empty() {
        let content = Paragraph::new("No saved forms yet.\nPress 'n' to build a new form.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = forms
        .iter()
        .enumerate()
        .map(|(idx, form)| {
            let (prefix, style) = selection_style(idx == app.state.selected_index);
            let line = Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(&form.name, style),
                Span::raw("  "),
                Span::styled(
                    format_created_at(&form.created_at),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    render_scrollable_list(frame, area, list, app.state.selected_index);
}

/// Stored RFC 3339 timestamp as "YYYY-MM-DD HH:MM"; other text is shown as-is
fn format_created_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_created_at() {
        assert_eq!(
            format_created_at("2024-03-01T09:30:15.123+00:00"),
            "2024-03-01 09:30"
        );
        assert_eq!(format_created_at("yesterday"), "yesterday");
    }
}
