//! Reusable UI widget helpers

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{List, ListState},
    Frame,
};

/// Render a list scrolled so that `selected_index` stays visible
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, list: List, selected_index: usize) {
    let mut list_state = ListState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Key name followed by its description, as used in dialog hint lines
pub fn key_hint<'a>(key: &'a str, description: &'a str) -> [Span<'a>; 2] {
    [
        Span::styled(
            key,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(description, Style::default().fg(Color::DarkGray)),
    ]
}

/// Prefix and row style for a list entry
pub fn selection_style(is_selected: bool) -> (&'static str, Style) {
    if is_selected {
        ("▸ ", Style::default().bg(Color::DarkGray))
    } else {
        ("  ", Style::default())
    }
}
