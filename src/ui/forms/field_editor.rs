//! Editor for a single field definition

use super::field_renderer::draw_help_text;
use crate::app::App;
use crate::state::EditorRow;
use crate::ui::widgets::render_scrollable_list;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

const LABEL_WIDTH: usize = 36;

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(editor) = app.state.field_editor.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let items: Vec<ListItem> = EditorRow::ALL
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let is_active = idx == editor.active_row;
            let label_style = if is_active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let mut spans = vec![
                Span::styled(if is_active { "▸ " } else { "  " }, label_style),
                Span::styled(format!("{:<width$}", row.label(), width = LABEL_WIDTH), label_style),
                Span::styled(editor.display_value(*row), Style::default().fg(Color::White)),
            ];
            if is_active && row.is_text() {
                spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Edit Field - {} ", editor.draft.display_label());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, chunks[0], list, editor.active_row);

    let help = match editor.active() {
        EditorRow::DerivedFrom => derived_from_hint(app, &editor.draft.id),
        row if row.is_text() => " Type to edit  Backspace:delete".to_string(),
        _ => " Space/Enter/←→:change".to_string(),
    };
    draw_help_text(frame, chunks[1], &help);
}

/// Ids the field may be derived from, with their labels
fn derived_from_hint(app: &App, field_id: &str) -> String {
    let candidates: Vec<String> = app
        .state
        .workspace
        .schema()
        .derived_from_candidates(field_id)
        .iter()
        .map(|f| format!("{} ({})", f.id, f.display_label()))
        .collect();
    if candidates.is_empty() {
        " No other fields to derive from".to_string()
    } else {
        format!(" Available: {}", candidates.join(", "))
    }
}
