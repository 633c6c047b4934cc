//! Confirmation dialog for deleting a saved form

use super::base::{centered_rect, dialog_block, truncate_string};
use crate::state::PendingDelete;
use crate::ui::widgets::key_hint;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

const DIALOG_WIDTH: u16 = 50;
const DIALOG_HEIGHT: u16 = 10;

pub fn render_confirm_dialog(frame: &mut Frame, pending: &PendingDelete) {
    let dialog_area = centered_rect(frame.area(), DIALOG_WIDTH, DIALOG_HEIGHT);
    frame.render_widget(Clear, dialog_area);

    let name = truncate_string(&pending.name, (DIALOG_WIDTH - 8) as usize);

    let mut content = vec![
        Line::from(Span::styled(
            "Confirm Delete",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Are you sure you want to delete form"),
        Line::from(vec![
            Span::styled(format!("'{name}'"), Style::default().fg(Color::Cyan)),
            Span::raw("?"),
        ]),
        Line::from(""),
    ];

    // false = Cancel, true = Delete
    for (is_delete, label, color) in [(false, "Cancel", Color::White), (true, "Delete", Color::Red)]
    {
        let is_selected = pending.selected_option == is_delete;
        let prefix = if is_selected { "▸ " } else { "  " };
        let style = if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        content.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
    }

    content.push(Line::from(""));
    let mut hint = Vec::new();
    hint.extend(key_hint("↑↓", " select  "));
    hint.extend(key_hint("Enter", " confirm  "));
    hint.extend(key_hint("Esc", " cancel"));
    content.push(Line::from(hint));

    let dialog = Paragraph::new(content)
        .block(dialog_block(Color::Red))
        .style(Style::new().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}
