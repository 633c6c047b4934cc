//! Picker for the type of a new field

use super::base::{centered_rect, dialog_block};
use crate::state::type_choices;
use crate::ui::widgets::{key_hint, selection_style};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

pub fn render_type_picker(frame: &mut Frame, selected: usize) {
    let choices = type_choices();
    // title + blank + choices + blank + hint + borders
    let height = choices.len() as u16 + 6;
    let dialog_area = centered_rect(frame.area(), 36, height);
    frame.render_widget(Clear, dialog_area);

    let mut content = vec![
        Line::from(Span::styled(
            "Add Field",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (idx, field_type) in choices.iter().enumerate() {
        let (prefix, style) = selection_style(idx == selected);
        content.push(Line::from(Span::styled(
            format!("{prefix}{}", field_type.label()),
            style,
        )));
    }

    content.push(Line::from(""));
    let mut hint = Vec::new();
    hint.extend(key_hint("j/k", " select  "));
    hint.extend(key_hint("Enter", " add  "));
    hint.extend(key_hint("Esc", " cancel"));
    content.push(Line::from(hint));

    let dialog = Paragraph::new(content)
        .block(dialog_block(Color::Cyan))
        .style(Style::new().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}
