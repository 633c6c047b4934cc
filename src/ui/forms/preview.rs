//! Fill-in preview of a form

use super::field_renderer::{draw_field, FieldBox};
use crate::app::App;
use formsmith::presentation::{Control, FieldView};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const TEXTAREA_HEIGHT: u16 = 5;
const INPUT_HEIGHT: u16 = 3;

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(preview) = app.state.preview.as_ref() else {
        return;
    };
    let session = &preview.session;

    let block = Block::default()
        .title(format!(" Preview - {} ", session.schema().name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let views = session.views();
    if views.is_empty() {
        let message =
            Paragraph::new("This form has no fields.").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(message, inner);
        return;
    }

    // Annotation lines under each field: violations, then derivation errors
    let notes: Vec<Vec<Line>> = views
        .iter()
        .map(|view| {
            let mut lines: Vec<Line> = view
                .violations
                .iter()
                .map(|v| Line::from(Span::styled(format!("  {v}"), Style::default().fg(Color::Red))))
                .collect();
            if let Some(failure) = session.failures().iter().find(|f| f.field_id == view.id) {
                lines.push(Line::from(Span::styled(
                    format!("  Error evaluating formula: {}", failure.error),
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines
        })
        .collect();

    let heights: Vec<u16> = views
        .iter()
        .zip(&notes)
        .map(|(view, lines)| box_height(view) + lines.len() as u16)
        .collect();

    let first = first_visible(&heights, preview.active_field, inner.height);
    let mut y = inner.y;
    for idx in first..views.len() {
        let height = heights[idx];
        if y + height > inner.y + inner.height {
            break;
        }
        let view = &views[idx];
        let box_area = Rect::new(inner.x, y, inner.width, box_height(view));
        draw_view(frame, box_area, view, idx == preview.active_field);

        if !notes[idx].is_empty() {
            let notes_area = Rect::new(
                inner.x,
                y + box_area.height,
                inner.width,
                notes[idx].len() as u16,
            );
            frame.render_widget(Paragraph::new(notes[idx].clone()), notes_area);
        }
        y += height;
    }
}

fn box_height(view: &FieldView) -> u16 {
    if view.control == Control::TextArea {
        TEXTAREA_HEIGHT
    } else {
        INPUT_HEIGHT
    }
}

/// First field to draw so that `active` fits in `available` rows
fn first_visible(heights: &[u16], active: usize, available: u16) -> usize {
    let mut first = active.min(heights.len().saturating_sub(1));
    let mut used = heights.get(first).copied().unwrap_or(0);
    while first > 0 && used + heights[first - 1] <= available {
        first -= 1;
        used += heights[first];
    }
    first
}

fn draw_view(frame: &mut Frame, area: Rect, view: &FieldView, is_active: bool) {
    let label = match (&view.control, view.required) {
        (Control::ReadOnly, _) => format!("{} (computed)", view.label),
        (_, true) => format!("{} *", view.label),
        (_, false) => view.label.clone(),
    };
    let value = match &view.control {
        Control::Select { options } | Control::RadioGroup { options } => {
            choice_display(options, &view.display_value())
        }
        _ => view.display_value(),
    };
    let accent = (!view.violations.is_empty()).then_some(Color::Red);

    draw_field(
        frame,
        area,
        FieldBox::new(&label, &value, is_active)
            .multiline(view.control == Control::TextArea)
            .editable(view.control.accepts_text())
            .accent(accent),
    );
}

/// Options inline with the chosen one marked, e.g. "(•) S  ( ) M"
fn choice_display(options: &[String], current: &str) -> String {
    if options.is_empty() {
        return "(no options)".to_string();
    }
    options
        .iter()
        .map(|option| {
            let mark = if option == current { "(•)" } else { "( )" };
            format!("{mark} {option}")
        })
        .collect::<Vec<_>>()
        .join("  ")
}
