//! Modal dialog for the front of the error queue

use super::base::{render_dialog, DialogConfig};
use crate::state::AppState;
use crate::ui::widgets::key_hint;
use ratatui::{style::Color, text::Span, Frame};

const MAX_WIDTH: u16 = 60;

/// Show the oldest queued error, if any, with how many remain behind it
pub fn render_error_dialog(frame: &mut Frame, state: &AppState) {
    let Some(message) = state.current_error() else {
        return;
    };
    let queued = state.errors.len();
    let title = error_title(queued);

    let mut hint: Vec<Span> = Vec::new();
    if queued > 1 {
        hint.extend(key_hint("Enter", " next  "));
    } else {
        hint.extend(key_hint("Enter", " dismiss  "));
    }
    hint.extend(key_hint("Esc", " dismiss"));

    render_dialog(
        frame,
        DialogConfig {
            title: &title,
            title_color: Color::Red,
            border_color: Color::Red,
            message,
            hint: Some(hint),
            max_width: MAX_WIDTH,
        },
    );
}

fn error_title(queued: usize) -> String {
    if queued > 1 {
        format!("Error (1 of {queued})")
    } else {
        "Error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_counts_queued_errors() {
        assert_eq!(error_title(1), "Error");
        assert_eq!(error_title(3), "Error (1 of 3)");
    }
}
