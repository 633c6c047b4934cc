//! Layout components (content area, status bar)

use crate::app::App;
use crate::platform::SAVE_SHORTCUT;
use crate::state::{BuilderFocus, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Content area above the one-line status bar
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", view_title(app.state.current_view)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(get_view_hints(app), Style::default().fg(Color::Black)),
    ];

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Quit hint on the right
    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

fn view_title(view: View) -> &'static str {
    match view {
        View::MyForms => "My Forms",
        View::Builder => "Builder",
        View::FieldEditor => "Field",
        View::Preview => "Preview",
    }
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    match app.state.current_view {
        View::MyForms => "j/k:nav  Enter:fill  e:edit  d:delete  n:new  q:quit".to_string(),
        View::Builder if app.state.type_picker.is_some() => {
            "j/k:type  Enter:add  Esc:cancel".to_string()
        }
        View::Builder => match app.state.builder_focus {
            BuilderFocus::Name => format!("type name  Tab:fields  {SAVE_SHORTCUT}:save  Esc:back"),
            BuilderFocus::Fields => format!(
                "j/k:nav  a:add  Enter:edit  J/K:move  x:remove  r:required  p:preview  {SAVE_SHORTCUT}:save  Esc:back"
            ),
        },
        View::FieldEditor => format!("Tab/↓:next  ⇧Tab/↑:prev  {SAVE_SHORTCUT}:apply  Esc:cancel"),
        View::Preview => format!("Tab:next  ⇧Tab:prev  {SAVE_SHORTCUT}:submit  Esc:back"),
    }
}
