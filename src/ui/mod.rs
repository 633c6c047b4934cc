//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod my_forms;
mod widgets;

use crate::app::App;
use crate::state::View;
use components::{render_confirm_dialog, render_error_dialog, render_type_picker};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let main_area = layout::create_layout(frame.area());

    match app.state.current_view {
        View::MyForms => my_forms::draw(frame, main_area, app),
        View::Builder => forms::draw_builder(frame, main_area, app),
        View::FieldEditor => forms::draw_field_editor(frame, main_area, app),
        View::Preview => forms::draw_preview(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);

    // Overlays, topmost last
    if let Some(selected) = app.state.type_picker {
        render_type_picker(frame, selected);
    }
    if let Some(pending) = &app.state.pending_delete {
        render_confirm_dialog(frame, pending);
    }
    render_error_dialog(frame, &app.state);
}
