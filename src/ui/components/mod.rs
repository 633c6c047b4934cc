//! Reusable UI components

mod dialog;

pub use dialog::{render_confirm_dialog, render_error_dialog, render_type_picker};
