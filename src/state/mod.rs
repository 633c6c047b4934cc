//! Application state module

mod app_state;
mod editor;

pub use app_state::*;
pub use editor::*;
