//! Form views
//!
//! - `builder`: form name, field list and diagnostics
//! - `field_editor`: one field's definition
//! - `preview`: filling in a form
//! - `field_renderer`: shared input box

mod builder;
mod field_editor;
mod field_renderer;
mod preview;

pub use builder::draw as draw_builder;
pub use field_editor::draw as draw_field_editor;
pub use preview::draw as draw_preview;
