//! Editing sessions: the form being built and a form being filled in

pub mod fill;
pub mod workspace;

pub use fill::{FillSession, SubmittedData};
pub use workspace::Workspace;
