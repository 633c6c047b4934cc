//! Form schema model
//!
//! - `field`: single field definitions and the field factory
//! - `schema`: the form schema aggregate and its structural edits
//! - `value`: values entered while filling in a form
//! - `lint`: non-blocking diagnostics for schema definitions

mod field;
mod lint;
mod schema;
mod value;

pub use field::{FieldType, FormField, ValidationRules};
pub use lint::{lint, LintIssue};
pub use schema::{FormSchema, MoveDirection, SchemaSummary};
pub use value::{format_number, FieldValue, FieldValues};
