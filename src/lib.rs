//! formsmith: build form schemas, fill them in, validate and derive values
//!
//! - `model`: fields, schemas and field values
//! - `validation`: per-field rule checks
//! - `formula` / `derive`: the formula language and the derivation engine
//! - `store`: schema storage and the catalog operations
//! - `session`: the form being built and forms being filled in
//! - `presentation`: control descriptors for renderers

pub mod config;
pub mod derive;
pub mod error;
pub mod formula;
pub mod model;
pub mod presentation;
pub mod session;
pub mod store;
pub mod validation;

pub use config::AppConfig;
pub use derive::{derive_all, DerivationEngine, DerivationOutcome, EvaluationOrder};
pub use error::{DerivationError, FormulaError, SchemaError};
pub use model::{FieldType, FieldValue, FieldValues, FormField, FormSchema, ValidationRules};
pub use validation::{validate, Validator, Violation};
