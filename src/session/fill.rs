//! Filling in a saved form
//!
//! A fill session holds the values of one form. Every change to an input
//! re-runs the derivation pass; submitting validates every field and, when
//! nothing is wrong, hands back the entered data keyed by field label.

use crate::derive::{DerivationEngine, DerivationFailure};
use crate::model::{FieldValue, FieldValues, FormField, FormSchema};
use crate::presentation::FieldView;
use crate::validation::{Validator, Violation};
use serde_json::{Map, Value as JsonValue};

/// Submitted values keyed by field label
pub type SubmittedData = Map<String, JsonValue>;

#[derive(Debug, Clone)]
pub struct FillSession {
    schema: FormSchema,
    values: FieldValues,
    engine: DerivationEngine,
    validator: Validator,
    failures: Vec<DerivationFailure>,
    violations: Vec<Violation>,
}

impl FillSession {
    /// Start filling `schema`: every field begins at its default value, then
    /// derived fields are computed once
    pub fn new(schema: FormSchema, engine: DerivationEngine, validator: Validator) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|field| {
                let initial = field.default_value.clone().unwrap_or_default();
                (field.id.clone(), FieldValue::Text(initial))
            })
            .collect();

        let mut session = Self {
            schema,
            values,
            engine,
            validator,
            failures: Vec::new(),
            violations: Vec::new(),
        };
        session.rederive();
        session
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
        self.values.get(field_id)
    }

    /// Derivation failures from the most recent pass
    pub fn failures(&self) -> &[DerivationFailure] {
        &self.failures
    }

    /// Violations from the most recent submit
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Set the value of an input field. Derived fields are read-only and
    /// unknown ids are ignored; returns whether the value was applied.
    pub fn set_value(&mut self, field_id: &str, value: FieldValue) -> bool {
        self.edit_value(field_id, |slot| *slot = value)
    }

    /// Change an input field's value in place, then re-derive
    pub fn edit_value(&mut self, field_id: &str, edit: impl FnOnce(&mut FieldValue)) -> bool {
        let editable = self
            .schema
            .field(field_id)
            .is_some_and(|field| !field.is_derived);
        if !editable {
            return false;
        }

        edit(self.values.entry(field_id.to_string()).or_default());
        self.rederive();
        true
    }

    /// Validate every field. On success returns the data keyed by label; on
    /// failure returns the violations, which are also kept for the field
    /// views.
    pub fn submit(&mut self) -> Result<SubmittedData, Vec<Violation>> {
        self.violations = self
            .validator
            .validate_schema(&self.schema.fields, &self.values);
        if !self.violations.is_empty() {
            tracing::debug!(
                form = %self.schema.name,
                violations = self.violations.len(),
                "Submission blocked"
            );
            return Err(self.violations.clone());
        }

        let data = self.labeled_data();
        tracing::info!(
            form = %self.schema.name,
            data = %JsonValue::Object(data.clone()),
            "Submitted form"
        );
        Ok(data)
    }

    /// One view per field, in schema order
    pub fn views(&self) -> Vec<FieldView> {
        self.schema
            .fields
            .iter()
            .map(|field| self.view(field))
            .collect()
    }

    fn view(&self, field: &FormField) -> FieldView {
        let violations = self
            .violations
            .iter()
            .filter(|v| v.field_id == field.id)
            .cloned()
            .collect();
        FieldView::new(field, self.values.get(&field.id), violations)
    }

    fn labeled_data(&self) -> SubmittedData {
        self.schema
            .fields
            .iter()
            .map(|field| {
                let value = self
                    .values
                    .get(&field.id)
                    .and_then(|v| serde_json::to_value(v).ok())
                    .unwrap_or(JsonValue::Null);
                (field.label.clone(), value)
            })
            .collect()
    }

    fn rederive(&mut self) {
        let outcome = self.engine.derive(&self.schema.fields, &self.values);
        self.values = outcome.values;
        self.failures = outcome.failures;
    }
}
