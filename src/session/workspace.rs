//! The form currently being built
//!
//! The builder edits exactly one schema at a time. The workspace owns it and
//! applies every change through the schema's own operations, keeping the
//! previous state when an edit is refused.

use crate::error::SchemaError;
use crate::model::{lint, FieldType, FormField, FormSchema, LintIssue, MoveDirection};
use crate::store::{self, SchemaStore};
use anyhow::Result;

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    current: FormSchema,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue editing an existing schema
    pub fn open(schema: FormSchema) -> Self {
        Self { current: schema }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.current
    }

    pub fn fields(&self) -> &[FormField] {
        &self.current.fields
    }

    /// Throw away the current form and start an empty one
    pub fn start_new(&mut self, name: impl Into<String>) {
        self.current = FormSchema::new(name);
    }

    pub fn discard(&mut self) {
        self.start_new("");
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.apply(|schema| schema.rename(name));
    }

    /// Append a fresh field of `field_type` and return its index
    pub fn add_field(&mut self, field_type: FieldType) -> usize {
        self.append_field(FormField::create(field_type))
    }

    pub fn append_field(&mut self, field: FormField) -> usize {
        self.apply(|schema| schema.append_field(field));
        self.current.fields.len() - 1
    }

    pub fn replace_field(&mut self, index: usize, field: FormField) -> Result<(), SchemaError> {
        self.try_apply(|schema| schema.replace_field(index, field))
    }

    pub fn remove_field(&mut self, index: usize) -> Result<(), SchemaError> {
        self.try_apply(|schema| schema.remove_field(index))
    }

    pub fn move_field(&mut self, index: usize, direction: MoveDirection) -> Result<(), SchemaError> {
        self.try_apply(|schema| schema.move_field(index, direction))
    }

    /// Flip the required flag of the field at `index`
    pub fn toggle_required(&mut self, index: usize) -> Result<(), SchemaError> {
        let mut field = self
            .current
            .fields
            .get(index)
            .cloned()
            .ok_or(SchemaError::IndexOutOfBounds {
                index,
                len: self.current.fields.len(),
            })?;
        field.required = !field.required;
        self.replace_field(index, field)
    }

    /// Save the current form to `store`; on success the workspace starts over
    /// with an empty form. On failure nothing changes.
    pub fn save(&mut self, store: &mut dyn SchemaStore) -> Result<String> {
        let key = store::save_schema(store, self.current.clone())?;
        self.discard();
        Ok(key)
    }

    pub fn lint(&self) -> Vec<LintIssue> {
        lint(&self.current)
    }

    fn apply(&mut self, edit: impl FnOnce(FormSchema) -> FormSchema) {
        let schema = std::mem::take(&mut self.current);
        self.current = edit(schema);
    }

    fn try_apply(
        &mut self,
        edit: impl FnOnce(FormSchema) -> Result<FormSchema, SchemaError>,
    ) -> Result<(), SchemaError> {
        self.current = edit(self.current.clone())?;
        Ok(())
    }
}
