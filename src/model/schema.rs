//! Form schema aggregate: an ordered, named collection of fields
//!
//! Every structural edit consumes the schema and hands back the edited one,
//! so a failed edit never leaves a half-applied state behind.

use super::field::FormField;
use crate::error::SchemaError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction for [`FormSchema::move_field`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// A named, ordered form definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub fields: Vec<FormField>,
}

/// Listing entry for a stored schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSummary {
    pub name: String,
    pub created_at: String,
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::new("")
    }
}

impl FormSchema {
    /// Create an empty schema stamped with the current time
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            fields: Vec::new(),
        }
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append `field` at the end. Its id is expected to be fresh.
    pub fn append_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn replace_field(mut self, index: usize, field: FormField) -> Result<Self, SchemaError> {
        self.check_index(index)?;
        self.fields[index] = field;
        Ok(self)
    }

    /// Remove the field at `index`.
    ///
    /// Other fields that listed the removed id in `derived_from` keep the
    /// now dangling reference.
    pub fn remove_field(mut self, index: usize) -> Result<Self, SchemaError> {
        self.check_index(index)?;
        self.fields.remove(index);
        Ok(self)
    }

    /// Swap the field at `index` with its neighbour. Moving the first field up
    /// or the last field down leaves the order unchanged.
    pub fn move_field(mut self, index: usize, direction: MoveDirection) -> Result<Self, SchemaError> {
        self.check_index(index)?;
        match direction {
            MoveDirection::Up if index > 0 => self.fields.swap(index - 1, index),
            MoveDirection::Down if index + 1 < self.fields.len() => {
                self.fields.swap(index, index + 1)
            }
            _ => {}
        }
        Ok(self)
    }

    /// Check that the schema can be saved and stamp a fresh `created_at`
    pub fn prepare_save(mut self) -> Result<Self, SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields);
        }
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        self.created_at = Utc::now();
        Ok(self)
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Fields a derived field at `field_id` may draw from: every other field
    pub fn derived_from_candidates(&self, field_id: &str) -> Vec<&FormField> {
        self.fields.iter().filter(|f| f.id != field_id).collect()
    }

    pub fn summary(&self) -> SchemaSummary {
        SchemaSummary {
            name: self.name.clone(),
            created_at: self.created_at.to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    fn check_index(&self, index: usize) -> Result<(), SchemaError> {
        if index < self.fields.len() {
            Ok(())
        } else {
            Err(SchemaError::IndexOutOfBounds {
                index,
                len: self.fields.len(),
            })
        }
    }
}
