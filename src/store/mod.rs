//! Schema storage and the catalog operations built on it

pub mod file;
pub mod memory;
pub mod traits;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use traits::SchemaStore;

#[cfg(test)]
pub use traits::MockSchemaStore;

use crate::model::{FormSchema, SchemaSummary};
use anyhow::{anyhow, Result};

/// Validate, stamp and store `schema` under its name, overwriting any schema
/// of the same name. Returns the key it was stored under.
///
/// A schema that fails the save checks is never written; the error is a
/// [`crate::error::SchemaError`].
pub fn save_schema(store: &mut dyn SchemaStore, schema: FormSchema) -> Result<String> {
    let schema = schema.prepare_save()?;
    let serialized = schema
        .to_json()
        .map_err(|e| anyhow!("Failed to serialize form '{}': {}", schema.name, e))?;
    store.put(&schema.name, serialized)?;
    tracing::info!(form = %schema.name, fields = schema.fields.len(), "Saved form");
    Ok(schema.name)
}

/// Load the schema stored under `name`
pub fn load_schema(store: &dyn SchemaStore, name: &str) -> Result<Option<FormSchema>> {
    let Some(raw) = store.get(name)? else {
        return Ok(None);
    };
    let schema = FormSchema::from_json(&raw)
        .map_err(|e| anyhow!("Failed to parse form '{}': {}", name, e))?;
    Ok(Some(schema))
}

/// Summaries of every stored schema. Entries that are not a JSON object with
/// `name`, `createdAt` and `fields` are skipped.
pub fn list_schemas(store: &dyn SchemaStore) -> Result<Vec<SchemaSummary>> {
    let mut summaries = Vec::new();
    for (key, raw) in store.entries()? {
        match summarize_entry(&raw) {
            Some(summary) => summaries.push(summary),
            None => tracing::debug!(key = %key, "Skipping store entry that is not a form"),
        }
    }
    Ok(summaries)
}

pub fn delete_schema(store: &mut dyn SchemaStore, name: &str) -> Result<()> {
    store.delete(name)?;
    tracing::info!(form = %name, "Deleted form");
    Ok(())
}

fn summarize_entry(raw: &str) -> Option<SchemaSummary> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    if object.get("fields").map_or(true, serde_json::Value::is_null) {
        return None;
    }
    let name = object.get("name")?.as_str().filter(|n| !n.is_empty())?;
    let created_at = object
        .get("createdAt")?
        .as_str()
        .filter(|c| !c.is_empty())?;
    Some(SchemaSummary {
        name: name.to_string(),
        created_at: created_at.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::model::{FieldType, FormField};
    use pretty_assertions::assert_eq;

    fn signup() -> FormSchema {
        FormSchema::new("Signup")
            .append_field(FormField::new("email", "Email", FieldType::Email).required())
    }

    mod save {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_save_then_load() {
            let mut store = InMemoryStore::new();
            let key = save_schema(&mut store, signup()).unwrap();
            assert_eq!(key, "Signup");

            let loaded = load_schema(&store, "Signup").unwrap().unwrap();
            assert_eq!(loaded.fields, signup().fields);
        }

        #[test]
        fn test_save_overwrites_same_name() {
            let mut store = InMemoryStore::new();
            save_schema(&mut store, signup()).unwrap();
            let second = signup().append_field(FormField::new("age", "Age", FieldType::Number));
            save_schema(&mut store, second).unwrap();

            assert_eq!(store.len(), 1);
            let loaded = load_schema(&store, "Signup").unwrap().unwrap();
            assert_eq!(loaded.fields.len(), 2);
        }

        #[test]
        fn test_empty_form_is_never_put() {
            let mut store = MockSchemaStore::new();
            store.expect_put().times(0);

            let err = save_schema(&mut store, FormSchema::new("Empty")).unwrap_err();
            assert_eq!(
                err.downcast_ref::<SchemaError>(),
                Some(&SchemaError::NoFields)
            );
        }

        #[test]
        fn test_blank_name_is_never_put() {
            let mut store = MockSchemaStore::new();
            store.expect_put().times(0);

            let err = save_schema(&mut store, signup().rename("   ")).unwrap_err();
            assert_eq!(err.to_string(), "Form name cannot be empty");
        }

        #[test]
        fn test_store_failure_propagates() {
            let mut store = MockSchemaStore::new();
            store
                .expect_put()
                .times(1)
                .returning(|_, _| Err(anyhow!("disk full")));

            let err = save_schema(&mut store, signup()).unwrap_err();
            assert_eq!(err.to_string(), "disk full");
        }
    }

    mod listing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_malformed_entries_are_skipped() {
            let mut store = InMemoryStore::new();
            save_schema(&mut store, signup()).unwrap();
            store.put("theme", "\"dark\"".into()).unwrap();
            store.put("broken", "{not json".into()).unwrap();
            store
                .put("partial", r#"{"name":"x","fields":[]}"#.into())
                .unwrap();

            let summaries = list_schemas(&store).unwrap();
            assert_eq!(summaries.len(), 1);
            assert_eq!(summaries[0].name, "Signup");
            assert!(!summaries[0].created_at.is_empty());
        }

        #[test]
        fn test_entries_with_blank_metadata_are_skipped() {
            let mut store = InMemoryStore::new();
            store
                .put("nameless", r#"{"name":"","createdAt":"2024-01-01T00:00:00Z","fields":[]}"#.into())
                .unwrap();
            store
                .put("undated", r#"{"name":"Undated","createdAt":null,"fields":[]}"#.into())
                .unwrap();
            store
                .put("no-fields", r#"{"name":"Ghost","createdAt":"2024-01-01T00:00:00Z","fields":null}"#.into())
                .unwrap();
            store
                .put("ok", r#"{"name":"Ok","createdAt":"2024-01-01T00:00:00Z","fields":[]}"#.into())
                .unwrap();

            let names: Vec<String> = list_schemas(&store)
                .unwrap()
                .into_iter()
                .map(|s| s.name)
                .collect();
            assert_eq!(names, vec!["Ok".to_string()]);
        }

        #[test]
        fn test_delete_removes_from_listing() {
            let mut store = InMemoryStore::new();
            save_schema(&mut store, signup()).unwrap();
            delete_schema(&mut store, "Signup").unwrap();

            assert!(list_schemas(&store).unwrap().is_empty());
            assert_eq!(load_schema(&store, "Signup").unwrap(), None);
        }

        #[test]
        fn test_load_rejects_malformed_entry() {
            let mut store = InMemoryStore::new();
            store.put("bad", "[]".into()).unwrap();
            assert!(load_schema(&store, "bad").is_err());
        }
    }
}
