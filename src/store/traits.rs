//! Trait abstraction over schema storage to enable mocking in tests

use anyhow::Result;

/// Synchronous key/value storage of serialized form schemas
#[cfg_attr(test, mockall::automock)]
pub trait SchemaStore {
    /// Store `serialized` under `key`, overwriting any previous entry
    fn put(&mut self, key: &str, serialized: String) -> Result<()>;

    /// Fetch the entry stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove the entry under `key`; removing a missing key is not an error
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Every stored entry as `(key, serialized)` pairs
    fn entries(&self) -> Result<Vec<(String, String)>>;
}
