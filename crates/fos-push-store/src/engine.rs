//! Storage engine capability
//!
//! The durable key/value engine is provided by the host (IndexedDB in a
//! browser). These traits are the only surface the SDK relies on.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{Namespace, StoreError};

/// Result of opening a database
pub struct OpenedDatabase {
    /// Connection handle
    pub database: Rc<dyn Database>,
    /// Schema version found on disk before this open (0 for a fresh database)
    pub previous_version: u32,
}

/// Opens databases
#[async_trait(?Send)]
pub trait StoreEngine {
    /// Open (or create) the named database at `version`.
    ///
    /// Engines must refuse to open a database whose stored version is newer
    /// than `version`.
    async fn open(&self, name: &str, version: u32) -> Result<OpenedDatabase, StoreError>;
}

/// An open database connection
///
/// Every call commits on its own; there are no cross-call transactions.
#[async_trait(?Send)]
pub trait Database {
    /// Check whether a namespace exists
    fn has_namespace(&self, namespace: Namespace) -> bool;

    /// Create a namespace whose records are keyed by `key_path`
    async fn create_namespace(&self, namespace: Namespace, key_path: &str) -> Result<(), StoreError>;

    /// Read a record
    async fn get(&self, namespace: Namespace, key: &str) -> Result<Option<Value>, StoreError>;

    /// Insert or replace a record, keyed by its key path field
    async fn put(&self, namespace: Namespace, record: Value) -> Result<(), StoreError>;

    /// Delete a record
    async fn delete(&self, namespace: Namespace, key: &str) -> Result<(), StoreError>;
}
