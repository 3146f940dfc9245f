//! fOS Push Store
//!
//! Persistent key/value storage for the push SDK.
//!
//! The store is split into three namespaces (identity, pending open events,
//! and display options). The storage engine itself is a capability supplied
//! by the host; [`LocalStore`] opens it lazily, creates the schema once and
//! shares one connection with every caller in the execution context.

mod engine;
mod memory;
mod namespace;
mod records;
mod store;

pub use engine::{Database, OpenedDatabase, StoreEngine};
pub use memory::MemoryEngine;
pub use namespace::Namespace;
pub use records::{IdKey, IdRecord, IdValue, OpenedRecord, OptionKey, OptionRecord};
pub use store::{LocalStore, DEFAULT_DB_NAME, SCHEMA_VERSION};

/// Store error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to open database {name}: {reason}")]
    Open { name: String, reason: String },

    #[error("Database version {found} is newer than supported version {supported}")]
    Version { found: u32, supported: u32 },

    #[error("Unknown namespace: {0}")]
    NotFound(String),

    #[error("Record has no key at path {0:?}")]
    MissingKey(String),

    #[error("Record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
