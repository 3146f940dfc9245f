//! Local Store
//!
//! Lazily opened, process-wide cached connection to the push database.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use smol::lock::OnceCell;

use crate::engine::{Database, StoreEngine};
use crate::records::{IdKey, IdRecord, IdValue, OpenedRecord, OptionKey, OptionRecord};
use crate::{Namespace, StoreError};

/// Database name used when the host does not pick one
pub const DEFAULT_DB_NAME: &str = "FOS_PUSH_SDK_DB";

/// Current schema version. Upgrades only ever add namespaces.
pub const SCHEMA_VERSION: u32 = 1;

/// Push SDK key/value store
///
/// The first call opens the database; callers arriving while the open is in
/// flight wait for that same open instead of starting another one. A failed
/// open is retried by the next caller.
pub struct LocalStore {
    engine: Rc<dyn StoreEngine>,
    name: String,
    connection: OnceCell<Rc<dyn Database>>,
}

impl LocalStore {
    /// Create a store over `engine` using the default database name
    pub fn new(engine: Rc<dyn StoreEngine>) -> Self {
        Self::with_name(engine, DEFAULT_DB_NAME)
    }

    pub fn with_name(engine: Rc<dyn StoreEngine>, name: &str) -> Self {
        Self {
            engine,
            name: name.to_string(),
            connection: OnceCell::new(),
        }
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the connection has been established
    pub fn is_open(&self) -> bool {
        self.connection.is_initialized()
    }

    async fn database(&self) -> Result<Rc<dyn Database>, StoreError> {
        self.connection
            .get_or_try_init(|| self.open())
            .await
            .cloned()
    }

    async fn open(&self) -> Result<Rc<dyn Database>, StoreError> {
        let opened = self.engine.open(&self.name, SCHEMA_VERSION).await?;
        let database = opened.database;

        if opened.previous_version < SCHEMA_VERSION {
            tracing::info!(
                "Upgrading {} schema v{} -> v{}",
                self.name,
                opened.previous_version,
                SCHEMA_VERSION
            );
            for namespace in Namespace::ALL {
                if !database.has_namespace(namespace) {
                    database.create_namespace(namespace, namespace.key_path()).await?;
                }
            }
        }

        Ok(database)
    }

    // === Raw records ===

    /// Read a raw record
    pub async fn get(&self, namespace: Namespace, key: &str) -> Result<Option<Value>, StoreError> {
        self.database().await?.get(namespace, key).await
    }

    /// Insert or replace a record
    pub async fn put<T: Serialize>(&self, namespace: Namespace, record: &T) -> Result<(), StoreError> {
        let record = serde_json::to_value(record)?;
        self.database().await?.put(namespace, record).await
    }

    /// Delete a record
    pub async fn delete(&self, namespace: Namespace, key: &str) -> Result<(), StoreError> {
        self.database().await?.delete(namespace, key).await
    }

    async fn get_decoded<T: DeserializeOwned>(
        &self,
        namespace: Namespace,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.get(namespace, key).await? else {
            return Ok(None);
        };

        // Malformed records read as absent
        match serde_json::from_value(raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!("Ignoring malformed {}/{} record: {}", namespace, key, e);
                Ok(None)
            }
        }
    }

    // === Identity ===

    /// Read an identity value
    pub async fn id(&self, key: IdKey) -> Result<Option<IdValue>, StoreError> {
        let record: Option<IdRecord> = self.get_decoded(Namespace::Ids, key.as_str()).await?;
        Ok(record.map(|r| r.value))
    }

    /// Read a textual identity value
    pub async fn id_text(&self, key: IdKey) -> Result<Option<String>, StoreError> {
        Ok(self.id(key).await?.and_then(|v| v.as_text().map(str::to_string)))
    }

    /// Write an identity value
    pub async fn set_id(&self, key: IdKey, value: impl Into<IdValue>) -> Result<(), StoreError> {
        self.put(Namespace::Ids, &IdRecord::new(key, value)).await
    }

    // === Options ===

    /// Read an option
    pub async fn option(&self, key: OptionKey) -> Result<Option<String>, StoreError> {
        let record: Option<OptionRecord> = self.get_decoded(Namespace::Options, key.as_str()).await?;
        Ok(record.map(|r| r.value))
    }

    /// Write an option
    pub async fn set_option(&self, key: OptionKey, value: &str) -> Result<(), StoreError> {
        self.put(Namespace::Options, &OptionRecord::new(key, value)).await
    }

    // === Open events ===

    /// Park an open event for the page at `url`
    pub async fn stash_opened<T: Serialize>(&self, url: &str, data: &T) -> Result<(), StoreError> {
        let record = OpenedRecord {
            url: url.to_string(),
            data,
        };
        self.put(Namespace::NotificationOpened, &record).await
    }

    /// Read and delete the open event parked for `url`
    pub async fn take_opened<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, StoreError> {
        let record: Option<OpenedRecord<T>> = self.get_decoded(Namespace::NotificationOpened, url).await?;
        if record.is_some() || self.get(Namespace::NotificationOpened, url).await?.is_some() {
            self.delete(Namespace::NotificationOpened, url).await?;
        }
        Ok(record.map(|r| r.data))
    }
}
