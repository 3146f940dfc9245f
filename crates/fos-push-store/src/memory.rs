//! In-memory storage engine
//!
//! Keeps every database in process memory. Clones share the same databases,
//! so a page context and a worker context built from clones of one engine see
//! each other's writes the way two contexts share one origin's IndexedDB.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use crate::engine::{Database, OpenedDatabase, StoreEngine};
use crate::{Namespace, StoreError};

/// A namespace (like an object store)
#[derive(Debug)]
struct NamespaceData {
    key_path: String,
    records: HashMap<String, Value>,
}

impl NamespaceData {
    fn new(key_path: &str) -> Self {
        Self {
            key_path: key_path.to_string(),
            records: HashMap::new(),
        }
    }

    fn resolve_key(&self, record: &Value) -> Result<String, StoreError> {
        match record.get(&self.key_path) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(StoreError::MissingKey(self.key_path.clone())),
        }
    }
}

#[derive(Debug, Default)]
struct DatabaseData {
    version: u32,
    namespaces: HashMap<Namespace, NamespaceData>,
}

/// In-memory engine
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    databases: Rc<RefCell<HashMap<String, Rc<RefCell<DatabaseData>>>>>,
    opens: Rc<Cell<usize>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `open` has been called across all clones
    pub fn open_count(&self) -> usize {
        self.opens.get()
    }

    /// Stored schema version of a database, if it exists
    pub fn version(&self, name: &str) -> Option<u32> {
        self.databases.borrow().get(name).map(|db| db.borrow().version)
    }

    /// Write a raw record, bypassing key resolution. Used to seed data.
    pub fn insert_raw(&self, name: &str, namespace: Namespace, key: &str, record: Value) {
        let db = self.database_data(name);
        let mut db = db.borrow_mut();
        db.namespaces
            .entry(namespace)
            .or_insert_with(|| NamespaceData::new(namespace.key_path()))
            .records
            .insert(key.to_string(), record);
    }

    /// Read a raw record
    pub fn get_raw(&self, name: &str, namespace: Namespace, key: &str) -> Option<Value> {
        let databases = self.databases.borrow();
        let db = databases.get(name)?.borrow();
        db.namespaces.get(&namespace)?.records.get(key).cloned()
    }

    fn database_data(&self, name: &str) -> Rc<RefCell<DatabaseData>> {
        self.databases
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}

#[async_trait(?Send)]
impl StoreEngine for MemoryEngine {
    async fn open(&self, name: &str, version: u32) -> Result<OpenedDatabase, StoreError> {
        self.opens.set(self.opens.get() + 1);

        // Opening is asynchronous on every real engine
        smol::future::yield_now().await;

        let data = self.database_data(name);
        let previous_version = data.borrow().version;
        if previous_version > version {
            return Err(StoreError::Version {
                found: previous_version,
                supported: version,
            });
        }
        data.borrow_mut().version = version;

        tracing::debug!("Opened in-memory database {} (v{} -> v{})", name, previous_version, version);

        Ok(OpenedDatabase {
            database: Rc::new(MemoryDatabase { data }),
            previous_version,
        })
    }
}

/// Connection to an in-memory database
#[derive(Debug)]
struct MemoryDatabase {
    data: Rc<RefCell<DatabaseData>>,
}

#[async_trait(?Send)]
impl Database for MemoryDatabase {
    fn has_namespace(&self, namespace: Namespace) -> bool {
        self.data.borrow().namespaces.contains_key(&namespace)
    }

    async fn create_namespace(&self, namespace: Namespace, key_path: &str) -> Result<(), StoreError> {
        self.data
            .borrow_mut()
            .namespaces
            .entry(namespace)
            .or_insert_with(|| NamespaceData::new(key_path));
        Ok(())
    }

    async fn get(&self, namespace: Namespace, key: &str) -> Result<Option<Value>, StoreError> {
        let data = self.data.borrow();
        let ns = data
            .namespaces
            .get(&namespace)
            .ok_or_else(|| StoreError::NotFound(namespace.name().to_string()))?;
        Ok(ns.records.get(key).cloned())
    }

    async fn put(&self, namespace: Namespace, record: Value) -> Result<(), StoreError> {
        let mut data = self.data.borrow_mut();
        let ns = data
            .namespaces
            .get_mut(&namespace)
            .ok_or_else(|| StoreError::NotFound(namespace.name().to_string()))?;
        let key = ns.resolve_key(&record)?;
        ns.records.insert(key, record);
        Ok(())
    }

    async fn delete(&self, namespace: Namespace, key: &str) -> Result<(), StoreError> {
        let mut data = self.data.borrow_mut();
        let ns = data
            .namespaces
            .get_mut(&namespace)
            .ok_or_else(|| StoreError::NotFound(namespace.name().to_string()))?;
        ns.records.remove(key);
        Ok(())
    }
}
