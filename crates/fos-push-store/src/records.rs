//! Typed records stored in each namespace

use serde::{Deserialize, Serialize};

/// Logical names of identity records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKey {
    /// Application id from the host's init options
    AppId,
    /// Durable device identity assigned by the push service
    PlayerId,
    /// Transient push subscription token
    RegistrationId,
    /// Build version recorded by the primary worker on install
    WorkerVersionSlotA,
    /// Build version recorded by the updater worker on install
    WorkerVersionSlotB,
}

impl IdKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdKey::AppId => "appId",
            IdKey::PlayerId => "playerId",
            IdKey::RegistrationId => "registrationId",
            IdKey::WorkerVersionSlotA => "workerVersionSlotA",
            IdKey::WorkerVersionSlotB => "workerVersionSlotB",
        }
    }
}

/// Identity value, either text or a number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(i64),
    Text(String),
}

impl IdValue {
    /// Text form, or `None` for numbers
    pub fn as_text(&self) -> Option<&str> {
        match self {
            IdValue::Text(s) => Some(s),
            IdValue::Number(_) => None,
        }
    }

    /// Numeric form; numeric text is accepted too
    pub fn as_number(&self) -> Option<i64> {
        match self {
            IdValue::Number(n) => Some(*n),
            IdValue::Text(s) => s.parse().ok(),
        }
    }
}

impl From<&str> for IdValue {
    fn from(value: &str) -> Self {
        IdValue::Text(value.to_string())
    }
}

impl From<String> for IdValue {
    fn from(value: String) -> Self {
        IdValue::Text(value)
    }
}

impl From<i64> for IdValue {
    fn from(value: i64) -> Self {
        IdValue::Number(value)
    }
}

/// Record in the identity namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdRecord {
    pub key: String,
    pub value: IdValue,
}

impl IdRecord {
    pub fn new(key: IdKey, value: impl Into<IdValue>) -> Self {
        Self {
            key: key.as_str().to_string(),
            value: value.into(),
        }
    }
}

/// Names of option records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    DefaultUrl,
    DefaultIcon,
    DefaultTitle,
    /// Document title captured when registration starts
    PageTitle,
}

impl OptionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::DefaultUrl => "defaultUrl",
            OptionKey::DefaultIcon => "defaultIcon",
            OptionKey::DefaultTitle => "defaultTitle",
            OptionKey::PageTitle => "pageTitle",
        }
    }
}

/// Record in the options namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub key: String,
    pub value: String,
}

impl OptionRecord {
    pub fn new(key: OptionKey, value: &str) -> Self {
        Self {
            key: key.as_str().to_string(),
            value: value.to_string(),
        }
    }
}

/// Open event parked until the page at `url` loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenedRecord<T> {
    pub url: String,
    pub data: T,
}
