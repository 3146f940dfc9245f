//! Device tags
//!
//! Tags set before the device has a player id are held here and sent as one
//! merged map once registration completes. An empty value deletes the tag on
//! the service.

use std::collections::BTreeMap;

use serde_json::{json, Value};

/// Tag key/value map
pub type TagMap = BTreeMap<String, String>;

/// Tags waiting for a player id
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PendingTags {
    tags: TagMap,
}

impl PendingTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `tags` in; later values win per key
    pub fn merge(&mut self, tags: TagMap) {
        self.tags.extend(tags);
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Remove and return everything pending
    pub fn take(&mut self) -> TagMap {
        std::mem::take(&mut self.tags)
    }
}

/// Map that deletes each of `keys`
pub fn deletion_map<I, S>(keys: I) -> TagMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .map(|key| (key.as_ref().to_string(), String::new()))
        .collect()
}

/// Body of `PUT players/{id}`
pub fn tag_update_body(app_id: Option<&str>, tags: &TagMap) -> Value {
    json!({ "app_id": app_id, "tags": tags })
}

/// Tags from a `GET players/{id}` reply.
///
/// Scalar values are rendered as strings; nested values are skipped.
pub fn parse_tags(player: &Value) -> Option<TagMap> {
    let tags = player.get("tags")?.as_object()?;
    Some(
        tags.iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.clone(), value))
            })
            .collect(),
    )
}
