//! Notification payloads
//!
//! [`LastNotification`] is what the push service returns for the newest
//! notification; [`NotificationPayload`] is what travels inside the displayed
//! notification's tag and is later handed to the page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PushError;

/// Structured notification carried in the correlation tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Service-side notification id
    pub id: String,
    pub message: String,
    #[serde(rename = "launchURL", default, skip_serializing_if = "Option::is_none")]
    pub launch_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NotificationPayload {
    /// Serialize into a correlation tag
    pub fn to_tag(&self) -> Result<String, PushError> {
        serde_json::to_string(self).map_err(|e| PushError::Decode(e.to_string()))
    }

    /// Recover a payload from a correlation tag
    pub fn from_tag(tag: &str) -> Result<Self, PushError> {
        serde_json::from_str(tag).map_err(|e| PushError::Decode(format!("notification tag: {}", e)))
    }
}

/// `custom` block of a service notification
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomData {
    #[serde(rename = "i")]
    pub id: String,
    #[serde(rename = "u", default)]
    pub launch_url: Option<String>,
    #[serde(rename = "a", default)]
    pub additional_data: Option<Value>,
}

/// Reply of `GET apps/{appId}/last_notification`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LastNotification {
    #[serde(default)]
    pub alert: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub custom: CustomData,
}

impl LastNotification {
    /// Icon override, ignoring empty values
    pub fn icon_override(&self) -> Option<&str> {
        self.icon.as_deref().filter(|icon| !icon.is_empty())
    }

    /// Launch URL override, ignoring empty values
    pub fn launch_url_override(&self) -> Option<&str> {
        self.custom.launch_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Payload for the correlation tag, titled with the resolved title
    pub fn to_payload(&self, title: &str) -> NotificationPayload {
        NotificationPayload {
            id: self.custom.id.clone(),
            message: self.alert.clone(),
            launch_url: self.launch_url_override().map(str::to_string),
            additional_data: self.custom.additional_data.clone(),
            title: Some(title.to_string()),
            icon: self.icon_override().map(str::to_string),
        }
    }
}
