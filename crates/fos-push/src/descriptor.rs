//! Device descriptor
//!
//! What the SDK tells the push service about this device. Browser and OS
//! detection belongs to the host, behind [`PlatformDescriptor`].

use serde::Serialize;

use crate::config::SdkConfig;

/// Host-provided facts about the device
pub trait PlatformDescriptor {
    /// Preferred language tag (e.g. `en-US`)
    fn language(&self) -> Option<String>;

    /// Offset from UTC in seconds, positive east of Greenwich
    fn utc_offset_seconds(&self) -> i32;

    /// Platform and browser name (e.g. `Linux x86_64 Chrome`)
    fn device_model(&self) -> String;

    /// Browser version
    fn device_os(&self) -> String;
}

/// Fixed descriptor values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticDescriptor {
    pub language: Option<String>,
    pub utc_offset_seconds: i32,
    pub device_model: String,
    pub device_os: String,
}

impl PlatformDescriptor for StaticDescriptor {
    fn language(&self) -> Option<String> {
        self.language.clone()
    }

    fn utc_offset_seconds(&self) -> i32 {
        self.utc_offset_seconds
    }

    fn device_model(&self) -> String {
        self.device_model.clone()
    }

    fn device_os(&self) -> String {
        self.device_os.clone()
    }
}

/// Language code sent to the service.
///
/// Region-qualified tags are cut to the two-letter language; a missing
/// language falls back to `en`.
pub fn normalize_language(language: Option<&str>) -> String {
    match language {
        Some(lang) if !lang.is_empty() => {
            if lang.len() > 3 {
                lang.chars().take(2).collect()
            } else {
                lang.to_string()
            }
        }
        _ => "en".to_string(),
    }
}

/// Body of `POST players` and `PUT players/{id}/on_session`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub app_id: String,
    pub device_type: u32,
    pub language: String,
    pub timezone: i32,
    pub device_model: String,
    pub device_os: String,
    pub sdk: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl DeviceDescriptor {
    pub fn collect(
        config: &SdkConfig,
        app_id: &str,
        platform: &dyn PlatformDescriptor,
        registration_id: Option<&str>,
    ) -> Self {
        Self {
            app_id: app_id.to_string(),
            device_type: config.device_type,
            language: normalize_language(platform.language().as_deref()),
            timezone: platform.utc_offset_seconds(),
            device_model: platform.device_model(),
            device_os: platform.device_os(),
            sdk: config.sdk_version,
            identifier: registration_id.map(str::to_string),
        }
    }
}
