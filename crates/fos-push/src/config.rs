//! SDK Configuration

use serde::Deserialize;

use crate::PushError;

/// Push service API root
pub const DEFAULT_API_BASE: &str = "https://gamethrive.com/api/v1/";

/// Build version reported to the service and recorded by installed workers
pub const SDK_VERSION: i64 = 9000;

/// Options passed by the host page to `init`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    /// Application id issued by the push service
    pub app_id: String,

    /// Register on page load without an explicit host call
    #[serde(default = "default_auto_register")]
    pub auto_register: bool,
}

fn default_auto_register() -> bool {
    true
}

impl InitOptions {
    pub fn new(app_id: &str) -> Self {
        Self {
            app_id: app_id.to_string(),
            auto_register: true,
        }
    }

    pub fn auto_register(mut self, enabled: bool) -> Self {
        self.auto_register = enabled;
        self
    }

    /// Parse the JSON object a host passes to `init`
    pub fn from_json(json: &str) -> Result<Self, PushError> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| PushError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), PushError> {
        if self.app_id.trim().is_empty() {
            return Err(PushError::Config("appId is required".into()));
        }
        Ok(())
    }
}

/// Build-time SDK settings
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Push service API root
    pub api_base: String,

    /// Build version
    pub sdk_version: i64,

    /// Device type constant sent with the device descriptor
    pub device_type: u32,

    /// Steady-state worker script
    pub primary_worker_script: String,

    /// Worker script used to force a clean reinstall on upgrade
    pub updater_worker_script: String,

    /// Local database name
    pub database_name: String,

    /// Per-tab session marker key
    pub session_marker_key: String,

    /// Emit SDK logs
    pub logging: bool,

    /// Only accept page messages from this origin (None accepts any)
    pub trusted_origin: Option<String>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            sdk_version: SDK_VERSION,
            device_type: 5,
            primary_worker_script: "FosPushSDKWorker.js".to_string(),
            updater_worker_script: "FosPushSDKUpdaterWorker.js".to_string(),
            database_name: fos_push_store::DEFAULT_DB_NAME.to_string(),
            session_marker_key: "FOS_PUSH_SESSION".to_string(),
            logging: false,
            trusted_origin: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_register_defaults_on() {
        let options = InitOptions::from_json(r#"{"appId": "app-1"}"#).unwrap();
        assert_eq!(options.app_id, "app-1");
        assert!(options.auto_register);
    }

    #[test]
    fn test_auto_register_off() {
        let options = InitOptions::from_json(r#"{"appId": "app-1", "autoRegister": false}"#).unwrap();
        assert!(!options.auto_register);
    }

    #[test]
    fn test_app_id_required() {
        assert!(InitOptions::from_json(r#"{"autoRegister": true}"#).is_err());
        assert!(InitOptions::from_json(r#"{"appId": "  "}"#).is_err());
        assert!(InitOptions::from_json("not json").is_err());
    }
}
