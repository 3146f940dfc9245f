//! Worker context
//!
//! Everything the background worker needs, built once when the worker starts
//! and shared by its install, push and notification-click handlers.

use std::rc::Rc;

use fos_push_net::{ApiClient, HttpTransport};
use fos_push_store::{LocalStore, StoreEngine};

use crate::config::SdkConfig;
use crate::descriptor::PlatformDescriptor;
use crate::dispatch;
use crate::lifetime::ExtendableEvent;
use crate::open_event::{self, OpenRoute};
use crate::platform::{ActivatedNotification, DisplayRequest, WorkerGlobal};
use crate::registration::WorkerScript;
use crate::PushError;

/// Capabilities of the worker execution context
pub struct WorkerPlatform {
    pub global: Rc<dyn WorkerGlobal>,
    pub descriptor: Rc<dyn PlatformDescriptor>,
    pub store: Rc<dyn StoreEngine>,
    pub transport: Rc<dyn HttpTransport>,
}

/// Background worker context
pub struct WorkerContext {
    pub(crate) config: SdkConfig,
    pub(crate) store: LocalStore,
    pub(crate) api: ApiClient,
    pub(crate) global: Rc<dyn WorkerGlobal>,
    pub(crate) descriptor: Rc<dyn PlatformDescriptor>,
}

impl WorkerContext {
    pub fn new(config: SdkConfig, platform: WorkerPlatform) -> Result<Self, PushError> {
        let api = ApiClient::new(&config.api_base, platform.transport)?;
        let store = LocalStore::with_name(platform.store, &config.database_name);

        Ok(Self {
            config,
            store,
            api,
            global: platform.global,
            descriptor: platform.descriptor,
        })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Worker installed: record which script this is and the build it came from
    pub async fn on_install(&self, event: &dyn ExtendableEvent) -> WorkerScript {
        let _guard = event.extend_lifetime();

        let script = match WorkerScript::from_script_url(&self.global.script_url(), &self.config) {
            Some(WorkerScript::Primary) => WorkerScript::Primary,
            _ => WorkerScript::Updater,
        };
        tracing::info!("Installed {:?} worker, version {}", script, self.config.sdk_version);

        if let Err(e) = self
            .store
            .set_id(script.version_slot(), self.config.sdk_version)
            .await
        {
            tracing::warn!("Cannot record worker version: {}", e);
        }
        script
    }

    /// Push received: display the newest notification
    pub async fn on_push(&self, event: &dyn ExtendableEvent) -> Option<DisplayRequest> {
        let _guard = event.extend_lifetime();

        match dispatch::dispatch(self).await {
            Ok(request) => Some(request),
            Err(e) => {
                tracing::warn!("Push dropped: {}", e);
                None
            }
        }
    }

    /// Notification activated: acknowledge it and route its payload to a page
    pub async fn on_notification_click(
        &self,
        notification: &dyn ActivatedNotification,
        event: &dyn ExtendableEvent,
    ) -> Option<OpenRoute> {
        let _guard = event.extend_lifetime();

        match open_event::handle(self, notification).await {
            Ok(route) => Some(route),
            Err(e) => {
                tracing::warn!("Notification open not handled: {}", e);
                None
            }
        }
    }
}
