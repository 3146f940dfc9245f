//! Page context
//!
//! The SDK as seen by the host page. One context is built per page load and
//! owns all per-load state: init options, the session state, pending tags, the
//! parked identity request and the open listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fos_push_net::{endpoints, ApiClient, HttpTransport, Method};
use fos_push_store::{IdKey, LocalStore, OptionKey, StoreEngine};
use serde_json::Value;

use crate::config::{InitOptions, SdkConfig};
use crate::descriptor::PlatformDescriptor;
use crate::identity::{Ids, IdsWaiter};
use crate::payload::NotificationPayload;
use crate::platform::{PageHost, WorkerContainer};
use crate::registration::{self, RegistrationOutcome};
use crate::session::{self, SessionOutcome, SessionState};
use crate::tags::{self, PendingTags, TagMap};
use crate::PushError;

/// Host callback for opened notifications
pub type OpenedCallback = Rc<dyn Fn(NotificationPayload)>;

/// Capabilities of the page execution context
pub struct PagePlatform {
    pub host: Rc<dyn PageHost>,
    pub workers: Rc<dyn WorkerContainer>,
    pub descriptor: Rc<dyn PlatformDescriptor>,
    pub store: Rc<dyn StoreEngine>,
    pub transport: Rc<dyn HttpTransport>,
}

/// Page-side SDK context
pub struct PageContext {
    pub(crate) config: SdkConfig,
    options: RefCell<Option<InitOptions>>,
    pub(crate) store: LocalStore,
    pub(crate) api: ApiClient,
    pub(crate) host: Rc<dyn PageHost>,
    pub(crate) workers: Rc<dyn WorkerContainer>,
    pub(crate) descriptor: Rc<dyn PlatformDescriptor>,
    pub(crate) session: Cell<SessionState>,
    pending_tags: RefCell<PendingTags>,
    pub(crate) ids_waiter: IdsWaiter,
    opened_listener: RefCell<Option<OpenedCallback>>,
}

impl PageContext {
    pub fn new(config: SdkConfig, platform: PagePlatform) -> Result<Self, PushError> {
        let api = ApiClient::new(&config.api_base, platform.transport)?;
        let store = LocalStore::with_name(platform.store, &config.database_name);

        Ok(Self {
            config,
            options: RefCell::new(None),
            store,
            api,
            host: platform.host,
            workers: platform.workers,
            descriptor: platform.descriptor,
            session: Cell::new(SessionState::NotStarted),
            pending_tags: RefCell::new(PendingTags::new()),
            ids_waiter: IdsWaiter::new(),
            opened_listener: RefCell::new(None),
        })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn session_state(&self) -> SessionState {
        self.session.get()
    }

    /// Tags waiting for a player id
    pub fn pending_tags(&self) -> PendingTags {
        self.pending_tags.borrow().clone()
    }

    pub(crate) fn init_options(&self) -> Option<InitOptions> {
        self.options.borrow().clone()
    }

    /// Read a textual identity value; failures read as absent
    pub(crate) async fn read_id(&self, key: IdKey) -> Option<String> {
        self.store.id_text(key).await.unwrap_or_else(|e| {
            tracing::warn!("Cannot read {}: {}", key.as_str(), e);
            None
        })
    }

    // === Lifecycle ===

    /// Configure the SDK. Call before the page finishes loading.
    pub fn init(&self, options: InitOptions) -> Result<(), PushError> {
        options.validate()?;
        if self.config.logging {
            crate::logging::init(true);
        }
        tracing::debug!("Init for app {}", options.app_id);
        *self.options.borrow_mut() = Some(options);
        Ok(())
    }

    /// Page finished loading
    pub async fn on_page_ready(&self) -> SessionOutcome {
        session::page_ready(self).await
    }

    /// Document visibility changed
    pub async fn on_visibility_change(&self) -> Option<SessionOutcome> {
        session::visibility_changed(self).await
    }

    /// Ask for push permission and register, unless already registered
    pub async fn register_for_push_notifications(&self) -> Option<RegistrationOutcome> {
        if self.read_id(IdKey::RegistrationId).await.is_some() {
            return None;
        }
        Some(registration::register(self).await)
    }

    // === Display defaults ===

    async fn set_option(&self, key: OptionKey, value: &str) {
        if let Err(e) = self.store.set_option(key, value).await {
            tracing::warn!("Cannot store {}: {}", key.as_str(), e);
        }
    }

    /// URL opened for notifications without their own launch URL
    pub async fn set_default_notification_url(&self, url: &str) {
        self.set_option(OptionKey::DefaultUrl, url).await;
    }

    /// Icon for notifications without their own icon
    pub async fn set_default_icon(&self, icon: &str) {
        self.set_option(OptionKey::DefaultIcon, icon).await;
    }

    /// Title for notifications without their own title
    pub async fn set_default_title(&self, title: &str) {
        self.set_option(OptionKey::DefaultTitle, title).await;
    }

    // === Tags ===

    pub async fn send_tag(&self, key: &str, value: &str) {
        let mut tags = TagMap::new();
        tags.insert(key.to_string(), value.to_string());
        self.send_tags(tags).await;
    }

    /// Send tags now, or hold them until the device is registered.
    ///
    /// Tags are merged into the pending map before the player id is read, so
    /// a registration finishing during that read flushes them itself.
    pub async fn send_tags(&self, tags: TagMap) {
        self.pending_tags.borrow_mut().merge(tags);

        match self.read_id(IdKey::PlayerId).await {
            Some(player_id) => self.flush_pending_tags(&player_id).await,
            None => tracing::debug!(
                "No player id yet; holding {} tag(s)",
                self.pending_tags.borrow().len()
            ),
        }
    }

    pub async fn delete_tag(&self, key: &str) {
        self.delete_tags(&[key]).await;
    }

    /// Delete tags by sending them with empty values
    pub async fn delete_tags<S: AsRef<str>>(&self, keys: &[S]) {
        self.send_tags(tags::deletion_map(keys)).await;
    }

    /// Tags the service holds for this device
    pub async fn get_tags(&self) -> Option<TagMap> {
        let player_id = self.read_id(IdKey::PlayerId).await?;
        let reply = self
            .api
            .request(&endpoints::player(&player_id), Method::Get, None)
            .await?;
        tags::parse_tags(&reply)
    }

    async fn put_tags(&self, player_id: &str, map: &TagMap) {
        let app_id = self.init_options().map(|o| o.app_id);
        let body = tags::tag_update_body(app_id.as_deref(), map);
        self.api
            .request(&endpoints::player(player_id), Method::Put, Some(&body))
            .await;
    }

    pub(crate) async fn flush_pending_tags(&self, player_id: &str) {
        let pending = self.pending_tags.borrow_mut().take();
        if pending.is_empty() {
            return;
        }
        tracing::debug!("Flushing {} held tag(s)", pending.len());
        self.put_tags(player_id, &pending).await;
    }

    // === Identity ===

    /// Deliver the device ids once they are known.
    ///
    /// Answers immediately when a player id is stored; otherwise the callback
    /// waits for the next completed registration. It is called at most once.
    pub async fn get_ids_available(&self, callback: impl FnOnce(Ids) + 'static) {
        self.ids_waiter.park(Box::new(callback));

        let Some(player_id) = self.read_id(IdKey::PlayerId).await else {
            return;
        };
        let registration_id = self.read_id(IdKey::RegistrationId).await;
        self.ids_waiter.resolve(Ids {
            player_id,
            registration_id,
        });
    }

    // === Opened notifications ===

    /// Listen for opened notifications.
    ///
    /// If this page was opened by a notification, its payload was parked
    /// under the page URL; it is delivered now and removed. Returns whether
    /// such a payload was delivered.
    pub async fn add_listener_for_notification_opened(
        &self,
        callback: impl Fn(NotificationPayload) + 'static,
    ) -> bool {
        let callback: OpenedCallback = Rc::new(callback);
        *self.opened_listener.borrow_mut() = Some(callback.clone());

        let url = self.host.url();
        match self.store.take_opened::<NotificationPayload>(&url).await {
            Ok(Some(payload)) => {
                callback(payload);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Cannot read parked open event for {}: {}", url, e);
                false
            }
        }
    }

    /// Message posted to this page by the worker
    pub fn on_message(&self, origin: &str, data: &Value) -> bool {
        if self
            .config
            .trusted_origin
            .as_deref()
            .is_some_and(|trusted| trusted != origin)
        {
            tracing::debug!("Ignoring message from {}", origin);
            return false;
        }

        let payload: NotificationPayload = match serde_json::from_value(data.clone()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!("Ignoring non-notification message: {}", e);
                return false;
            }
        };

        let listener = self.opened_listener.borrow().clone();
        match listener {
            Some(listener) => {
                listener(payload);
                true
            }
            None => false,
        }
    }
}
