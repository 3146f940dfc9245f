//! Host platform capabilities
//!
//! The browser pieces the SDK drives but does not implement: the document,
//! the service worker container, the worker global scope and its window
//! clients. Hosts implement these traits over their runtime; tests implement
//! them with scripted fakes.

use std::rc::Rc;

use async_trait::async_trait;

use crate::payload::NotificationPayload;

/// Document visibility state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
    Prerender,
}

/// Notification permission state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPermission {
    #[default]
    Default,
    Granted,
    Denied,
}

/// Push subscription returned by the platform
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PushSubscription {
    pub endpoint: String,
    /// Transient registration token, when the platform exposes one
    pub subscription_id: Option<String>,
}

/// Notification display request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRequest {
    pub title: String,
    pub body: String,
    /// `None` leaves the platform default icon
    pub icon: Option<String>,
    /// Serialized [`NotificationPayload`] recovered when the notification is opened
    pub tag: String,
}

/// Platform errors
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Security error: {0}")]
    Security(String),

    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Service worker not found")]
    NotFound,
}

/// The page document (window side)
pub trait PageHost {
    /// Current document URL
    fn url(&self) -> String;

    /// Current document title
    fn title(&self) -> String;

    fn visibility(&self) -> VisibilityState;

    /// Read a tab-scoped session flag
    fn session_marker(&self, key: &str) -> bool;

    /// Set a tab-scoped session flag
    fn set_session_marker(&self, key: &str);
}

/// Service worker container (navigator.serviceWorker)
#[async_trait(?Send)]
pub trait WorkerContainer {
    /// Whether the runtime supports background workers at all
    fn is_supported(&self) -> bool;

    /// Whether push messaging is available
    fn push_supported(&self) -> bool;

    /// Whether workers can display notifications
    fn notifications_supported(&self) -> bool;

    fn permission(&self) -> NotificationPermission;

    /// Current registration for the page's scope
    async fn registration(&self) -> Result<Option<Rc<dyn WorkerRegistration>>, PlatformError>;

    /// Register (or re-register) a worker script
    async fn register(&self, script_url: &str) -> Result<Rc<dyn WorkerRegistration>, PlatformError>;

    /// Resolves once a registration has an active worker
    async fn ready(&self) -> Rc<dyn WorkerRegistration>;
}

/// A service worker registration
#[async_trait(?Send)]
pub trait WorkerRegistration {
    fn scope(&self) -> String;

    /// Script URL of the active worker, if one is active
    fn active_script_url(&self) -> Option<String>;

    /// Whether a worker is currently installing
    fn is_installing(&self) -> bool;

    async fn unregister(&self) -> Result<bool, PlatformError>;

    /// Subscribe for push. `Ok(None)` means the platform returned no subscription.
    async fn subscribe(&self) -> Result<Option<PushSubscription>, PlatformError>;
}

/// Worker global scope (background side)
#[async_trait(?Send)]
pub trait WorkerGlobal {
    /// Registration scope of this worker
    fn scope(&self) -> String;

    /// URL of this worker's own script
    fn script_url(&self) -> String;

    /// Request display; does not wait for the notification to appear
    fn show_notification(&self, request: DisplayRequest);

    /// Window clients controlled by this worker
    async fn match_windows(&self) -> Vec<Rc<dyn WindowClient>>;

    async fn open_window(&self, url: &str) -> Result<(), PlatformError>;
}

/// A window client seen from the worker
pub trait WindowClient {
    fn url(&self) -> String;

    fn can_focus(&self) -> bool;

    fn focus(&self);

    fn post_message(&self, payload: &NotificationPayload);
}

/// A notification the user activated
pub trait ActivatedNotification {
    fn tag(&self) -> String;

    fn close(&self);
}
