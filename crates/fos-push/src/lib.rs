//! fOS Push
//!
//! Browser push notification client.
//!
//! Two halves share one local store:
//! - [`PageContext`] runs inside the host page. It tracks the session,
//!   installs the push worker, registers the device with the push service,
//!   and exposes the host API (tags, ids, display defaults, open listener).
//! - [`WorkerContext`] runs inside the background worker. It records the
//!   installed worker version, displays pushed notifications and routes
//!   notification clicks back to a page.
//!
//! Browser capabilities are reached through the traits in [`platform`].

mod config;
mod descriptor;
mod dispatch;
mod error;
mod identity;
mod lifetime;
pub mod logging;
mod open_event;
mod page;
mod payload;
pub mod platform;
mod registration;
mod session;
mod tags;
mod worker;

pub use config::{InitOptions, SdkConfig, DEFAULT_API_BASE, SDK_VERSION};
pub use descriptor::{normalize_language, DeviceDescriptor, PlatformDescriptor, StaticDescriptor};
pub use dispatch::{resolve_icon, resolve_launch_url, resolve_title};
pub use error::PushError;
pub use identity::{Ids, IdsCallback, IdsWaiter};
pub use lifetime::{ExtendableEvent, LifetimeGuard};
pub use open_event::{find_window, OpenRoute};
pub use page::{OpenedCallback, PageContext, PagePlatform};
pub use payload::{CustomData, LastNotification, NotificationPayload};
pub use registration::{
    plan_install, InstallPlan, RegistrationOutcome, StopReason, WorkerScript, WorkerSnapshot,
};
pub use session::{on_ready, SessionOutcome, SessionState, SessionStep};
pub use tags::{deletion_map, parse_tags, tag_update_body, PendingTags, TagMap};
pub use worker::{WorkerContext, WorkerPlatform};

pub use fos_push_net::{HttpTransport, Method, NetError, ReqwestTransport, Request, Response};
pub use fos_push_store::{IdKey, MemoryEngine, OptionKey, StoreEngine, StoreError};
