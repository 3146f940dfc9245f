//! Open-Event Handler
//!
//! Runs when the user activates a notification. The open is acknowledged to
//! the service while the payload is routed to a page: an already-open window
//! at the launch URL gets it directly, otherwise it is parked in the store
//! under the launch URL and a new window is opened there. The new page picks
//! it up when it registers its open listener.

use std::rc::Rc;

use fos_push_net::{endpoints, Method};
use fos_push_store::{IdKey, OptionKey};
use serde_json::json;

use crate::dispatch::resolve_launch_url;
use crate::payload::NotificationPayload;
use crate::platform::{ActivatedNotification, WindowClient};
use crate::worker::WorkerContext;
use crate::PushError;

/// Where an opened notification was delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenRoute {
    /// An open window at the launch URL was focused and messaged
    Focused { url: String },
    /// The payload was parked and a new window opened
    Opened { url: String },
}

impl OpenRoute {
    pub fn url(&self) -> &str {
        match self {
            OpenRoute::Focused { url } | OpenRoute::Opened { url } => url,
        }
    }
}

/// Window whose URL is exactly the launch URL
pub fn find_window<'a>(windows: &'a [Rc<dyn WindowClient>], launch_url: &str) -> Option<&'a Rc<dyn WindowClient>> {
    windows
        .iter()
        .find(|window| window.can_focus() && window.url() == launch_url)
}

pub(crate) async fn handle(
    ctx: &WorkerContext,
    notification: &dyn ActivatedNotification,
) -> Result<OpenRoute, PushError> {
    let payload = NotificationPayload::from_tag(&notification.tag());
    notification.close();
    let payload = payload?;

    let (_, route) = smol::future::zip(acknowledge(ctx, &payload), route(ctx, &payload)).await;
    route
}

/// Report the open to the service. Best effort.
async fn acknowledge(ctx: &WorkerContext, payload: &NotificationPayload) -> bool {
    let app_id = match ctx.store.id_text(IdKey::AppId).await {
        Ok(Some(app_id)) => app_id,
        Ok(None) => return false,
        Err(e) => {
            tracing::warn!("Cannot read appId for open acknowledgment: {}", e);
            return false;
        }
    };
    let player_id = match ctx.store.id_text(IdKey::PlayerId).await {
        Ok(Some(player_id)) => player_id,
        Ok(None) => return false,
        Err(e) => {
            tracing::warn!("Cannot read playerId for open acknowledgment: {}", e);
            return false;
        }
    };

    let body = json!({ "app_id": app_id, "player_id": player_id, "opened": true });
    ctx.api
        .request(&endpoints::notification(&payload.id), Method::Put, Some(&body))
        .await
        .is_some()
}

async fn route(ctx: &WorkerContext, payload: &NotificationPayload) -> Result<OpenRoute, PushError> {
    let default_url = ctx.store.option(OptionKey::DefaultUrl).await.unwrap_or_else(|e| {
        tracing::warn!("Cannot read default URL: {}", e);
        None
    });
    let url = resolve_launch_url(
        payload.launch_url.as_deref(),
        default_url.as_deref(),
        &ctx.global.scope(),
    );

    let windows = ctx.global.match_windows().await;
    if let Some(window) = find_window(&windows, &url) {
        window.focus();
        window.post_message(payload);
        return Ok(OpenRoute::Focused { url });
    }

    if let Err(e) = ctx.store.stash_opened(&url, payload).await {
        tracing::warn!("Cannot park open event for {}: {}", url, e);
    }
    ctx.global.open_window(&url).await?;

    Ok(OpenRoute::Opened { url })
}
