//! Notification Dispatcher
//!
//! Turns an inbound push into a displayed notification. The push itself
//! carries no data; the newest notification is fetched from the service and
//! merged with the stored display defaults.

use fos_push_net::{endpoints, Method};
use fos_push_store::{IdKey, OptionKey};

use crate::descriptor::normalize_language;
use crate::payload::LastNotification;
use crate::platform::DisplayRequest;
use crate::worker::WorkerContext;
use crate::PushError;

/// Title: payload title, then the host default, then the captured page title
pub fn resolve_title(payload: Option<&str>, default_title: Option<&str>, page_title: Option<&str>) -> String {
    payload
        .or(default_title)
        .or(page_title)
        .unwrap_or_default()
        .to_string()
}

/// Icon: payload icon, then the host default. `None` leaves the platform icon.
pub fn resolve_icon(payload: Option<&str>, default_icon: Option<&str>) -> Option<String> {
    payload
        .or(default_icon)
        .filter(|icon| !icon.is_empty())
        .map(str::to_string)
}

/// Launch URL: payload URL, then the host default, then the worker scope
pub fn resolve_launch_url(payload: Option<&str>, default_url: Option<&str>, scope: &str) -> String {
    payload
        .filter(|url| !url.is_empty())
        .or(default_url.filter(|url| !url.is_empty()))
        .unwrap_or(scope)
        .to_string()
}

/// Fetch the newest notification and request its display
pub(crate) async fn dispatch(ctx: &WorkerContext) -> Result<DisplayRequest, PushError> {
    let app_id = ctx
        .store
        .id_text(IdKey::AppId)
        .await?
        .ok_or_else(|| PushError::Config("no appId stored; cannot fetch notification".into()))?;

    let language = normalize_language(ctx.descriptor.language().as_deref());
    let reply = ctx
        .api
        .send(&endpoints::last_notification(&app_id, &language), Method::Get, None)
        .await?;
    let last: LastNotification =
        serde_json::from_value(reply).map_err(|e| PushError::Decode(format!("last notification: {}", e)))?;

    let default_title = ctx.store.option(OptionKey::DefaultTitle).await?;
    let page_title = ctx.store.option(OptionKey::PageTitle).await?;
    let default_icon = ctx.store.option(OptionKey::DefaultIcon).await?;
    let default_url = ctx.store.option(OptionKey::DefaultUrl).await?;

    let title = resolve_title(last.title.as_deref(), default_title.as_deref(), page_title.as_deref());
    let icon = resolve_icon(last.icon_override(), default_icon.as_deref());
    let launch_url = resolve_launch_url(
        last.launch_url_override(),
        default_url.as_deref(),
        &ctx.global.scope(),
    );

    let payload = last.to_payload(&title);
    let request = DisplayRequest {
        title,
        body: last.alert.clone(),
        icon,
        tag: payload.to_tag()?,
    };

    tracing::info!("Showing notification {} (opens {})", payload.id, launch_url);
    ctx.global.show_notification(request.clone());

    Ok(request)
}
