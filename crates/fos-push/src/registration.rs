//! Registration State Machine
//!
//! Installs (or reinstalls) the push worker, subscribes for push and
//! exchanges the device descriptor with the push service.
//!
//! Two worker scripts exist. The primary script is the steady-state worker;
//! the updater script lets a version bump force a clean reinstall without
//! touching a healthy worker. Each script records the build version that
//! installed it in its own identity slot.

use fos_push_net::{endpoints, Method};
use fos_push_store::IdKey;
use serde_json::Value;

use crate::config::SdkConfig;
use crate::descriptor::DeviceDescriptor;
use crate::identity::Ids;
use crate::page::PageContext;
use crate::platform::{NotificationPermission, WorkerRegistration};
use crate::PushError;

/// One of the SDK's worker scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerScript {
    Primary,
    Updater,
}

impl WorkerScript {
    /// Script URL to register
    pub fn script_url<'a>(&self, config: &'a SdkConfig) -> &'a str {
        match self {
            WorkerScript::Primary => &config.primary_worker_script,
            WorkerScript::Updater => &config.updater_worker_script,
        }
    }

    /// Identity slot holding the version this script was installed at
    pub fn version_slot(&self) -> IdKey {
        match self {
            WorkerScript::Primary => IdKey::WorkerVersionSlotA,
            WorkerScript::Updater => IdKey::WorkerVersionSlotB,
        }
    }

    /// Identify a script URL
    pub fn from_script_url(url: &str, config: &SdkConfig) -> Option<Self> {
        if url.contains(config.primary_worker_script.as_str()) {
            Some(WorkerScript::Primary)
        } else if url.contains(config.updater_worker_script.as_str()) {
            Some(WorkerScript::Updater)
        } else {
            None
        }
    }
}

/// Current worker registration, as far as installation is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerSnapshot {
    /// Nothing registered
    Unregistered,
    /// One of our scripts is active
    Active(WorkerScript),
    /// Some other script is active on this scope
    ActiveForeign,
    /// A worker is installing and none is active
    Installing,
    /// Registered, but neither active nor installing
    Idle,
}

impl WorkerSnapshot {
    pub fn of(registration: Option<&dyn WorkerRegistration>, config: &SdkConfig) -> Self {
        let Some(registration) = registration else {
            return WorkerSnapshot::Unregistered;
        };

        match registration.active_script_url() {
            Some(url) => match WorkerScript::from_script_url(&url, config) {
                Some(script) => WorkerSnapshot::Active(script),
                None => WorkerSnapshot::ActiveForeign,
            },
            None if registration.is_installing() => WorkerSnapshot::Installing,
            None => WorkerSnapshot::Idle,
        }
    }
}

/// Installation decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPlan {
    /// Register the script; re-registering an installed script is a no-op
    Install(WorkerScript),
    /// Unregister the current worker, then register the script fresh
    Reinstall(WorkerScript),
    /// Leave the registration alone
    Skip,
}

/// Decide how to install given the current worker and its recorded version
pub fn plan_install(snapshot: WorkerSnapshot, stored_version: Option<i64>, build_version: i64) -> InstallPlan {
    match snapshot {
        WorkerSnapshot::Unregistered | WorkerSnapshot::Installing | WorkerSnapshot::Idle => {
            InstallPlan::Install(WorkerScript::Primary)
        }
        WorkerSnapshot::Active(script) => match stored_version {
            Some(version) if version != build_version => InstallPlan::Reinstall(script),
            _ => InstallPlan::Install(script),
        },
        WorkerSnapshot::ActiveForeign => InstallPlan::Skip,
    }
}

/// Why registration stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NotInitialized,
    WorkersUnsupported,
    /// A worker the SDK does not own controls this scope
    ForeignWorker,
    PushUnsupported,
    NotificationsUnsupported,
    PermissionDenied,
    /// The service answered without an id and none was stored
    NoPlayerId,
    Platform,
    Store,
    Service,
}

impl From<&PushError> for StopReason {
    fn from(error: &PushError) -> Self {
        match error {
            PushError::Config(_) => StopReason::NotInitialized,
            PushError::Store(_) => StopReason::Store,
            PushError::Api(_) | PushError::Decode(_) => StopReason::Service,
            PushError::Platform(_) => StopReason::Platform,
        }
    }
}

/// Result of a registration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered(Ids),
    Stopped(StopReason),
}

/// Run registration, logging and absorbing any failure
pub(crate) async fn register(ctx: &PageContext) -> RegistrationOutcome {
    match try_register(ctx).await {
        Ok(outcome) => {
            if let RegistrationOutcome::Stopped(reason) = &outcome {
                tracing::info!("Registration stopped: {:?}", reason);
            }
            outcome
        }
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            RegistrationOutcome::Stopped(StopReason::from(&e))
        }
    }
}

async fn try_register(ctx: &PageContext) -> Result<RegistrationOutcome, PushError> {
    let Some(options) = ctx.init_options() else {
        return Ok(RegistrationOutcome::Stopped(StopReason::NotInitialized));
    };
    if !ctx.workers.is_supported() {
        tracing::info!("Service workers are not supported in this browser");
        return Ok(RegistrationOutcome::Stopped(StopReason::WorkersUnsupported));
    }

    ctx.store.set_id(IdKey::AppId, options.app_id.as_str()).await?;
    ctx.store
        .set_option(fos_push_store::OptionKey::PageTitle, &ctx.host.title())
        .await?;

    let current = ctx.workers.registration().await?;
    let snapshot = WorkerSnapshot::of(current.as_deref(), &ctx.config);
    let stored_version = match snapshot {
        WorkerSnapshot::Active(script) => ctx
            .store
            .id(script.version_slot())
            .await?
            .and_then(|v| v.as_number()),
        _ => None,
    };

    let plan = plan_install(snapshot, stored_version, ctx.config.sdk_version);
    tracing::debug!("Worker {:?} (version {:?}) -> {:?}", snapshot, stored_version, plan);

    match plan {
        InstallPlan::Skip => return Ok(RegistrationOutcome::Stopped(StopReason::ForeignWorker)),
        InstallPlan::Install(script) => {
            ctx.workers.register(script.script_url(&ctx.config)).await?;
        }
        InstallPlan::Reinstall(script) => {
            if let Some(current) = &current {
                current.unregister().await?;
            }
            ctx.workers.register(script.script_url(&ctx.config)).await?;
        }
    }

    subscribe(ctx, &options.app_id).await
}

async fn subscribe(ctx: &PageContext, app_id: &str) -> Result<RegistrationOutcome, PushError> {
    if !ctx.workers.push_supported() {
        return Ok(RegistrationOutcome::Stopped(StopReason::PushUnsupported));
    }
    if !ctx.workers.notifications_supported() {
        return Ok(RegistrationOutcome::Stopped(StopReason::NotificationsUnsupported));
    }
    if ctx.workers.permission() == NotificationPermission::Denied {
        return Ok(RegistrationOutcome::Stopped(StopReason::PermissionDenied));
    }

    let ready = ctx.workers.ready().await;
    let registration_id = match ready.subscribe().await? {
        Some(subscription) => subscription.subscription_id,
        None => {
            tracing::warn!("Push subscribe returned no subscription");
            None
        }
    };
    tracing::debug!("Registration id: {:?}", registration_id);

    exchange_identity(ctx, app_id, registration_id).await
}

/// Create the player, or confirm the session of the stored one
async fn exchange_identity(
    ctx: &PageContext,
    app_id: &str,
    registration_id: Option<String>,
) -> Result<RegistrationOutcome, PushError> {
    let stored_player = ctx.store.id_text(IdKey::PlayerId).await?;
    let descriptor = DeviceDescriptor::collect(
        &ctx.config,
        app_id,
        ctx.descriptor.as_ref(),
        registration_id.as_deref(),
    );

    if let Some(token) = &registration_id {
        ctx.store.set_id(IdKey::RegistrationId, token.as_str()).await?;
    }

    let (path, method) = match &stored_player {
        Some(player_id) => (endpoints::player_on_session(player_id), Method::Put),
        None => (endpoints::players(), Method::Post),
    };
    let body = serde_json::to_value(&descriptor).map_err(|e| PushError::Decode(e.to_string()))?;
    let reply = ctx.api.send(&path, method, Some(&body)).await?;

    let returned = reply.get("id").and_then(Value::as_str).map(str::to_string);
    if let Some(player_id) = &returned {
        ctx.store.set_id(IdKey::PlayerId, player_id.as_str()).await?;
    }

    let Some(player_id) = returned.or(stored_player) else {
        return Ok(RegistrationOutcome::Stopped(StopReason::NoPlayerId));
    };
    tracing::info!("Registered player {}", player_id);

    let ids = Ids {
        player_id,
        registration_id,
    };
    ctx.ids_waiter.resolve(ids.clone());
    ctx.flush_pending_tags(&ids.player_id).await;

    Ok(RegistrationOutcome::Registered(ids))
}
