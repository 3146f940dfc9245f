//! Session Manager
//!
//! Decides once per page load whether registration runs. A tab-scoped marker
//! stops a second attempt within the same load; a hidden page defers the
//! attempt until it first becomes visible.

use fos_push_store::IdKey;

use crate::page::PageContext;
use crate::platform::VisibilityState;
use crate::registration::{self, RegistrationOutcome};

/// Per-load session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    NotStarted,
    WaitingForVisible,
    Registering,
    Done,
}

/// What page-ready should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    /// Marker already set for this tab
    AlreadyStarted,
    /// No registration yet and the host turned auto-registration off
    AutoRegisterDisabled,
    /// Page is hidden; wait for the first visible transition
    WaitForVisible,
    Register,
}

impl SessionStep {
    /// Whether this step sets the session marker
    pub fn marks_session(&self) -> bool {
        !matches!(self, SessionStep::AlreadyStarted)
    }

    /// State entered after taking this step
    pub fn next_state(&self) -> SessionState {
        match self {
            SessionStep::AlreadyStarted | SessionStep::AutoRegisterDisabled => SessionState::Done,
            SessionStep::WaitForVisible => SessionState::WaitingForVisible,
            SessionStep::Register => SessionState::Registering,
        }
    }
}

/// Decide the page-ready step
pub fn on_ready(
    marker_set: bool,
    has_registration_id: bool,
    auto_register: bool,
    visibility: VisibilityState,
) -> SessionStep {
    if marker_set {
        return SessionStep::AlreadyStarted;
    }
    if !auto_register && !has_registration_id {
        return SessionStep::AutoRegisterDisabled;
    }
    if visibility != VisibilityState::Visible {
        return SessionStep::WaitForVisible;
    }
    SessionStep::Register
}

/// Result of a session transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// `init` has not been called
    NotInitialized,
    AlreadyStarted,
    AutoRegisterDisabled,
    WaitingForVisible,
    Registered(RegistrationOutcome),
}

/// Handle page-ready
pub(crate) async fn page_ready(ctx: &PageContext) -> SessionOutcome {
    if ctx.session.get() != SessionState::NotStarted {
        return SessionOutcome::AlreadyStarted;
    }
    let Some(options) = ctx.init_options() else {
        tracing::warn!("Page ready before init; skipping registration");
        return SessionOutcome::NotInitialized;
    };

    let has_registration_id = ctx.read_id(IdKey::RegistrationId).await.is_some();
    let marker_key = &ctx.config.session_marker_key;
    let step = on_ready(
        ctx.host.session_marker(marker_key),
        has_registration_id,
        options.auto_register,
        ctx.host.visibility(),
    );
    tracing::debug!("Session step: {:?}", step);

    if step.marks_session() {
        ctx.host.set_session_marker(marker_key);
    }
    ctx.session.set(step.next_state());

    match step {
        SessionStep::AlreadyStarted => SessionOutcome::AlreadyStarted,
        SessionStep::AutoRegisterDisabled => SessionOutcome::AutoRegisterDisabled,
        SessionStep::WaitForVisible => SessionOutcome::WaitingForVisible,
        SessionStep::Register => SessionOutcome::Registered(run_registration(ctx).await),
    }
}

/// Handle a visibility change; only acts while waiting for the page to show
pub(crate) async fn visibility_changed(ctx: &PageContext) -> Option<SessionOutcome> {
    if ctx.session.get() != SessionState::WaitingForVisible
        || ctx.host.visibility() != VisibilityState::Visible
    {
        return None;
    }

    ctx.session.set(SessionState::Registering);
    Some(SessionOutcome::Registered(run_registration(ctx).await))
}

async fn run_registration(ctx: &PageContext) -> RegistrationOutcome {
    let outcome = registration::register(ctx).await;
    ctx.session.set(SessionState::Done);
    outcome
}
