//! Event lifetime extension
//!
//! Push and click handlers run inside platform events that may be torn down
//! once the handler returns. Work started by a handler holds a guard; the
//! platform keeps the context alive until every guard is dropped.

/// Keeps an event's context alive until dropped
#[must_use = "the event may end as soon as the guard is dropped"]
pub struct LifetimeGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl LifetimeGuard {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard with nothing to release
    pub fn detached() -> Self {
        Self { release: None }
    }
}

impl Drop for LifetimeGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for LifetimeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifetimeGuard")
            .field("held", &self.release.is_some())
            .finish()
    }
}

/// An event whose lifetime can be extended (push, notificationclick)
pub trait ExtendableEvent {
    fn extend_lifetime(&self) -> LifetimeGuard;
}
