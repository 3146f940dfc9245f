//! Identity resolution
//!
//! The host may ask for the device ids before registration has produced them.
//! The request is parked here and answered at most once.

use std::cell::RefCell;

use serde::Serialize;

/// Device identity handed to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ids {
    pub player_id: String,
    pub registration_id: Option<String>,
}

/// Host callback for [`Ids`]
pub type IdsCallback = Box<dyn FnOnce(Ids)>;

/// Parked identity request
#[derive(Default)]
pub struct IdsWaiter {
    callback: RefCell<Option<IdsCallback>>,
}

impl IdsWaiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a callback, replacing any earlier one
    pub fn park(&self, callback: IdsCallback) {
        *self.callback.borrow_mut() = Some(callback);
    }

    pub fn is_waiting(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// Answer the parked callback, if any. Returns whether one was called.
    pub fn resolve(&self, ids: Ids) -> bool {
        let callback = self.callback.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback(ids);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for IdsWaiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdsWaiter")
            .field("waiting", &self.is_waiting())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_resolves_once() {
        let calls = Rc::new(Cell::new(0));
        let waiter = IdsWaiter::new();
        let counter = calls.clone();
        waiter.park(Box::new(move |_| counter.set(counter.get() + 1)));

        let ids = Ids {
            player_id: "P1".into(),
            registration_id: None,
        };
        assert!(waiter.resolve(ids.clone()));
        assert!(!waiter.resolve(ids));
        assert_eq!(calls.get(), 1);
        assert!(!waiter.is_waiting());
    }

    #[test]
    fn test_callback_may_park_again() {
        let waiter = Rc::new(IdsWaiter::new());
        let inner = waiter.clone();
        waiter.park(Box::new(move |_| inner.park(Box::new(|_| {}))));

        waiter.resolve(Ids {
            player_id: "P1".into(),
            registration_id: Some("R1".into()),
        });
        assert!(waiter.is_waiting());
    }

    #[test]
    fn test_ids_json_shape() {
        let ids = Ids {
            player_id: "P1".into(),
            registration_id: None,
        };
        assert_eq!(
            serde_json::to_value(&ids).unwrap(),
            serde_json::json!({"playerId": "P1", "registrationId": null})
        );
    }
}
