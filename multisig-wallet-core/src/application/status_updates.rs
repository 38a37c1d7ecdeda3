//! Wallet status update subscriptions
//!
//! Presentation layers subscribe a handler and get a bare "state changed"
//! signal; they query the service for the new state themselves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub type StatusUpdateHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct StatusUpdates {
    handlers: Mutex<HashMap<String, StatusUpdateHandler>>,
}

impl StatusUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; the returned id unsubscribes it
    pub fn subscribe<F>(&self, handler: F) -> String
    where
        F: Fn() + Send + Sync + 'static,
    {
        let key = uuid::Uuid::new_v4().to_string();
        self.lock().insert(key.clone(), Arc::new(handler));
        key
    }

    /// Remove a handler. Returns false for unknown ids.
    pub fn unsubscribe(&self, subscription: &str) -> bool {
        self.lock().remove(subscription).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Invoke every handler. Handlers run outside the lock.
    pub fn notify(&self) {
        let handlers: Vec<StatusUpdateHandler> = self.lock().values().cloned().collect();
        log::debug!("Notifying {} status update subscribers", handlers.len());
        for handler in handlers {
            handler();
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StatusUpdateHandler>> {
        // A panicking handler never runs under the lock, so the map is intact
        self.handlers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscribe_and_notify() {
        let updates = StatusUpdates::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        updates.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = calls.clone();
        updates.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        updates.notify();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let updates = StatusUpdates::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let id = updates.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(updates.unsubscribe(&id));
        assert!(!updates.unsubscribe(&id));
        updates.notify();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(updates.subscriber_count(), 0);
    }

    #[test]
    fn test_handler_may_unsubscribe_itself() {
        let updates = Arc::new(StatusUpdates::new());
        let id_slot = Arc::new(Mutex::new(String::new()));

        let inner_updates = updates.clone();
        let inner_slot = id_slot.clone();
        let id = updates.subscribe(move || {
            let id = inner_slot.lock().unwrap().clone();
            inner_updates.unsubscribe(&id);
        });
        *id_slot.lock().unwrap() = id;

        updates.notify();
        assert_eq!(updates.subscriber_count(), 0);
    }
}
