//! Explicit change notifications for session writes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Navigation chrome (the session menu) must react when any page signs a role
//! in or out. Instead of a browser-wide custom event, stores publish to this
//! hub and interested components subscribe per namespace.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::role::Namespace;

/// What happened to a namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    SignedIn,
    UserUpdated,
    SignedOut,
}

/// A single session change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionChange {
    pub namespace: Namespace,
    pub kind: ChangeKind,
}

/// Handle returned by [`SessionEvents::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&SessionChange) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    namespace: Option<Namespace>,
    listener: Listener,
}

#[derive(Default)]
struct Hub {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

/// Shared publish/subscribe hub. Clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct SessionEvents {
    hub: Arc<Mutex<Hub>>,
}

impl fmt::Debug for SessionEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEvents")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl SessionEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `listener` for every change in `namespace`.
    pub fn subscribe<F>(&self, namespace: Namespace, listener: F) -> SubscriptionId
    where
        F: Fn(&SessionChange) + Send + Sync + 'static,
    {
        self.add(Some(namespace), Arc::new(listener))
    }

    /// Call `listener` for every change in any namespace.
    pub fn subscribe_all<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SessionChange) + Send + Sync + 'static,
    {
        self.add(None, Arc::new(listener))
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut hub = self.hub.lock().unwrap_or_else(PoisonError::into_inner);
        let before = hub.subscriptions.len();
        hub.subscriptions.retain(|s| s.id != id);
        hub.subscriptions.len() != before
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.hub
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscriptions
            .len()
    }

    /// Deliver `change` to matching listeners.
    ///
    /// Listeners are collected under the lock and invoked after it is
    /// released, so they may re-enter the hub.
    pub(crate) fn emit(&self, change: SessionChange) {
        let listeners: Vec<Listener> = {
            let hub = self.hub.lock().unwrap_or_else(PoisonError::into_inner);
            hub.subscriptions
                .iter()
                .filter(|s| s.namespace.is_none_or(|ns| ns == change.namespace))
                .map(|s| Arc::clone(&s.listener))
                .collect()
        };
        log::debug!("session change: {}={:?} ({} listeners)", change.namespace, change.kind, listeners.len());
        for listener in listeners {
            listener(&change);
        }
    }

    fn add(&self, namespace: Option<Namespace>, listener: Listener) -> SubscriptionId {
        let mut hub = self.hub.lock().unwrap_or_else(PoisonError::into_inner);
        hub.next_id += 1;
        let id = SubscriptionId(hub.next_id);
        hub.subscriptions.push(Subscription { id, namespace, listener });
        id
    }
}
