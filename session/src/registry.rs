//! Operations spanning every session namespace.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::sync::Arc;

use crate::events::SessionEvents;
use crate::profile::UserProfile;
use crate::role::{Namespace, Role};
use crate::storage::Storage;
use crate::store::SessionStore;

/// Summary of one signed-in namespace, for account switchers.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveSession {
    pub namespace: Namespace,
    pub user: UserProfile,
    pub user_type: Option<Role>,
    /// `firstName`, else `name`, else the user type.
    pub display_name: String,
}

/// Entry point to all namespaces over one shared storage backend.
#[derive(Clone)]
pub struct SessionRegistry {
    storage: Arc<dyn Storage>,
    events: SessionEvents,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage, events: SessionEvents::new() }
    }

    /// Store for `namespace`, sharing this registry's storage and events.
    #[must_use]
    pub fn store(&self, namespace: Namespace) -> SessionStore {
        SessionStore::new(namespace, Arc::clone(&self.storage), self.events.clone())
    }

    #[must_use]
    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    /// Every namespace currently holding an active session, in namespace order.
    #[must_use]
    pub fn active_sessions(&self) -> Vec<ActiveSession> {
        Namespace::ALL
            .into_iter()
            .filter_map(|namespace| {
                let record = self.store(namespace).get_auth();
                if !record.is_authenticated {
                    return None;
                }
                let user = record.user?;
                let fallback = record.user_type.map_or("", Role::as_str);
                let display_name = user.display_name(fallback);
                Some(ActiveSession { namespace, user, user_type: record.user_type, display_name })
            })
            .collect()
    }

    /// Sign out of every namespace.
    pub fn clear_all_sessions(&self) {
        for namespace in Namespace::ALL {
            self.store(namespace).clear_auth();
        }
    }
}
