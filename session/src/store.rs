//! Per-namespace authentication record over a shared [`Storage`].
//!
//! DESIGN
//! ======
//! A record is four keys: `{ns}_token`, `{ns}_user` (JSON), `{ns}_userType`
//! and `{ns}_isAuthenticated` (`"true"` or absent). It is *active* only when
//! the flag is set, the token is non-empty and the user parses. Anything
//! short of that reads back as [`SessionRecord::default`], never as a
//! half-valid session.
//!
//! `set_auth` writes the flag last. A failure part-way leaves the flag unset,
//! so readers never observe a partial write as signed in.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;

use crate::events::{ChangeKind, SessionChange, SessionEvents};
use crate::profile::UserProfile;
use crate::role::{Namespace, Role};
use crate::storage::{Storage, StorageError};

const FIELD_TOKEN: &str = "token";
const FIELD_USER: &str = "user";
const FIELD_USER_TYPE: &str = "userType";
const FIELD_IS_AUTHENTICATED: &str = "isAuthenticated";

const FIELDS: [&str; 4] = [FIELD_TOKEN, FIELD_USER, FIELD_USER_TYPE, FIELD_IS_AUTHENTICATED];

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("refusing to store an empty token")]
    EmptyToken,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to serialize user: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Snapshot of one namespace as returned by [`SessionStore::get_auth`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionRecord {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub user_type: Option<Role>,
    pub is_authenticated: bool,
}

impl SessionRecord {
    /// Token of an active record.
    #[must_use]
    pub fn active_token(&self) -> Option<&str> {
        if self.is_authenticated { self.token.as_deref() } else { None }
    }

    /// Effective role: the profile's role, else the stored `userType`.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(UserProfile::role).or(self.user_type)
    }
}

/// Session record for one namespace.
///
/// Cheap to clone; clones share the storage backend and event hub.
#[derive(Clone)]
pub struct SessionStore {
    namespace: Namespace,
    storage: Arc<dyn Storage>,
    events: SessionEvents,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(namespace: Namespace, storage: Arc<dyn Storage>, events: SessionEvents) -> Self {
        Self { namespace, storage, events }
    }

    #[must_use]
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Persist a freshly issued session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyToken`] for a blank token, or the storage
    /// error of the first failed write. In the error case the namespace has
    /// been cleared, and a session it held before is reported as signed out.
    pub fn set_auth(&self, token: &str, user: &UserProfile, user_type: Role) -> Result<(), SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let user_json = serde_json::to_string(user)?;
        let was_active = self.has_auth();

        let written = self
            .write(FIELD_TOKEN, token)
            .and_then(|()| self.write(FIELD_USER, &user_json))
            .and_then(|()| self.write(FIELD_USER_TYPE, user_type.as_str()))
            .and_then(|()| self.write(FIELD_IS_AUTHENTICATED, "true"));

        if let Err(err) = written {
            log::warn!("{}: session write failed, clearing: {err}", self.namespace);
            self.remove_all();
            if was_active {
                self.emit(ChangeKind::SignedOut);
            }
            return Err(err.into());
        }

        log::info!("{}: signed in as {user_type}", self.namespace);
        self.emit(ChangeKind::SignedIn);
        Ok(())
    }

    /// Read the namespace, failing closed on anything malformed.
    #[must_use]
    pub fn get_auth(&self) -> SessionRecord {
        if self.read(FIELD_IS_AUTHENTICATED).as_deref() != Some("true") {
            return SessionRecord::default();
        }
        let Some(token) = self.read(FIELD_TOKEN).filter(|t| !t.is_empty()) else {
            log::debug!("{}: authenticated flag without token", self.namespace);
            return SessionRecord::default();
        };
        let Some(raw_user) = self.read(FIELD_USER) else {
            log::debug!("{}: authenticated flag without user", self.namespace);
            return SessionRecord::default();
        };
        let user = match serde_json::from_str::<UserProfile>(&raw_user) {
            Ok(user) => user,
            Err(err) => {
                log::warn!("{}: stored user is malformed, treating as signed out: {err}", self.namespace);
                return SessionRecord::default();
            }
        };
        let user_type = self.read(FIELD_USER_TYPE).and_then(|raw| raw.parse::<Role>().ok());

        SessionRecord { token: Some(token), user: Some(user), user_type, is_authenticated: true }
    }

    /// Replace the stored profile, leaving the token and flag untouched.
    ///
    /// # Errors
    ///
    /// Returns a serialization or storage error; the previous profile stays in
    /// place in that case.
    pub fn set_user(&self, user: &UserProfile) -> Result<(), SessionError> {
        let user_json = serde_json::to_string(user)?;
        self.write(FIELD_USER, &user_json)?;
        self.emit(ChangeKind::UserUpdated);
        Ok(())
    }

    /// Remove every key of the namespace. Safe to call on an empty namespace.
    pub fn clear_auth(&self) {
        let was_active = self.has_auth();
        self.remove_all();
        if was_active {
            log::info!("{}: signed out", self.namespace);
            self.emit(ChangeKind::SignedOut);
        }
    }

    #[must_use]
    pub fn has_auth(&self) -> bool {
        self.get_auth().is_authenticated
    }

    fn read(&self, field: &str) -> Option<String> {
        self.storage.get(&self.namespace.key(field))
    }

    fn write(&self, field: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set(&self.namespace.key(field), value)
    }

    fn remove_all(&self) {
        for field in FIELDS {
            if let Err(err) = self.storage.remove(&self.namespace.key(field)) {
                log::warn!("{}: {err}", self.namespace);
            }
        }
    }

    fn emit(&self, kind: ChangeKind) {
        self.events.emit(SessionChange { namespace: self.namespace, kind });
    }
}
