//! Namespaced browser-session model shared by the web client and its tests.
//!
//! This crate owns the persisted shape of an authentication session: which
//! keys are written, how a record is judged active, and how independent role
//! namespaces coexist in one key-value store. It has no browser dependency;
//! the client plugs `localStorage` in through the [`Storage`] trait and tests
//! use [`MemoryStorage`].
//!
//! DESIGN
//! ======
//! Every namespace prefixes its keys (`admin_token`, `auth_user`, ...), so two
//! namespaces never share a physical key. That prefix is the only isolation
//! mechanism; the store itself is shared and last-writer-wins.

pub mod events;
pub mod profile;
pub mod registry;
pub mod role;
pub mod storage;
pub mod store;

pub use events::{ChangeKind, SessionChange, SessionEvents, SubscriptionId};
pub use profile::UserProfile;
pub use registry::{ActiveSession, SessionRegistry};
pub use role::{Namespace, Role};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use store::{SessionError, SessionRecord, SessionStore};
