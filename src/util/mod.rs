//! Browser glue used by the session layer and the guards.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each helper is real under `hydrate` and a no-op stub otherwise, so SSR and
//! native tests exercise the same call sites without a DOM.

pub mod local_storage;
pub mod no_cache;
