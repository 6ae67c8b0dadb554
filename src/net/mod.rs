//! Network layer for the relief REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the HTTP seam, `types` holds the wire shapes and `api` is
//! the scoped client the guards and pages call.

pub mod api;
pub mod transport;
pub mod types;
