//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration; access control lives in the
//! guard components that `app::App` wraps around them.

pub mod dashboard;
pub mod home;
pub mod login;
pub mod register;
pub mod verify_email;
