//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guards wrap routes in `app::App`; the session menu is shared by every
//! dashboard page.

pub mod redirect_guard;
pub mod route_guard;
pub mod session_menu;
