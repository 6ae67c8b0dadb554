//! # relief
//!
//! Leptos + WASM client for the relief portal: families register damage
//! claims, checkers verify them, admins manage staff and donors fund
//! approved cases. The backend is an external REST API.
//!
//! This crate contains the authenticated API client, the route guards that
//! keep each dashboard behind a verified session, and the minimal pages that
//! mount them. Session persistence itself lives in the `session` crate.

pub mod app;
pub mod components;
pub mod config;
pub mod guard;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: installs logging and hydrates the server-rendered page.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
