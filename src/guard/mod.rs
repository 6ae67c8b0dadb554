//! Route-guard decision logic, independent of any component tree.
//!
//! SYSTEM CONTEXT
//! ==============
//! `components::route_guard` and `components::redirect_guard` mount these
//! state machines inside Leptos views. Keeping the decisions here lets them
//! run under native tests with in-memory storage, a scripted transport and a
//! recording navigator.
//!
//! DESIGN
//! ======
//! A guard never trusts a stored token on its own: the token is verified
//! remotely through [`SessionVerifier`] and every ambiguous outcome is
//! treated as a failed verification.

pub mod liveness;
pub mod navigator;
pub mod redirect;
pub mod route;

pub use liveness::Liveness;
pub use navigator::{Navigator, RouterNavigator};
pub use redirect::{redirect_target, run_redirect_guard};
pub use route::{Denial, GuardPolicy, GuardState, Resolution, evaluate, resolve, run_guard, watch_sign_out};

use async_trait::async_trait;
use session::UserProfile;

/// Why a remote token check did not produce a profile.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("token rejected (HTTP {status})")]
    Rejected { status: u16 },
    #[error("verification unreachable: {0}")]
    Transport(String),
    #[error("malformed verification response: {0}")]
    Malformed(String),
}

/// Remote token verification used by the guards.
#[async_trait(?Send)]
pub trait SessionVerifier {
    /// Verify a family/donor token and return the member profile.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] unless the server confirmed the token.
    async fn verify_member(&self, token: &str) -> Result<UserProfile, VerifyError>;

    /// Verify an admin/checker token and return the staff profile.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] unless the server confirmed the token.
    async fn verify_staff(&self, token: &str) -> Result<UserProfile, VerifyError>;
}
