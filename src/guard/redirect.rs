//! Bounce a signed-in staff member away from public pages.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

use session::{Role, SessionStore};

use super::SessionVerifier;
use super::liveness::Liveness;
use super::navigator::Navigator;
use crate::config::RoutePaths;

/// Staff landing page. Unknown or member roles land on the admin dashboard.
#[must_use]
pub fn redirect_target(role: Option<Role>, routes: &RoutePaths) -> &str {
    match role {
        Some(Role::Checker) => &routes.checker_dashboard,
        Some(Role::Admin | Role::Family | Role::Donor) | None => &routes.admin_dashboard,
    }
}

/// Verify the stored `admin` session and redirect to its dashboard.
///
/// Returns the path navigated to, if any. A failed verification clears the
/// namespace without redirecting.
pub async fn run_redirect_guard<V, N>(
    store: &SessionStore,
    verifier: &V,
    routes: &RoutePaths,
    navigator: &N,
    liveness: &Liveness,
) -> Option<String>
where
    V: SessionVerifier + ?Sized,
    N: Navigator + ?Sized,
{
    let record = store.get_auth();
    let token = record.active_token()?;

    match verifier.verify_staff(token).await {
        Ok(profile) => {
            let target = redirect_target(profile.role(), routes).to_owned();
            if !liveness.is_alive() {
                return None;
            }
            log::info!("redirect guard: staff session active; redirecting to {target}");
            navigator.replace(&target);
            Some(target)
        }
        Err(err) => {
            log::info!("redirect guard: stale staff session cleared: {err}");
            store.clear_auth();
            None
        }
    }
}
