//! Protected-route guard: user, admin and checker policies.
//!
//! DESIGN
//! ======
//! Evaluation order is fixed: local record, remote verification, role,
//! then email verification (member guard only). An absent local session
//! short-circuits before any request is sent.
//!
//! Staff guards own the `admin` namespace and clear it on every denial
//! except a role mismatch that still points at a staff dashboard. The
//! member guard never clears `auth` itself; the API client already did so
//! if the server answered 401.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here returns an error. Every failure resolves to a redirect,
//! logged at `info` (rejections) or `warn` (transport failures).

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;

use session::{ChangeKind, Namespace, Role, SessionEvents, SessionStore, SubscriptionId, UserProfile};

use super::liveness::Liveness;
use super::navigator::Navigator;
use super::{SessionVerifier, VerifyError};
use crate::config::RoutePaths;

/// What a guarded route requires of its session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Family/donor routes. An empty `roles` list accepts any member role.
    User { roles: Vec<Role>, require_verified_email: bool },
    Admin,
    Checker,
}

impl GuardPolicy {
    #[must_use]
    pub fn user(roles: &[Role]) -> Self {
        Self::User { roles: roles.to_vec(), require_verified_email: false }
    }

    #[must_use]
    pub fn verified_user(roles: &[Role]) -> Self {
        Self::User { roles: roles.to_vec(), require_verified_email: true }
    }

    #[must_use]
    pub fn namespace(&self) -> Namespace {
        match self {
            Self::User { .. } => Namespace::Auth,
            Self::Admin | Self::Checker => Namespace::Admin,
        }
    }

    #[must_use]
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Checker)
    }

    #[must_use]
    pub fn accepts(&self, role: Role) -> bool {
        match self {
            Self::User { roles, .. } => !role.is_staff() && (roles.is_empty() || roles.contains(&role)),
            Self::Admin => role == Role::Admin,
            Self::Checker => role == Role::Checker,
        }
    }

    fn requires_verified_email(&self) -> bool {
        matches!(self, Self::User { require_verified_email: true, .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Verifying,
    Authenticated,
    Unauthenticated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Denial {
    NoSession,
    Rejected(VerifyError),
    /// Verified, but the reported role is not allowed here.
    RoleMismatch { role: Option<Role> },
    EmailUnverified,
}

/// How a denial is carried out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub clear_session: bool,
    pub redirect: String,
}

/// Decide whether the session in `store` may see a route guarded by `policy`.
///
/// # Errors
///
/// Returns the [`Denial`] that applies; see the module docs for the order.
pub async fn evaluate<V>(policy: &GuardPolicy, store: &SessionStore, verifier: &V) -> Result<UserProfile, Denial>
where
    V: SessionVerifier + ?Sized,
{
    let record = store.get_auth();
    let Some(token) = record.active_token() else {
        return Err(Denial::NoSession);
    };

    let verified =
        if policy.is_staff() { verifier.verify_staff(token).await } else { verifier.verify_member(token).await };
    let profile = verified.map_err(Denial::Rejected)?;

    let role = profile.role();
    if !role.is_some_and(|role| policy.accepts(role)) {
        return Err(Denial::RoleMismatch { role });
    }
    if policy.requires_verified_email() && !profile.is_email_verified() {
        return Err(Denial::EmailUnverified);
    }
    Ok(profile)
}

/// Map a denial onto a session clear and a redirect target.
#[must_use]
pub fn resolve(policy: &GuardPolicy, denial: &Denial, routes: &RoutePaths) -> Resolution {
    let to_login = Resolution { clear_session: policy.is_staff(), redirect: routes.login.clone() };
    match denial {
        Denial::NoSession | Denial::Rejected(_) => to_login,
        Denial::RoleMismatch { role: Some(role) } if Namespace::for_role(*role) == policy.namespace() => {
            Resolution { clear_session: false, redirect: routes.dashboard_for(*role).to_owned() }
        }
        Denial::RoleMismatch { .. } => to_login,
        Denial::EmailUnverified => Resolution { clear_session: false, redirect: routes.verify_email.clone() },
    }
}

/// Run one guard check to completion.
///
/// A rejected session is cleared even if the guard has unmounted; the
/// redirect only happens while `liveness` still reports the guard mounted.
pub async fn run_guard<V, N>(
    policy: &GuardPolicy,
    store: &SessionStore,
    verifier: &V,
    routes: &RoutePaths,
    navigator: &N,
    liveness: &Liveness,
) -> GuardState
where
    V: SessionVerifier + ?Sized,
    N: Navigator + ?Sized,
{
    let denial = match evaluate(policy, store, verifier).await {
        Ok(_) => {
            log::debug!("guard: {} session verified", store.namespace());
            return GuardState::Authenticated;
        }
        Err(denial) => denial,
    };

    match &denial {
        Denial::NoSession => log::debug!("guard: no {} session", store.namespace()),
        Denial::Rejected(VerifyError::Transport(reason)) => {
            log::warn!("guard: verification unreachable, failing closed: {reason}");
        }
        Denial::Rejected(err) => log::info!("guard: {err}"),
        Denial::RoleMismatch { role } => log::info!("guard: role {role:?} not allowed by {policy:?}"),
        Denial::EmailUnverified => log::info!("guard: email not verified"),
    }

    let resolution = resolve(policy, &denial, routes);
    if resolution.clear_session {
        store.clear_auth();
    }
    if liveness.is_alive() {
        log::info!("guard: redirecting to {}", resolution.redirect);
        navigator.replace(&resolution.redirect);
    } else {
        log::debug!("guard: unmounted before verification finished; dropping redirect");
    }
    GuardState::Unauthenticated
}

/// Call `on_sign_out` whenever the guarded namespace signs out.
///
/// Fires only while `liveness` reports the guard mounted. The caller
/// unsubscribes the returned id on unmount.
pub fn watch_sign_out<F>(
    policy: &GuardPolicy,
    events: &SessionEvents,
    liveness: &Liveness,
    on_sign_out: F,
) -> SubscriptionId
where
    F: Fn() + Send + Sync + 'static,
{
    let liveness = liveness.clone();
    events.subscribe(policy.namespace(), move |change| {
        if change.kind != ChangeKind::SignedOut || !liveness.is_alive() {
            return;
        }
        log::info!("guard: {} signed out while mounted", change.namespace);
        on_sign_out();
    })
}
