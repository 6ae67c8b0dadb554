//! Route wrappers that render their children only for a verified session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted by `app::App` around each protected page. The decision itself is
//! `guard::run_guard`; these components add the Leptos plumbing: a state
//! signal, a liveness flag flipped in `on_cleanup`, router navigation, and
//! cache prevention for as long as the route is mounted. A sign-out of the
//! guarded namespace after the check hides the children and returns to the
//! login page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::Role;

use crate::guard::{GuardPolicy, GuardState, Liveness, watch_sign_out};
use crate::state::SessionContext;
use crate::util::no_cache::NoCacheGuard;

/// Member route. `roles` empty means any family or donor account.
#[component]
pub fn ProtectedRoute(
    #[prop(optional)] roles: Vec<Role>,
    #[prop(optional)] require_verified_email: bool,
    children: ChildrenFn,
) -> impl IntoView {
    guarded(GuardPolicy::User { roles, require_verified_email }, children)
}

#[component]
pub fn AdminRoute(children: ChildrenFn) -> impl IntoView {
    guarded(GuardPolicy::Admin, children)
}

#[component]
pub fn CheckerRoute(children: ChildrenFn) -> impl IntoView {
    guarded(GuardPolicy::Checker, children)
}

fn guarded(policy: GuardPolicy, children: ChildrenFn) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let state = RwSignal::new(GuardState::Verifying);
    let liveness = Liveness::new();

    let signed_out = RwSignal::new(false);
    let subscription = watch_sign_out(&policy, ctx.sessions.events(), &liveness, move || {
        // Denials during the check already redirect through `run_guard`.
        if state.get_untracked() == GuardState::Authenticated {
            state.set(GuardState::Unauthenticated);
            signed_out.set(true);
        }
    });
    on_cleanup({
        let liveness = liveness.clone();
        let events = ctx.sessions.events().clone();
        move || {
            liveness.mark_unmounted();
            events.unsubscribe(subscription);
        }
    });

    let navigate = use_navigate();
    let login_path = ctx.config.routes.login.clone();
    Effect::new(move || {
        if signed_out.get() {
            navigate(&login_path, NavigateOptions { replace: true, ..Default::default() });
        }
    });
    // Dropped with the owning route, which removes the tags and listener.
    let _no_cache = StoredValue::new_local(NoCacheGuard::install());

    spawn_check(ctx, policy, state, liveness);

    view! {
        <Show
            when=move || state.get() == GuardState::Authenticated
            fallback=move || {
                view! {
                    <Show when=move || state.get() == GuardState::Verifying>
                        <div class="guard-loading" role="status">
                            "Checking your session..."
                        </div>
                    </Show>
                }
            }
        >
            {children()}
        </Show>
    }
}

#[cfg(feature = "hydrate")]
fn spawn_check(ctx: SessionContext, policy: GuardPolicy, state: RwSignal<GuardState>, liveness: Liveness) {
    use crate::guard::{RouterNavigator, run_guard};

    let navigator = RouterNavigator(use_navigate());
    leptos::task::spawn_local(async move {
        let store = ctx.sessions.store(policy.namespace());
        let outcome = run_guard(&policy, &store, &ctx.api, &ctx.config.routes, &navigator, &liveness).await;
        if liveness.is_alive() {
            state.set(outcome);
        }
    });
}

#[cfg(not(feature = "hydrate"))]
fn spawn_check(ctx: SessionContext, policy: GuardPolicy, state: RwSignal<GuardState>, liveness: Liveness) {
    let _ = (ctx, policy, state, liveness);
}
