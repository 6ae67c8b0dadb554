//! Public-page wrapper that forwards signed-in staff to their dashboard.

use leptos::prelude::*;

/// Renders `children` immediately; a verified `admin` session triggers a
/// replace-navigation once verification completes.
#[component]
pub fn RedirectIfPrivileged(children: Children) -> impl IntoView {
    #[cfg(feature = "hydrate")]
    {
        use crate::guard::{Liveness, RouterNavigator, run_redirect_guard};
        use crate::state::SessionContext;
        use session::Namespace;

        let ctx = expect_context::<SessionContext>();
        let navigator = RouterNavigator(leptos_router::hooks::use_navigate());
        let liveness = Liveness::new();
        on_cleanup({
            let liveness = liveness.clone();
            move || liveness.mark_unmounted()
        });
        leptos::task::spawn_local(async move {
            let store = ctx.sessions.store(Namespace::Admin);
            run_redirect_guard(&store, &ctx.api, &ctx.config.routes, &navigator, &liveness).await;
        });
    }

    children()
}
