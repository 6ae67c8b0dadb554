//! Account switcher listing every signed-in namespace.
//!
//! Subscribes to session events so a sign-in or sign-out anywhere in the
//! app refreshes the list without a reload.

#[cfg(test)]
#[path = "session_menu_test.rs"]
mod session_menu_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::{ActiveSession, Namespace};

use crate::state::SessionContext;

/// Label shown next to a session's display name.
#[must_use]
pub fn session_label(session: &ActiveSession) -> String {
    match session.user_type {
        Some(role) => format!("{} ({role})", session.display_name),
        None => format!("{} ({})", session.display_name, session.namespace),
    }
}

#[component]
pub fn SessionMenu() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let active = RwSignal::new(ctx.sessions.active_sessions());

    let subscription = {
        let registry = ctx.sessions.clone();
        ctx.sessions.events().subscribe_all(move |_| active.set(registry.active_sessions()))
    };
    on_cleanup({
        let events = ctx.sessions.events().clone();
        move || {
            events.unsubscribe(subscription);
        }
    });

    // Navigation runs in an effect; view closures must stay `Send`.
    let signed_out_everywhere = RwSignal::new(false);
    let navigate = use_navigate();
    let login_path = ctx.config.routes.login.clone();
    Effect::new(move || {
        if signed_out_everywhere.get() {
            navigate(&login_path, NavigateOptions { replace: true, ..Default::default() });
        }
    });

    let api = ctx.api.clone();
    view! {
        <Show when=move || !active.get().is_empty()>
            <div class="session-menu">
                <ul class="session-menu__list">
                    <For
                        each=move || active.get()
                        key=|session| session.namespace
                        children={
                            let api = api.clone();
                            move |session: ActiveSession| {
                                let api = api.clone();
                                let namespace: Namespace = session.namespace;
                                view! {
                                    <li class="session-menu__item">
                                        <span>{session_label(&session)}</span>
                                        <button
                                            class="session-menu__sign-out"
                                            on:click=move |_| api.logout(namespace)
                                        >
                                            "Sign out"
                                        </button>
                                    </li>
                                }
                            }
                        }
                    />
                </ul>
                <button
                    class="session-menu__sign-out-all"
                    on:click={
                        let api = api.clone();
                        move |_| {
                            api.logout_everywhere();
                            signed_out_everywhere.set(true);
                        }
                    }
                >
                    "Sign out everywhere"
                </button>
            </div>
        </Show>
    }
}
