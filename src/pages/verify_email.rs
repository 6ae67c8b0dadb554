//! Notice shown to families whose email address is not verified yet.
//!
//! "Check again" refreshes the stored profile; once the server reports the
//! address verified, the page moves on to the family dashboard.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::Namespace;

use crate::state::SessionContext;

#[component]
pub fn VerifyEmailPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let email = ctx
        .sessions
        .store(Namespace::Auth)
        .get_auth()
        .user
        .and_then(|user| user.email)
        .unwrap_or_else(|| "your email address".to_owned());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let redirect = RwSignal::new(None::<String>);

    let navigate = use_navigate();
    Effect::new(move || {
        if let Some(path) = redirect.get() {
            navigate(&path, NavigateOptions { replace: true, ..Default::default() });
        }
    });

    let on_check = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let api = ctx.api.clone();
        let routes = ctx.config.routes.clone();
        leptos::task::spawn_local(async move {
            match api.refresh_profile().await {
                Ok(profile) if profile.is_email_verified() => redirect.set(Some(routes.family_dashboard.clone())),
                Ok(_) => info.set("Your email is not verified yet.".to_owned()),
                Err(e) if e.status() == Some(401) => redirect.set(Some(routes.login.clone())),
                Err(e) => info.set(e.to_string()),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Verify your email"</h1>
                <p>"We sent a verification link to " <strong>{email}</strong> "."</p>
                <p>"Open it, then come back here."</p>
                <button class="login-button" on:click=on_check disabled=move || busy.get()>
                    "I've verified my email"
                </button>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
