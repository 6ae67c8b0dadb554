//! Login page for members, admins and checkers.
//!
//! On success the issued session is persisted by the API client and the
//! page replace-navigates to the dashboard for the returned role.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::UserProfile;

use crate::config::RoutePaths;
use crate::net::api::{ApiClient, ApiError};
use crate::net::transport::HttpTransport;
use crate::net::types::Credentials;
use crate::state::SessionContext;

/// Which login endpoint a submission goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginMode {
    Member,
    Admin,
    Checker,
}

impl LoginMode {
    pub const ALL: [Self; 3] = [Self::Member, Self::Admin, Self::Checker];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Member => "Family / Donor",
            Self::Admin => "Admin",
            Self::Checker => "Checker",
        }
    }
}

/// Trim and check the login form.
///
/// # Errors
///
/// Returns the message to show under the form.
pub fn validate_credentials(email: &str, password: &str) -> Result<Credentials, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    Ok(Credentials { email: email.to_owned(), password: password.to_owned() })
}

/// Submit `credentials` to the endpoint for `mode`.
///
/// # Errors
///
/// Propagates the API client's error.
pub async fn sign_in<T: HttpTransport>(
    api: &ApiClient<T>,
    mode: LoginMode,
    credentials: &Credentials,
) -> Result<UserProfile, ApiError> {
    match mode {
        LoginMode::Member => api.login_user(credentials).await,
        LoginMode::Admin => api.login_admin(credentials).await,
        LoginMode::Checker => api.login_checker(credentials).await,
    }
}

/// Where a freshly signed-in profile lands.
#[must_use]
pub fn landing_path(profile: &UserProfile, routes: &RoutePaths) -> String {
    profile.role().map_or_else(|| routes.login.clone(), |role| routes.dashboard_for(role).to_owned())
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let mode = RwSignal::new(LoginMode::Member);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let redirect = RwSignal::new(None::<String>);

    let navigate = use_navigate();
    Effect::new(move || {
        if let Some(path) = redirect.get() {
            navigate(&path, NavigateOptions { replace: true, ..Default::default() });
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let credentials = match validate_credentials(&email.get(), &password.get()) {
            Ok(credentials) => credentials,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        let api = ctx.api.clone();
        let routes = ctx.config.routes.clone();
        let selected = mode.get();
        leptos::task::spawn_local(async move {
            match sign_in(&api, selected, &credentials).await {
                Ok(profile) => redirect.set(Some(landing_path(&profile, &routes))),
                Err(e) => {
                    info.set(e.to_string());
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Relief Portal"</h1>
                <div class="login-modes" role="tablist">
                    {LoginMode::ALL
                        .into_iter()
                        .map(|option| {
                            view! {
                                <button
                                    type="button"
                                    class=move || {
                                        if mode.get() == option { "login-mode login-mode--active" } else { "login-mode" }
                                    }
                                    on:click=move |_| mode.set(option)
                                >
                                    {option.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <Show when=move || mode.get() == LoginMode::Member>
                    <p class="login-card__subtitle">
                        "New here? " <a href="/register">"Create an account"</a>
                    </p>
                </Show>
            </div>
        </div>
    }
}
