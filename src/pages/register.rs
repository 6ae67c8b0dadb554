//! Self-service registration for family and donor accounts.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::Role;

use crate::net::types::RegisterRequest;
use crate::state::SessionContext;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Raw form values, as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
}

/// Trim and check the registration form.
///
/// # Errors
///
/// Returns the message to show under the form.
pub fn validate_registration(form: &RegisterForm) -> Result<RegisterRequest, &'static str> {
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    let email = form.email.trim();
    if first_name.is_empty() || last_name.is_empty() || email.is_empty() {
        return Err("Fill in your name and email.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters.");
    }
    if form.password != form.confirm_password {
        return Err("Passwords do not match.");
    }
    let role = match form.role {
        Some(role @ (Role::Family | Role::Donor)) => role,
        _ => return Err("Choose whether you are registering as a family or a donor."),
    };
    let phone = form.phone.trim();
    Ok(RegisterRequest {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email.to_owned(),
        password: form.password.clone(),
        phone: (!phone.is_empty()).then(|| phone.to_owned()),
        role,
    })
}

fn form_input(
    form: RwSignal<RegisterForm>,
    placeholder: &'static str,
    kind: &'static str,
    get: fn(&RegisterForm) -> &String,
    set: fn(&mut RegisterForm, String),
) -> impl IntoView {
    view! {
        <input
            class="login-input"
            type=kind
            placeholder=placeholder
            prop:value=move || form.with(|f| get(f).clone())
            on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
        />
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let form = RwSignal::new(RegisterForm::default());
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
        let request = match validate_registration(&form.get()) {
            Ok(request) => request,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating your account...".to_owned());

        let api = ctx.api.clone();
        let routes = ctx.config.routes.clone();
        leptos::task::spawn_local(async move {
            match api.register_user(&request).await {
                Ok(profile) => {
                    let target = match profile.role() {
                        Some(Role::Family) if !profile.is_email_verified() => routes.verify_email.clone(),
                        Some(role) => routes.dashboard_for(role).to_owned(),
                        None => routes.login.clone(),
                    };
                    redirect.set(Some(target));
                }
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
                <h1>"Create an account"</h1>
                <form class="login-form" on:submit=on_submit>
                    {form_input(form, "First name", "text", |f| &f.first_name, |f, v| f.first_name = v)}
                    {form_input(form, "Last name", "text", |f| &f.last_name, |f, v| f.last_name = v)}
                    {form_input(form, "you@example.com", "email", |f| &f.email, |f, v| f.email = v)}
                    {form_input(form, "Phone (optional)", "tel", |f| &f.phone, |f, v| f.phone = v)}
                    {form_input(form, "Password", "password", |f| &f.password, |f, v| f.password = v)}
                    {form_input(form, "Confirm password", "password", |f| &f.confirm_password, |f, v| f.confirm_password = v)}
                    <select
                        class="login-input"
                        on:change=move |ev| {
                            let role = event_target_value(&ev).parse::<Role>().ok();
                            form.update(|f| f.role = role);
                        }
                    >
                        <option value="">"I am registering as..."</option>
                        <option value="family">"A family in need"</option>
                        <option value="donor">"A donor"</option>
                    </select>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__subtitle">
                    "Already registered? " <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
