//! Minimal per-role dashboards mounted behind the route guards.

use leptos::prelude::*;
use session::{Namespace, Role};

use crate::components::session_menu::SessionMenu;
use crate::state::SessionContext;

/// Greeting for the signed-in user of `namespace`.
#[component]
pub fn DashboardPage(title: &'static str, namespace: Namespace) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let greeting = {
        let record = ctx.sessions.store(namespace).get_auth();
        let fallback = record.user_type.map_or("there", Role::as_str);
        record.user.map_or_else(|| fallback.to_owned(), |user| user.display_name(fallback))
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <h1>{title}</h1>
                <SessionMenu/>
            </header>
            <p class="dashboard-greeting">"Welcome, " {greeting}</p>
        </div>
    }
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    view! { <DashboardPage title="Admin dashboard" namespace=Namespace::Admin/> }
}

#[component]
pub fn CheckerDashboard() -> impl IntoView {
    view! { <DashboardPage title="Checker dashboard" namespace=Namespace::Admin/> }
}

#[component]
pub fn FamilyDashboard() -> impl IntoView {
    view! { <DashboardPage title="Family dashboard" namespace=Namespace::Auth/> }
}

#[component]
pub fn DonorDashboard() -> impl IntoView {
    view! { <DashboardPage title="Donor dashboard" namespace=Namespace::Auth/> }
}
