//! Root application component with routing and the session context.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use session::Role;

use crate::components::redirect_guard::RedirectIfPrivileged;
use crate::components::route_guard::{AdminRoute, CheckerRoute, ProtectedRoute};
use crate::pages::{
    dashboard::{AdminDashboard, CheckerDashboard, DonorDashboard, FamilyDashboard},
    home::HomePage,
    login::LoginPage,
    register::RegisterPage,
    verify_email::VerifyEmailPage,
};
use crate::state::SessionContext;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session context and maps every route to its guard.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(SessionContext::for_browser());

    view! {
        <Title text="Relief Portal"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route
                    path=StaticSegment("")
                    view=|| view! { <RedirectIfPrivileged><HomePage/></RedirectIfPrivileged> }
                />
                <Route
                    path=StaticSegment("login")
                    view=|| view! { <RedirectIfPrivileged><LoginPage/></RedirectIfPrivileged> }
                />
                <Route
                    path=StaticSegment("register")
                    view=|| view! { <RedirectIfPrivileged><RegisterPage/></RedirectIfPrivileged> }
                />
                <Route
                    path=(StaticSegment("admin"), StaticSegment("dashboard"))
                    view=|| view! { <AdminRoute><AdminDashboard/></AdminRoute> }
                />
                <Route
                    path=StaticSegment("checker-dashboard")
                    view=|| view! { <CheckerRoute><CheckerDashboard/></CheckerRoute> }
                />
                <Route
                    path=StaticSegment("family-dashboard")
                    view=|| {
                        view! {
                            <ProtectedRoute roles=vec![Role::Family] require_verified_email=true>
                                <FamilyDashboard/>
                            </ProtectedRoute>
                        }
                    }
                />
                <Route
                    path=StaticSegment("donor-dashboard")
                    view=|| view! { <ProtectedRoute roles=vec![Role::Donor]><DonorDashboard/></ProtectedRoute> }
                />
                <Route path=StaticSegment("verify-email") view=VerifyEmailPage/>
            </Routes>
        </Router>
    }
}
