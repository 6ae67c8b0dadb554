//! Public landing page.

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home-page">
            <h1>"Relief Portal"</h1>
            <p>
                "Families register damage claims, field checkers verify them, "
                "and donors fund approved cases."
            </p>
            <nav class="home-links">
                <a href="/login" class="login-button">"Sign in"</a>
                <a href="/register" class="login-button">"Register"</a>
            </nav>
        </div>
    }
}
