//! Navigation seam for guards.

use leptos_router::NavigateOptions;

/// Client-side navigation that replaces the current history entry.
pub trait Navigator {
    fn replace(&self, path: &str);
}

/// Adapts the closure returned by `leptos_router::hooks::use_navigate`.
#[derive(Clone)]
pub struct RouterNavigator<F>(pub F);

impl<F> Navigator for RouterNavigator<F>
where
    F: Fn(&str, NavigateOptions),
{
    fn replace(&self, path: &str) {
        (self.0)(path, NavigateOptions { replace: true, ..Default::default() });
    }
}
