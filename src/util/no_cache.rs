//! Keep protected pages out of the back/forward cache while mounted.
//!
//! Installs `http-equiv` meta tags that forbid caching and pins the history
//! stack: the current URL is pushed once and re-pushed on every `popstate`,
//! so Back cannot land on a page rendered for a session that has since
//! ended. Dropping the guard removes the tags and the listener.

#[cfg(test)]
#[path = "no_cache_test.rs"]
mod no_cache_test;

/// `(http-equiv, content)` pairs injected into `<head>`.
pub const NO_CACHE_META: [(&str, &str); 3] = [
    ("Cache-Control", "no-cache, no-store, must-revalidate"),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
];

#[cfg(feature = "hydrate")]
type PopstateHandler = wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>;

/// Active cache prevention. Not `Send`; hold it in local reactive storage.
#[derive(Default)]
pub struct NoCacheGuard {
    #[cfg(feature = "hydrate")]
    metas: Vec<web_sys::Element>,
    #[cfg(feature = "hydrate")]
    popstate: Option<PopstateHandler>,
}

impl NoCacheGuard {
    /// Inject the meta tags and lock history. Best effort: any missing
    /// browser facility is skipped.
    #[must_use]
    pub fn install() -> Self {
        #[cfg(feature = "hydrate")]
        {
            let Some(window) = web_sys::window() else {
                return Self::default();
            };
            Self { metas: insert_meta_tags(&window), popstate: lock_history(&window) }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Self::default()
        }
    }

    /// Number of meta tags currently injected.
    #[must_use]
    pub fn meta_count(&self) -> usize {
        #[cfg(feature = "hydrate")]
        {
            self.metas.len()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            0
        }
    }
}

impl Drop for NoCacheGuard {
    fn drop(&mut self) {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;

            for meta in self.metas.drain(..) {
                meta.remove();
            }
            if let (Some(handler), Some(window)) = (self.popstate.take(), web_sys::window()) {
                let _ = window.remove_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref());
            }
        }
    }
}

#[cfg(feature = "hydrate")]
fn insert_meta_tags(window: &web_sys::Window) -> Vec<web_sys::Element> {
    let Some((document, head)) = window.document().and_then(|d| d.head().map(|h| (d, h))) else {
        return Vec::new();
    };
    NO_CACHE_META
        .iter()
        .filter_map(|(equiv, content)| {
            let meta = document.create_element("meta").ok()?;
            meta.set_attribute("http-equiv", equiv).ok()?;
            meta.set_attribute("content", content).ok()?;
            head.append_child(&meta).ok()?;
            Some(meta)
        })
        .collect()
}

#[cfg(feature = "hydrate")]
fn push_current_url(window: &web_sys::Window) {
    if let (Ok(history), Ok(href)) = (window.history(), window.location().href()) {
        let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(href.as_str()));
    }
}

#[cfg(feature = "hydrate")]
fn lock_history(window: &web_sys::Window) -> Option<PopstateHandler> {
    use wasm_bindgen::JsCast;

    push_current_url(window);
    let handler = PopstateHandler::new(move |_: web_sys::Event| {
        if let Some(window) = web_sys::window() {
            push_current_url(&window);
        }
    });
    window
        .add_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref())
        .ok()?;
    Some(handler)
}
