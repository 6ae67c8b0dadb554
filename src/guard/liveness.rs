//! "Still mounted" flag shared between a component and its async work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cleared in `on_cleanup`; async tasks check it before touching signals or
/// navigating.
#[derive(Clone, Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn mark_unmounted(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}
