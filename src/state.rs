//! Shared session context provided at the application root.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` provides one [`SessionContext`]; guards, pages and the session menu
//! read it with `expect_context`. Every handle inside is `Arc`-backed, so
//! clones are cheap and all of them observe the same storage and events.

use std::sync::Arc;

use session::{SessionRegistry, Storage};

use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::net::transport::GlooTransport;
use crate::util::local_storage::LocalStorage;

#[derive(Clone, Debug)]
pub struct SessionContext {
    pub config: ClientConfig,
    pub sessions: SessionRegistry,
    pub api: ApiClient<GlooTransport>,
}

impl SessionContext {
    #[must_use]
    pub fn new(config: ClientConfig, storage: Arc<dyn Storage>) -> Self {
        let sessions = SessionRegistry::new(storage);
        let api = ApiClient::new(config.clone(), GlooTransport, sessions.clone());
        Self { config, sessions, api }
    }

    /// Build-time configuration over `window.localStorage`.
    #[must_use]
    pub fn for_browser() -> Self {
        Self::new(ClientConfig::from_build_env(), Arc::new(LocalStorage))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use session::{MemoryStorage, Namespace, Role, SessionRegistry, UserProfile};

    use crate::config::ClientConfig;
    use crate::guard::Navigator;
    use crate::net::api::ApiClient;
    use crate::net::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

    /// Transport answering from a script and recording every request.
    #[derive(Default)]
    pub struct MockTransport {
        responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl MockTransport {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response with `status` and a JSON `body`.
        #[must_use]
        pub fn respond(self, status: u16, body: serde_json::Value) -> Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse { status, body: body.to_string() }));
            self
        }

        /// Queue a response with a raw text body.
        #[must_use]
        pub fn respond_raw(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse { status, body: body.to_owned() }));
            self
        }

        /// Queue a transport failure.
        #[must_use]
        pub fn fail(self, reason: &str) -> Self {
            self.responses.borrow_mut().push_back(Err(TransportError(reason.to_owned())));
            self
        }

        #[must_use]
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no scripted response".to_owned())))
        }
    }

    /// Navigator recording every replacement.
    #[derive(Default)]
    pub struct RecordingNavigator {
        paths: RefCell<Vec<String>>,
    }

    impl RecordingNavigator {
        #[must_use]
        pub fn paths(&self) -> Vec<String> {
            self.paths.borrow().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn replace(&self, path: &str) {
            self.paths.borrow_mut().push(path.to_owned());
        }
    }

    #[must_use]
    pub fn test_registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(MemoryStorage::new()))
    }

    /// Client over `transport` with same-origin config and fresh storage.
    #[must_use]
    pub fn test_client(transport: MockTransport) -> ApiClient<MockTransport> {
        ApiClient::new(ClientConfig::default(), transport, test_registry())
    }

    /// Store an active session for `role` in its namespace.
    pub fn seed_session(registry: &SessionRegistry, namespace: Namespace, token: &str, role: Role) {
        registry
            .store(namespace)
            .set_auth(token, &UserProfile::with_role(role), role)
            .expect("seeding memory storage should not fail");
    }
}
