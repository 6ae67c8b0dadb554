//! Authenticated REST client for the relief backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every request goes through `ApiClient::execute`, which picks the bearer
//! token for the endpoint's [`AuthScope`] from the session namespaces and
//! maps the HTTP outcome onto [`ApiError`]. Login and registration calls
//! persist the issued session; profile calls keep the stored user current.
//!
//! ERROR HANDLING
//! ==============
//! A 401 on a `User`-scoped call clears the `auth` namespace before the error
//! is returned, so a stale member token is never retried. Staff 401s and any
//! 403 leave storage alone; the staff guards own that decision.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use serde::Serialize;
use session::{Namespace, Role, SessionError, SessionRegistry, UserProfile};

use super::transport::{HttpRequest, HttpTransport, Method, TransportError};
use super::types::{Credentials, IssuedSession, RegisterRequest, error_message, parse_issued_session, parse_profile};
use crate::config::ClientConfig;
use crate::guard::{SessionVerifier, VerifyError};

pub const USER_LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const CURRENT_USER_PATH: &str = "/api/auth/me";
pub const PROFILE_PATH: &str = "/api/auth/profile";
pub const ADMIN_LOGIN_PATH: &str = "/api/admin/auth/login";
pub const CHECKER_LOGIN_PATH: &str = "/api/admin/auth/checker/login";
pub const STAFF_VERIFY_PATH: &str = "/api/admin/auth/verify";

/// Which namespace supplies the bearer token for a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthScope {
    /// No `Authorization` header.
    Public,
    /// Token from the `auth` namespace.
    User,
    /// Token from the `admin` namespace.
    Staff,
}

impl AuthScope {
    #[must_use]
    pub fn namespace(self) -> Option<Namespace> {
        match self {
            Self::Public => None,
            Self::User => Some(Namespace::Auth),
            Self::Staff => Some(Namespace::Admin),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("network error: {0}")]
    Transport(#[from] TransportError),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("could not save session: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// HTTP status behind this error, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::Session(_) => None,
        }
    }

    /// Map a non-2xx response onto an error, preferring the server's message.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body);
        match status {
            401 => Self::Unauthorized(message.unwrap_or_else(|| "Session expired. Please log in again.".to_owned())),
            403 => Self::Forbidden(
                message.unwrap_or_else(|| "You do not have permission to perform this action.".to_owned()),
            ),
            404 => Self::NotFound(message.unwrap_or_else(|| "Resource not found.".to_owned())),
            _ => Self::Status { status, message: message.unwrap_or_else(|| "Request failed".to_owned()) },
        }
    }
}

impl From<ApiError> for VerifyError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(e) => Self::Transport(e.0),
            ApiError::Decode(reason) => Self::Malformed(reason),
            ApiError::Session(e) => Self::Malformed(e.to_string()),
            other => Self::Rejected { status: other.status().unwrap_or_default() },
        }
    }
}

/// REST client bound to one transport and one set of session namespaces.
#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    config: ClientConfig,
    transport: T,
    sessions: SessionRegistry,
}

impl<T: HttpTransport> ApiClient<T> {
    #[must_use]
    pub fn new(config: ClientConfig, transport: T, sessions: SessionRegistry) -> Self {
        Self { config, transport, sessions }
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sign a family or donor in and persist the session under `auth`.
    ///
    /// # Errors
    ///
    /// Returns the mapped HTTP error, [`ApiError::Decode`] when the response
    /// lacks a token, profile or member role, or [`ApiError::Session`] if the
    /// session could not be stored.
    pub async fn login_user(&self, credentials: &Credentials) -> Result<UserProfile, ApiError> {
        let issued = self.issue(USER_LOGIN_PATH, credentials).await?;
        self.persist_member(issued)
    }

    /// Register a family or donor account and sign it in.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::login_user`].
    pub async fn register_user(&self, request: &RegisterRequest) -> Result<UserProfile, ApiError> {
        let issued = self.issue(REGISTER_PATH, request).await?;
        self.persist_member(issued)
    }

    /// Sign an admin in and persist the session under `admin`.
    ///
    /// # Errors
    ///
    /// Returns the mapped HTTP error, [`ApiError::Decode`] when the response
    /// is incomplete or names a non-staff role, or [`ApiError::Session`].
    pub async fn login_admin(&self, credentials: &Credentials) -> Result<UserProfile, ApiError> {
        let issued = self.issue(ADMIN_LOGIN_PATH, credentials).await?;
        self.persist_staff(issued, Role::Admin)
    }

    /// Sign a checker in. Checker sessions share the `admin` namespace.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::login_admin`].
    pub async fn login_checker(&self, credentials: &Credentials) -> Result<UserProfile, ApiError> {
        let issued = self.issue(CHECKER_LOGIN_PATH, credentials).await?;
        self.persist_staff(issued, Role::Checker)
    }

    /// Profile of the signed-in member, without touching storage.
    ///
    /// # Errors
    ///
    /// Returns the mapped HTTP error; a 401 has already cleared `auth`.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.fetch_profile(Method::Get, CURRENT_USER_PATH, AuthScope::User, None, None).await
    }

    /// Re-fetch the member profile and store it under `auth`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::current_user`], plus [`ApiError::Session`].
    pub async fn refresh_profile(&self) -> Result<UserProfile, ApiError> {
        let profile = self.current_user().await?;
        self.sessions.store(Namespace::Auth).set_user(&profile)?;
        Ok(profile)
    }

    /// Send profile `changes` and store the updated profile under `auth`.
    ///
    /// # Errors
    ///
    /// Returns the mapped HTTP error, [`ApiError::Decode`] if `changes`
    /// cannot be serialized, or [`ApiError::Session`].
    pub async fn update_profile<B: Serialize + ?Sized>(&self, changes: &B) -> Result<UserProfile, ApiError> {
        let body = encode(changes)?;
        let profile = self.fetch_profile(Method::Put, PROFILE_PATH, AuthScope::User, None, Some(body)).await?;
        self.sessions.store(Namespace::Auth).set_user(&profile)?;
        Ok(profile)
    }

    /// Check an explicit staff `token` against the verification endpoint.
    ///
    /// # Errors
    ///
    /// Returns the mapped HTTP error. Storage is never modified here.
    pub async fn verify_staff_token(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.fetch_profile(Method::Get, STAFF_VERIFY_PATH, AuthScope::Staff, Some(token), None).await
    }

    /// Sign out of one namespace locally.
    pub fn logout(&self, namespace: Namespace) {
        log::info!("api: logout namespace={namespace}");
        self.sessions.store(namespace).clear_auth();
    }

    /// Sign out of every namespace locally.
    pub fn logout_everywhere(&self) {
        log::info!("api: logout everywhere");
        self.sessions.clear_all_sessions();
    }

    async fn issue<B: Serialize + ?Sized>(&self, path: &str, payload: &B) -> Result<IssuedSession, ApiError> {
        let body = encode(payload)?;
        let text = self.execute(Method::Post, path, AuthScope::Public, None, Some(body)).await?;
        parse_issued_session(&text).map_err(ApiError::Decode)
    }

    async fn fetch_profile(
        &self,
        method: Method,
        path: &str,
        scope: AuthScope,
        token: Option<&str>,
        body: Option<String>,
    ) -> Result<UserProfile, ApiError> {
        let text = self.execute(method, path, scope, token, body).await?;
        parse_profile(&text).map_err(ApiError::Decode)
    }

    fn persist_member(&self, issued: IssuedSession) -> Result<UserProfile, ApiError> {
        let role = issued
            .profile
            .role()
            .filter(|role| !role.is_staff())
            .ok_or_else(|| ApiError::Decode("response has no family or donor role".to_owned()))?;
        self.sessions.store(Namespace::Auth).set_auth(&issued.token, &issued.profile, role)?;
        log::info!("api: signed in role={role}");
        Ok(issued.profile)
    }

    fn persist_staff(&self, issued: IssuedSession, default_role: Role) -> Result<UserProfile, ApiError> {
        let role = issued.profile.role().unwrap_or(default_role);
        if !role.is_staff() {
            return Err(ApiError::Decode(format!("{role} is not a staff role")));
        }
        let profile = match issued.profile.role() {
            Some(_) => issued.profile,
            None => UserProfile { role: Some(role), ..issued.profile },
        };
        self.sessions.store(Namespace::for_role(role)).set_auth(&issued.token, &profile, role)?;
        log::info!("api: signed in role={role}");
        Ok(profile)
    }

    /// Send one request and return the body of a 2xx response.
    ///
    /// `token` overrides the scope's stored token; it is used for verifying
    /// a token before trusting it.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        scope: AuthScope,
        token: Option<&str>,
        body: Option<String>,
    ) -> Result<String, ApiError> {
        let stored;
        let bearer = match (token, scope.namespace()) {
            (Some(token), _) => Some(token),
            (None, Some(namespace)) => {
                stored = self.sessions.store(namespace).get_auth();
                stored.active_token()
            }
            (None, None) => None,
        };

        let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];
        if body.is_some() {
            headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
        }
        if let Some(bearer) = bearer {
            headers.push(("Authorization".to_owned(), format!("Bearer {bearer}")));
        }
        let request = HttpRequest { method, url: self.config.api_url(path), headers, body };

        log::debug!("api: {} {path}", method.as_str());
        let response = self.transport.send(request).await.map_err(|e| {
            log::warn!("api: {} {path} failed: {e}", method.as_str());
            ApiError::Transport(e)
        })?;
        if response.is_success() {
            return Ok(response.body);
        }

        let err = ApiError::from_status(response.status, &response.body);
        if response.status == 401 && scope == AuthScope::User {
            log::info!("api: {path} answered 401; clearing member session");
            self.sessions.store(Namespace::Auth).clear_auth();
        }
        Err(err)
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> SessionVerifier for ApiClient<T> {
    async fn verify_member(&self, token: &str) -> Result<UserProfile, VerifyError> {
        self.fetch_profile(Method::Get, CURRENT_USER_PATH, AuthScope::User, Some(token), None)
            .await
            .map_err(VerifyError::from)
    }

    async fn verify_staff(&self, token: &str) -> Result<UserProfile, VerifyError> {
        self.verify_staff_token(token).await.map_err(VerifyError::from)
    }
}

fn encode<B: Serialize + ?Sized>(payload: &B) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| ApiError::Decode(format!("could not encode request: {e}")))
}
