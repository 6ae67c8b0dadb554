//! Build-time client configuration.
//!
//! Values are baked in with `option_env!` because the bundle runs in the
//! browser with no process environment:
//! - `RELIEF_API_BASE_URL`: API origin; empty (default) means same origin
//! - `RELIEF_LOGIN_PATH`: default `/login`
//! - `RELIEF_VERIFY_EMAIL_PATH`: default `/verify-email`

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use session::Role;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_VERIFY_EMAIL_PATH: &str = "/verify-email";

/// Client-side route targets used by guards and login flows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutePaths {
    pub login: String,
    pub verify_email: String,
    pub admin_dashboard: String,
    pub checker_dashboard: String,
    pub family_dashboard: String,
    pub donor_dashboard: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN_PATH.to_owned(),
            verify_email: DEFAULT_VERIFY_EMAIL_PATH.to_owned(),
            admin_dashboard: "/admin/dashboard".to_owned(),
            checker_dashboard: "/checker-dashboard".to_owned(),
            family_dashboard: "/family-dashboard".to_owned(),
            donor_dashboard: "/donor-dashboard".to_owned(),
        }
    }
}

impl RoutePaths {
    /// Landing page for a signed-in `role`.
    #[must_use]
    pub fn dashboard_for(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.admin_dashboard,
            Role::Checker => &self.checker_dashboard,
            Role::Family => &self.family_dashboard,
            Role::Donor => &self.donor_dashboard,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// API origin without a trailing slash; empty for same-origin requests.
    pub api_base_url: String,
    pub routes: RoutePaths,
}

impl ClientConfig {
    /// Configuration baked into this build.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("RELIEF_API_BASE_URL"),
            option_env!("RELIEF_LOGIN_PATH"),
            option_env!("RELIEF_VERIFY_EMAIL_PATH"),
        )
    }

    fn from_values(api_base_url: Option<&str>, login: Option<&str>, verify_email: Option<&str>) -> Self {
        let routes = RoutePaths {
            login: normalize_path(login, DEFAULT_LOGIN_PATH),
            verify_email: normalize_path(verify_email, DEFAULT_VERIFY_EMAIL_PATH),
            ..RoutePaths::default()
        };
        Self { api_base_url: normalize_base_url(api_base_url.unwrap_or_default()), routes }
    }

    /// Absolute (or same-origin) URL for an API `path` starting with `/`.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn normalize_path(raw: Option<&str>, default: &str) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default.to_owned();
    };
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_owned();
    }
    if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") }
}
