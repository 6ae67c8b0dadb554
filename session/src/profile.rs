//! Stored user profile with a minimal required-fields contract.
//!
//! DESIGN
//! ======
//! Backend payloads vary by role and by endpoint (login, registration,
//! profile refresh). Only the fields the session layer reads are typed; the
//! rest are carried in `extra` so a read/write cycle never drops data another
//! page relies on.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::role::{Role, deserialize_lenient_role};

/// Profile object persisted under `{namespace}_user`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_role", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "deserialize_lenient_role", skip_serializing_if = "Option::is_none")]
    pub user_type: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_email_verified: Option<bool>,
    /// Every other field the backend sent, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Profile carrying only a role; handy for staff payloads and tests.
    #[must_use]
    pub fn with_role(role: Role) -> Self {
        Self { role: Some(role), ..Self::default() }
    }

    /// Effective role: `role`, else `userType`.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.or(self.user_type)
    }

    /// `firstName`, else `name`, else `fallback`. Blank strings are skipped.
    #[must_use]
    pub fn display_name(&self, fallback: &str) -> String {
        [self.first_name.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(fallback)
            .to_owned()
    }

    /// A missing flag counts as unverified.
    #[must_use]
    pub fn is_email_verified(&self) -> bool {
        self.is_email_verified.unwrap_or(false)
    }
}
