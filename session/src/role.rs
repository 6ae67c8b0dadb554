//! Account roles and the storage namespaces that hold their sessions.
//!
//! DESIGN
//! ======
//! Roles arrive from the backend as free-form strings. They are parsed once
//! into [`Role`] so guard and redirect logic can match exhaustively; anything
//! unrecognised becomes "no role" instead of a typo that silently mismatches.

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Account role reported by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Checker,
    Family,
    Donor,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::Admin, Self::Checker, Self::Family, Self::Donor];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Checker => "checker",
            Self::Family => "family",
            Self::Donor => "donor",
        }
    }

    /// Admin and checker accounts sign in through the staff portal.
    #[must_use]
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Checker)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "checker" => Ok(Self::Checker),
            "family" => Ok(Self::Family),
            "donor" => Ok(Self::Donor),
            _ => Err(UnknownRole(raw.to_owned())),
        }
    }
}

/// Deserialize an optional role, mapping unknown or non-string values to `None`.
pub(crate) fn deserialize_lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(raw)) => raw.parse::<Role>().ok(),
        _ => None,
    })
}

/// Key prefix partitioning the store into independent sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Family and donor accounts.
    Auth,
    /// Admin and checker accounts.
    Admin,
    /// Reserved for checker sessions; login flows store checkers under
    /// [`Namespace::Admin`].
    Checker,
}

impl Namespace {
    /// Every namespace, in enumeration order.
    pub const ALL: [Self; 3] = [Self::Auth, Self::Admin, Self::Checker];

    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Admin => "admin",
            Self::Checker => "checker",
        }
    }

    /// Namespace a login for `role` is written to.
    #[must_use]
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin | Role::Checker => Self::Admin,
            Role::Family | Role::Donor => Self::Auth,
        }
    }

    /// Physical storage key for `field` inside this namespace.
    #[must_use]
    pub fn key(self, field: &str) -> String {
        format!("{}_{field}", self.prefix())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}
