//! Request and response shapes for the auth endpoints.
//!
//! DESIGN
//! ======
//! The backend wraps profiles inconsistently: logins answer
//! `{ token, user }` or `{ token, admin }`, verification answers
//! `{ admin: {...} }`, and some routes nest everything under `data`. The
//! extractors here accept all of those so endpoint functions stay one-liners.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use session::{Role, UserProfile};

/// Keys a profile may be wrapped under, in lookup order.
const PROFILE_KEYS: [&str; 3] = ["user", "admin", "checker"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Self-service registration for family and donor accounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
}

/// Token and profile issued by a login or registration call.
#[derive(Clone, Debug, PartialEq)]
pub struct IssuedSession {
    pub token: String,
    pub profile: UserProfile,
}

/// Pull `{ token, <profile> }` out of a login/registration response.
///
/// # Errors
///
/// Returns a description of what is missing when the body carries no
/// non-empty token or no profile object.
pub fn parse_issued_session(body: &str) -> Result<IssuedSession, String> {
    let root: Value = serde_json::from_str(body).map_err(|e| format!("invalid JSON: {e}"))?;
    let scope = unwrap_data(&root);

    let token = scope
        .get("token")
        .or_else(|| root.get("token"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| "response has no token".to_owned())?
        .to_owned();

    let profile = wrapped_profile(scope)
        .or_else(|| wrapped_profile(&root))
        .ok_or_else(|| "response has no profile".to_owned())?;

    Ok(IssuedSession { token, profile: decode_profile(profile)? })
}

/// Pull a profile out of a verification or profile response.
///
/// Accepts the wrappers listed in the module docs or a bare profile object.
///
/// # Errors
///
/// Returns a description of the problem if the body is not a JSON object.
pub fn parse_profile(body: &str) -> Result<UserProfile, String> {
    let root: Value = serde_json::from_str(body).map_err(|e| format!("invalid JSON: {e}"))?;
    let scope = unwrap_data(&root);
    let profile = wrapped_profile(scope).unwrap_or(scope);
    if !profile.is_object() {
        return Err("profile is not an object".to_owned());
    }
    decode_profile(profile)
}

/// Human-readable error text from a failed response body, if it has one.
#[must_use]
pub fn error_message(body: &str) -> Option<String> {
    let root: Value = serde_json::from_str(body).ok()?;
    let text = match (root.get("message"), root.get("error")) {
        (Some(Value::String(message)), _) => message.clone(),
        (_, Some(Value::String(error))) => error.clone(),
        (_, Some(Value::Object(error))) => error.get("message")?.as_str()?.to_owned(),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

fn unwrap_data(root: &Value) -> &Value {
    match root.get("data") {
        Some(data) if data.is_object() => data,
        _ => root,
    }
}

fn wrapped_profile(scope: &Value) -> Option<&Value> {
    PROFILE_KEYS
        .iter()
        .find_map(|key| scope.get(*key).filter(|v| v.is_object()))
}

fn decode_profile(value: &Value) -> Result<UserProfile, String> {
    UserProfile::deserialize(value).map_err(|e| format!("invalid profile: {e}"))
}
