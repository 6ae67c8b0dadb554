use super::*;
use serde_json::json;

// =============================================================
// Deserialization
// =============================================================

#[test]
fn parses_camel_case_fields() {
    let profile: UserProfile = serde_json::from_value(json!({
        "_id": "u-1",
        "role": "family",
        "firstName": "Lina",
        "lastName": "Haddad",
        "email": "lina@example.com",
        "isEmailVerified": true
    }))
    .unwrap();
    assert_eq!(profile.id.as_deref(), Some("u-1"));
    assert_eq!(profile.role, Some(Role::Family));
    assert_eq!(profile.first_name.as_deref(), Some("Lina"));
    assert_eq!(profile.last_name.as_deref(), Some("Haddad"));
    assert!(profile.is_email_verified());
}

#[test]
fn unknown_role_string_becomes_none() {
    let profile: UserProfile = serde_json::from_value(json!({ "role": "superuser", "name": "X" })).unwrap();
    assert_eq!(profile.role, None);
    assert_eq!(profile.name.as_deref(), Some("X"));
}

#[test]
fn non_string_role_becomes_none() {
    let profile: UserProfile = serde_json::from_value(json!({ "role": 7 })).unwrap();
    assert_eq!(profile.role, None);
}

#[test]
fn unknown_fields_survive_a_round_trip() {
    let raw = json!({ "role": "donor", "phone": "+963", "address": { "city": "Aleppo" } });
    let profile: UserProfile = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(profile.extra.get("phone"), Some(&json!("+963")));
    assert_eq!(serde_json::to_value(&profile).unwrap(), raw);
}

// =============================================================
// Derived accessors
// =============================================================

#[test]
fn role_falls_back_to_user_type() {
    let profile = UserProfile { user_type: Some(Role::Checker), ..UserProfile::default() };
    assert_eq!(profile.role(), Some(Role::Checker));
}

#[test]
fn role_prefers_role_over_user_type() {
    let profile = UserProfile { role: Some(Role::Admin), user_type: Some(Role::Checker), ..UserProfile::default() };
    assert_eq!(profile.role(), Some(Role::Admin));
}

#[test]
fn display_name_prefers_first_name_then_name_then_fallback() {
    let mut profile = UserProfile {
        first_name: Some("Omar".to_owned()),
        name: Some("Omar K.".to_owned()),
        ..UserProfile::default()
    };
    assert_eq!(profile.display_name("donor"), "Omar");
    profile.first_name = None;
    assert_eq!(profile.display_name("donor"), "Omar K.");
    profile.name = None;
    assert_eq!(profile.display_name("donor"), "donor");
}

#[test]
fn display_name_skips_blank_values() {
    let profile = UserProfile {
        first_name: Some("  ".to_owned()),
        name: Some("Sara".to_owned()),
        ..UserProfile::default()
    };
    assert_eq!(profile.display_name("family"), "Sara");
}

#[test]
fn missing_verification_flag_counts_as_unverified() {
    assert!(!UserProfile::default().is_email_verified());
}
