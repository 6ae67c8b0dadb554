use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use super::*;
use crate::state::test_helpers::{MockTransport, RecordingNavigator, seed_session, test_client};

async fn run(
    policy: &GuardPolicy,
    transport: MockTransport,
    seed: Option<(Namespace, Role)>,
) -> (GuardState, Vec<String>, crate::net::api::ApiClient<MockTransport>) {
    let api = test_client(transport);
    if let Some((namespace, role)) = seed {
        seed_session(api.sessions(), namespace, "stored-token", role);
    }
    let navigator = RecordingNavigator::default();
    let store = api.sessions().store(policy.namespace());
    let state = run_guard(policy, &store, &api, &RoutePaths::default(), &navigator, &Liveness::new()).await;
    (state, navigator.paths(), api)
}

// =============================================================
// Policy
// =============================================================

#[test]
fn policy_namespaces() {
    assert_eq!(GuardPolicy::Admin.namespace(), Namespace::Admin);
    assert_eq!(GuardPolicy::Checker.namespace(), Namespace::Admin);
    assert_eq!(GuardPolicy::user(&[Role::Family]).namespace(), Namespace::Auth);
}

#[test]
fn policy_accepts() {
    assert!(GuardPolicy::Admin.accepts(Role::Admin));
    assert!(!GuardPolicy::Admin.accepts(Role::Checker));
    assert!(GuardPolicy::Checker.accepts(Role::Checker));
    assert!(GuardPolicy::user(&[]).accepts(Role::Donor));
    assert!(!GuardPolicy::user(&[]).accepts(Role::Admin));
    assert!(!GuardPolicy::user(&[Role::Family]).accepts(Role::Donor));
}

// =============================================================
// Resolution table
// =============================================================

#[test]
fn staff_denials_clear_and_go_to_login() {
    let routes = RoutePaths::default();
    for denial in [
        Denial::NoSession,
        Denial::Rejected(VerifyError::Rejected { status: 401 }),
        Denial::Rejected(VerifyError::Transport("offline".to_owned())),
        Denial::RoleMismatch { role: None },
    ] {
        let resolution = resolve(&GuardPolicy::Admin, &denial, &routes);
        assert_eq!(resolution, Resolution { clear_session: true, redirect: "/login".to_owned() }, "{denial:?}");
    }
}

#[test]
fn staff_role_mismatch_goes_to_other_staff_dashboard() {
    let routes = RoutePaths::default();
    let resolution = resolve(&GuardPolicy::Checker, &Denial::RoleMismatch { role: Some(Role::Admin) }, &routes);
    assert_eq!(resolution, Resolution { clear_session: false, redirect: "/admin/dashboard".to_owned() });
}

#[test]
fn staff_guard_with_member_role_clears() {
    let routes = RoutePaths::default();
    let resolution = resolve(&GuardPolicy::Admin, &Denial::RoleMismatch { role: Some(Role::Family) }, &routes);
    assert!(resolution.clear_session);
    assert_eq!(resolution.redirect, "/login");
}

#[test]
fn user_denials_never_clear() {
    let routes = RoutePaths::default();
    let policy = GuardPolicy::verified_user(&[Role::Family]);
    assert!(!resolve(&policy, &Denial::NoSession, &routes).clear_session);
    assert_eq!(resolve(&policy, &Denial::EmailUnverified, &routes).redirect, "/verify-email");
    assert_eq!(
        resolve(&policy, &Denial::RoleMismatch { role: Some(Role::Donor) }, &routes),
        Resolution { clear_session: false, redirect: "/donor-dashboard".to_owned() }
    );
}

// =============================================================
// Admin / checker guards
// =============================================================

#[tokio::test]
async fn admin_guard_without_session_redirects_without_request() {
    let (state, paths, api) = run(&GuardPolicy::Admin, MockTransport::new(), None).await;
    assert_eq!(state, GuardState::Unauthenticated);
    assert_eq!(paths, vec!["/login"]);
    assert!(api.transport().requests().is_empty());
}

#[tokio::test]
async fn admin_guard_admits_admin() {
    let transport = MockTransport::new().respond(200, json!({ "admin": { "role": "admin" } }));
    let (state, paths, api) = run(&GuardPolicy::Admin, transport, Some((Namespace::Admin, Role::Admin))).await;
    assert_eq!(state, GuardState::Authenticated);
    assert!(paths.is_empty());
    let requests = api.transport().requests();
    assert_eq!(requests[0].url, "/api/admin/auth/verify");
    assert_eq!(requests[0].header("Authorization"), Some("Bearer stored-token"));
}

#[tokio::test]
async fn admin_guard_sends_checker_to_checker_dashboard() {
    let transport = MockTransport::new().respond(200, json!({ "admin": { "role": "checker" } }));
    let (state, paths, api) = run(&GuardPolicy::Admin, transport, Some((Namespace::Admin, Role::Checker))).await;
    assert_eq!(state, GuardState::Unauthenticated);
    assert_eq!(paths, vec!["/checker-dashboard"]);
    assert!(api.sessions().store(Namespace::Admin).has_auth());
}

#[tokio::test]
async fn checker_guard_sends_admin_to_admin_dashboard() {
    let transport = MockTransport::new().respond(200, json!({ "admin": { "role": "admin" } }));
    let (_, paths, _) = run(&GuardPolicy::Checker, transport, Some((Namespace::Admin, Role::Admin))).await;
    assert_eq!(paths, vec!["/admin/dashboard"]);
}

#[tokio::test]
async fn admin_guard_401_clears_and_redirects() {
    let transport = MockTransport::new().respond(401, json!({ "message": "Invalid token" }));
    let (state, paths, api) = run(&GuardPolicy::Admin, transport, Some((Namespace::Admin, Role::Admin))).await;
    assert_eq!(state, GuardState::Unauthenticated);
    assert_eq!(paths, vec!["/login"]);
    assert!(!api.sessions().store(Namespace::Admin).has_auth());
}

#[tokio::test]
async fn admin_guard_fails_closed_on_transport_error() {
    let transport = MockTransport::new().fail("connection refused");
    let (state, paths, api) = run(&GuardPolicy::Admin, transport, Some((Namespace::Admin, Role::Admin))).await;
    assert_eq!(state, GuardState::Unauthenticated);
    assert_eq!(paths, vec!["/login"]);
    assert!(!api.sessions().store(Namespace::Admin).has_auth());
}

#[tokio::test]
async fn admin_guard_fails_closed_on_missing_role() {
    let transport = MockTransport::new().respond(200, json!({ "admin": { "name": "No role" } }));
    let (_, paths, api) = run(&GuardPolicy::Admin, transport, Some((Namespace::Admin, Role::Admin))).await;
    assert_eq!(paths, vec!["/login"]);
    assert!(!api.sessions().store(Namespace::Admin).has_auth());
}

#[tokio::test]
async fn staff_guard_leaves_member_session_alone() {
    let transport = MockTransport::new().respond(401, json!({}));
    let api = test_client(transport);
    seed_session(api.sessions(), Namespace::Admin, "staff", Role::Admin);
    seed_session(api.sessions(), Namespace::Auth, "member", Role::Family);

    let store = api.sessions().store(Namespace::Admin);
    let navigator = RecordingNavigator::default();
    run_guard(&GuardPolicy::Admin, &store, &api, &RoutePaths::default(), &navigator, &Liveness::new()).await;
    assert!(api.sessions().store(Namespace::Auth).has_auth());
}

// =============================================================
// User guard
// =============================================================

#[tokio::test]
async fn user_guard_without_session_redirects_to_login() {
    let (state, paths, api) = run(&GuardPolicy::user(&[Role::Donor]), MockTransport::new(), None).await;
    assert_eq!(state, GuardState::Unauthenticated);
    assert_eq!(paths, vec!["/login"]);
    assert!(api.transport().requests().is_empty());
}

#[tokio::test]
async fn user_guard_admits_verified_family() {
    let transport = MockTransport::new().respond(200, json!({ "user": { "role": "family", "isEmailVerified": true } }));
    let policy = GuardPolicy::verified_user(&[Role::Family]);
    let (state, paths, api) = run(&policy, transport, Some((Namespace::Auth, Role::Family))).await;
    assert_eq!(state, GuardState::Authenticated);
    assert!(paths.is_empty());
    assert_eq!(api.transport().requests()[0].url, "/api/auth/me");
}

#[tokio::test]
async fn user_guard_sends_unverified_family_to_verify_email() {
    let transport = MockTransport::new().respond(200, json!({ "user": { "role": "family", "isEmailVerified": false } }));
    let policy = GuardPolicy::verified_user(&[Role::Family]);
    let (state, paths, api) = run(&policy, transport, Some((Namespace::Auth, Role::Family))).await;
    assert_eq!(state, GuardState::Unauthenticated);
    assert_eq!(paths, vec!["/verify-email"]);
    assert!(api.sessions().store(Namespace::Auth).has_auth());
}

#[tokio::test]
async fn user_guard_without_email_requirement_admits_unverified() {
    let transport = MockTransport::new().respond(200, json!({ "user": { "role": "donor" } }));
    let (state, _, _) = run(&GuardPolicy::user(&[Role::Donor]), transport, Some((Namespace::Auth, Role::Donor))).await;
    assert_eq!(state, GuardState::Authenticated);
}

#[tokio::test]
async fn user_guard_sends_donor_to_donor_dashboard() {
    let transport = MockTransport::new().respond(200, json!({ "user": { "role": "donor" } }));
    let policy = GuardPolicy::verified_user(&[Role::Family]);
    let (_, paths, _) = run(&policy, transport, Some((Namespace::Auth, Role::Donor))).await;
    assert_eq!(paths, vec!["/donor-dashboard"]);
}

#[tokio::test]
async fn user_guard_401_is_cleared_by_api_client() {
    let transport = MockTransport::new().respond(401, json!({}));
    let (state, paths, api) = run(&GuardPolicy::user(&[]), transport, Some((Namespace::Auth, Role::Family))).await;
    assert_eq!(state, GuardState::Unauthenticated);
    assert_eq!(paths, vec!["/login"]);
    assert!(!api.sessions().store(Namespace::Auth).has_auth());
}

#[tokio::test]
async fn user_guard_server_error_keeps_session() {
    let transport = MockTransport::new().respond(503, json!({}));
    let (_, paths, api) = run(&GuardPolicy::user(&[]), transport, Some((Namespace::Auth, Role::Family))).await;
    assert_eq!(paths, vec!["/login"]);
    assert!(api.sessions().store(Namespace::Auth).has_auth());
}

// =============================================================
// Liveness
// =============================================================

#[tokio::test]
async fn unmounted_guard_clears_but_does_not_navigate() {
    let api = test_client(MockTransport::new().respond(401, json!({})));
    seed_session(api.sessions(), Namespace::Admin, "stale", Role::Admin);
    let store = api.sessions().store(Namespace::Admin);
    let navigator = RecordingNavigator::default();
    let liveness = Liveness::new();
    liveness.mark_unmounted();

    let state = run_guard(&GuardPolicy::Admin, &store, &api, &RoutePaths::default(), &navigator, &liveness).await;
    assert_eq!(state, GuardState::Unauthenticated);
    assert!(navigator.paths().is_empty());
    assert!(!store.has_auth());
}

#[test]
fn liveness_clones_share_flag() {
    let liveness = Liveness::new();
    let task_copy = liveness.clone();
    assert!(task_copy.is_alive());
    liveness.mark_unmounted();
    assert!(!task_copy.is_alive());
}

// =============================================================
// Sign-out while mounted
// =============================================================

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_cb = Arc::clone(&hits);
    (hits, move || {
        hits_cb.fetch_add(1, Ordering::SeqCst);
    })
}

#[tokio::test]
async fn sign_out_after_admission_reaches_the_guard() {
    let api = test_client(MockTransport::new().respond(200, json!({ "admin": { "role": "admin" } })));
    seed_session(api.sessions(), Namespace::Admin, "stored-token", Role::Admin);
    let store = api.sessions().store(Namespace::Admin);
    let navigator = RecordingNavigator::default();
    let liveness = Liveness::new();
    let state = run_guard(&GuardPolicy::Admin, &store, &api, &RoutePaths::default(), &navigator, &liveness).await;
    assert_eq!(state, GuardState::Authenticated);

    let (hits, on_sign_out) = counter();
    watch_sign_out(&GuardPolicy::Admin, api.sessions().events(), &liveness, on_sign_out);
    api.logout(Namespace::Admin);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(navigator.paths().is_empty());
}

#[test]
fn checker_guard_watches_the_staff_slot() {
    let api = test_client(MockTransport::new());
    seed_session(api.sessions(), Namespace::Admin, "stored-token", Role::Checker);
    let (hits, on_sign_out) = counter();
    watch_sign_out(&GuardPolicy::Checker, api.sessions().events(), &Liveness::new(), on_sign_out);

    api.logout(Namespace::Auth);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    api.logout(Namespace::Admin);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn sign_in_and_profile_updates_do_not_trip_the_watch() {
    let api = test_client(MockTransport::new());
    let (hits, on_sign_out) = counter();
    watch_sign_out(&GuardPolicy::user(&[]), api.sessions().events(), &Liveness::new(), on_sign_out);

    seed_session(api.sessions(), Namespace::Auth, "stored-token", Role::Family);
    api.sessions().store(Namespace::Auth).set_user(&UserProfile::with_role(Role::Family)).unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn unmounted_or_unsubscribed_guard_ignores_sign_out() {
    let api = test_client(MockTransport::new());
    let events = api.sessions().events();
    let unmounted = Liveness::new();
    unmounted.mark_unmounted();
    let (stale_hits, stale_cb) = counter();
    watch_sign_out(&GuardPolicy::user(&[]), events, &unmounted, stale_cb);
    let (gone_hits, gone_cb) = counter();
    let id = watch_sign_out(&GuardPolicy::user(&[]), events, &Liveness::new(), gone_cb);
    assert!(events.unsubscribe(id));

    seed_session(api.sessions(), Namespace::Auth, "stored-token", Role::Donor);
    api.logout_everywhere();

    assert_eq!(stale_hits.load(Ordering::SeqCst), 0);
    assert_eq!(gone_hits.load(Ordering::SeqCst), 0);
}
