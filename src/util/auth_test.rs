use std::cell::Cell;

use super::*;
use crate::net::types::User;
use crate::state::toast::ToastKind;
use crate::util::session_store::MemorySessionStore;

/// Store wrapper counting teardown calls, for re-entrancy assertions.
#[derive(Default)]
struct RecordingStore {
    inner: MemorySessionStore,
    clears: Cell<usize>,
    notices: Cell<usize>,
}

impl SessionStore for RecordingStore {
    fn token(&self) -> Option<String> {
        self.inner.token()
    }

    fn user(&self) -> Option<User> {
        self.inner.user()
    }

    fn set_session(&self, token: &str, user: &User) {
        self.inner.set_session(token, user);
    }

    fn clear_session(&self) {
        self.clears.set(self.clears.get() + 1);
        self.inner.clear_session();
    }

    fn set_login_notice(&self, notice: &LoginNotice) {
        self.notices.set(self.notices.get() + 1);
        self.inner.set_login_notice(notice);
    }

    fn take_login_notice(&self) -> Option<LoginNotice> {
        self.inner.take_login_notice()
    }
}

fn sample_user() -> User {
    User {
        id: "u-100".to_owned(),
        name: "Rosa Lindqvist".to_owned(),
        email: "rosa@example.com".to_owned(),
        phone: None,
        role: "customer".to_owned(),
    }
}

fn seeded_store() -> MemorySessionStore {
    let store = MemorySessionStore::new();
    store.set_session("tok-123", &sample_user());
    store
}

/// Normalize the per-thread guard state before each scenario.
fn reset_guard() {
    acknowledge_navigation();
    drain_navigations();
}

// =============================================================
// Redirect target computation
// =============================================================

#[test]
fn redirect_target_encodes_path_and_query() {
    assert_eq!(
        login_redirect_target(Some("/checkout?step=2")),
        "/login?redirect=%2Fcheckout%3Fstep%3D2"
    );
}

#[test]
fn redirect_target_from_plain_path() {
    assert_eq!(login_redirect_target(Some("/orders")), "/login?redirect=%2Forders");
}

#[test]
fn redirect_target_from_login_is_bare() {
    assert_eq!(login_redirect_target(Some("/login")), "/login");
    assert_eq!(login_redirect_target(Some("/login?redirect=%2Fcart")), "/login");
}

#[test]
fn redirect_target_from_register_is_bare() {
    assert_eq!(login_redirect_target(Some("/register")), "/login");
}

#[test]
fn redirect_target_without_location_is_bare() {
    assert_eq!(login_redirect_target(None), "/login");
    assert_eq!(login_redirect_target(Some("")), "/login");
}

// =============================================================
// Session expiry
// =============================================================

#[test]
fn expiry_clears_token_and_user_together() {
    reset_guard();
    let store = seeded_store();
    expire_session_at(&store, Some("/checkout?step=2".to_owned()));
    assert!(store.token().is_none());
    assert!(store.user().is_none());
    assert_eq!(
        drain_navigations(),
        vec!["/login?redirect=%2Fcheckout%3Fstep%3D2".to_owned()]
    );
    let notice = store.take_login_notice().unwrap();
    assert_eq!(notice.kind, ToastKind::Error);
}

#[test]
fn expiry_from_login_uses_bare_path_and_still_stores_notice() {
    reset_guard();
    let store = seeded_store();
    expire_session_at(&store, Some("/login".to_owned()));
    assert_eq!(drain_navigations(), vec!["/login".to_owned()]);
    assert!(store.take_login_notice().is_some());
}

#[test]
fn expiry_runs_once_per_guard_cycle() {
    reset_guard();
    let store = RecordingStore::default();
    store.set_session("tok-123", &sample_user());
    // Three requests failing in the same turn: one teardown, one redirect.
    expire_session_at(&store, Some("/cart".to_owned()));
    expire_session_at(&store, Some("/cart".to_owned()));
    expire_session_at(&store, Some("/orders".to_owned()));
    assert_eq!(store.clears.get(), 1);
    assert_eq!(store.notices.get(), 1);
    assert_eq!(drain_navigations().len(), 1);
}

#[test]
fn guard_phase_tracks_the_cycle() {
    reset_guard();
    assert_eq!(guard_phase(), GuardPhase::Idle);
    let store = seeded_store();
    expire_session_at(&store, Some("/cart".to_owned()));
    assert_eq!(guard_phase(), GuardPhase::Redirecting);
    acknowledge_navigation();
    assert_eq!(guard_phase(), GuardPhase::Idle);
    drain_navigations();
}

#[test]
fn acknowledgement_rearms_the_guard() {
    reset_guard();
    let store = seeded_store();
    expire_session_at(&store, Some("/cart".to_owned()));
    acknowledge_navigation();
    store.set_session("tok-456", &sample_user());
    expire_session_at(&store, Some("/orders".to_owned()));
    assert_eq!(drain_navigations().len(), 2);
}

#[test]
fn public_entry_outside_browser_falls_back_to_bare_login() {
    reset_guard();
    let store = seeded_store();
    expire_session(&store);
    assert_eq!(drain_navigations(), vec!["/login".to_owned()]);
}

// =============================================================
// Explicit logout
// =============================================================

#[test]
fn logout_clears_state_even_when_server_call_fails() {
    reset_guard();
    let store = seeded_store();
    // Outside the browser the logout POST fails; teardown must proceed.
    futures::executor::block_on(logout(&store));
    assert!(store.token().is_none());
    assert!(store.user().is_none());
    assert_eq!(drain_navigations(), vec!["/login".to_owned()]);
    assert!(store.take_login_notice().is_none());
}

#[test]
fn logout_is_a_noop_while_guard_is_active() {
    reset_guard();
    let store = seeded_store();
    futures::executor::block_on(logout(&store));
    futures::executor::block_on(logout(&store));
    assert_eq!(drain_navigations().len(), 1);
}
