//! Session guard: idempotent teardown of an expired session and redirect
//! to the login view.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dispatcher calls [`expire_session`] whenever the server answers 401
//! or 403. A phase slot makes the teardown run at most once no matter how
//! many in-flight requests fail in the same task-queue turn; the slot is
//! released either by the login view acknowledging the navigation or by a
//! 1000 ms fallback timer, whichever comes first.
//!
//! TRADE-OFFS
//! ==========
//! The timer is a heuristic, not a navigation-completion hook: if the
//! redirect stalls (blocked pop-up, user cancel) the guard re-arms after
//! the delay rather than staying wedged.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::Cell;
#[cfg(test)]
use std::cell::RefCell;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::net::api;
use crate::util::session_store::{LoginNotice, SessionStore};

/// Path of the login view.
pub const LOGIN_PATH: &str = "/login";
/// Path of the registration view.
pub const REGISTER_PATH: &str = "/register";
/// Query parameter carrying the pre-redirect location.
pub const REDIRECT_PARAM: &str = "redirect";

/// How long the guard stays armed after redirecting before it resets on
/// its own.
#[cfg(feature = "hydrate")]
const RESET_DELAY_MS: u32 = 1_000;

/// Matches `encodeURIComponent`: everything except ASCII alphanumerics and
/// `- _ . ! ~ * ' ( )` is percent-encoded.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Where the guard is in its teardown cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardPhase {
    /// No teardown in progress.
    #[default]
    Idle,
    /// Local session state is being cleared.
    Clearing,
    /// Navigation to the login view has been issued.
    Redirecting,
}

thread_local! {
    static PHASE: Cell<GuardPhase> = const { Cell::new(GuardPhase::Idle) };
}

/// Current phase of the guard. Read-only; the guard's entry points own all
/// transitions.
pub fn guard_phase() -> GuardPhase {
    PHASE.with(Cell::get)
}

/// Claim the guard if it is idle. The single-threaded event loop
/// serializes this check-and-set.
fn try_begin() -> bool {
    PHASE.with(|phase| {
        if phase.get() == GuardPhase::Idle {
            phase.set(GuardPhase::Clearing);
            true
        } else {
            false
        }
    })
}

/// Tear down the local session and bounce to the login view.
///
/// No-op while a previous cycle is still in flight, so several requests
/// failing in the same turn produce a single teardown and a single
/// navigation. The stored token and user are always cleared together, a
/// session-expired notice is left for the login view, and the pre-redirect
/// location rides along as the `redirect` query parameter, unless the
/// visitor was already on the login or registration view, in which case
/// the target is the bare login path.
pub fn expire_session(store: &dyn SessionStore) {
    expire_session_at(store, current_location());
}

fn expire_session_at(store: &dyn SessionStore, current: Option<String>) {
    if !try_begin() {
        return;
    }
    #[cfg(feature = "hydrate")]
    log::warn!("session expired; redirecting to login");
    store.clear_session();
    store.set_login_notice(&LoginNotice::session_expired());
    let target = login_redirect_target(current.as_deref());
    PHASE.with(|phase| phase.set(GuardPhase::Redirecting));
    navigate_to(&target);
    schedule_reset();
}

/// Explicitly log out: invalidate the server-side session (best effort),
/// then clear local state and return to the bare login path.
///
/// The guard phase is claimed before the server call, so an auth failure
/// from the logout endpoint itself cannot start a competing
/// expired-session redirect. The server call failing changes nothing
/// locally.
pub async fn logout(store: &dyn SessionStore) {
    if !try_begin() {
        return;
    }
    api::logout_server(store).await;
    store.clear_session();
    PHASE.with(|phase| phase.set(GuardPhase::Redirecting));
    navigate_to(LOGIN_PATH);
    schedule_reset();
}

/// One-shot completion signal from the login view: the navigation finished
/// and the notice was consumed, so the guard can re-arm immediately
/// instead of waiting out the fallback timer.
pub fn acknowledge_navigation() {
    PHASE.with(|phase| phase.set(GuardPhase::Idle));
}

/// Compute the login redirect target for the location `current`
/// (path + query).
fn login_redirect_target(current: Option<&str>) -> String {
    match current {
        Some(location)
            if !location.is_empty()
                && !location.starts_with(LOGIN_PATH)
                && !location.starts_with(REGISTER_PATH) =>
        {
            let encoded = utf8_percent_encode(location, URI_COMPONENT);
            format!("{LOGIN_PATH}?{REDIRECT_PARAM}={encoded}")
        }
        _ => LOGIN_PATH.to_owned(),
    }
}

/// Current path + query string, browser only.
fn current_location() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        let location = web_sys::window()?.location();
        let path = location.pathname().ok()?;
        let query = location.search().ok()?;
        Some(format!("{path}{query}"))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

#[cfg(all(feature = "hydrate", not(test)))]
fn navigate_to(target: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(target);
    }
}

/// Outside the browser there is nothing to steer.
#[cfg(all(not(feature = "hydrate"), not(test)))]
fn navigate_to(target: &str) {
    let _ = target;
}

#[cfg(test)]
thread_local! {
    static NAVIGATIONS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Test double: record the target instead of touching `window.location`.
#[cfg(test)]
fn navigate_to(target: &str) {
    NAVIGATIONS.with(|nav| nav.borrow_mut().push(target.to_owned()));
}

#[cfg(test)]
fn drain_navigations() -> Vec<String> {
    NAVIGATIONS.with(|nav| nav.borrow_mut().drain(..).collect())
}

/// Release the guard after [`RESET_DELAY_MS`], in case the login view
/// never mounts to acknowledge.
#[cfg(feature = "hydrate")]
fn schedule_reset() {
    wasm_bindgen_futures::spawn_local(async {
        gloo_timers::future::TimeoutFuture::new(RESET_DELAY_MS).await;
        PHASE.with(|phase| phase.set(GuardPhase::Idle));
    });
}

#[cfg(not(feature = "hydrate"))]
fn schedule_reset() {}
