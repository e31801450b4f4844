//! Typed REST helpers for the storefront auth endpoints.
//!
//! Thin parameter-binding wrappers over the dispatcher in `net::http`:
//! endpoint constants, status-to-message mapping, and session-store updates
//! on success.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Option`/`Result` outputs instead of panics so auth fetch
//! failures degrade UI behavior without crashing hydration.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::http::{self, Method, RequestOptions};
use super::types::{AuthPayload, RegisterPayload, User};
use crate::util::session_store::SessionStore;

/// `POST` target for password login.
pub const AUTH_LOGIN: &str = "/api/auth/login";
/// `POST` target for account registration.
pub const AUTH_REGISTER: &str = "/api/auth/register";
/// `GET` target for the current authenticated user.
pub const AUTH_ME: &str = "/api/auth/me";
/// `POST` target for server-side session invalidation.
pub const AUTH_LOGOUT: &str = "/api/auth/logout";

fn login_failed_message(status: u16) -> String {
    format!("login failed: {status}")
}

fn register_failed_message(status: u16) -> String {
    format!("registration failed: {status}")
}

/// Log in with email and password via `POST /api/auth/login`.
///
/// On success the returned token and user are stored together in the
/// session store.
///
/// # Errors
///
/// Returns an error string if the request fails or the server responds
/// with a non-OK status.
pub async fn login(store: &dyn SessionStore, email: &str, password: &str) -> Result<User, String> {
    let payload = serde_json::json!({ "email": email, "password": password });
    let mut options = RequestOptions::with_body(Method::Post, payload);
    options.skip_auth = true;
    let resp = http::dispatch(store, AUTH_LOGIN, options)
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(login_failed_message(resp.status));
    }
    let auth: AuthPayload = resp.json()?;
    store.set_session(&auth.token, &auth.user);
    Ok(auth.user)
}

/// Create an account via `POST /api/auth/register`.
///
/// On success the new session's token and user are stored together, so the
/// visitor lands signed in.
///
/// # Errors
///
/// Returns an error string if the request fails or the server responds
/// with a non-OK status.
pub async fn register(store: &dyn SessionStore, payload: &RegisterPayload) -> Result<User, String> {
    let body = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    let mut options = RequestOptions::with_body(Method::Post, body);
    options.skip_auth = true;
    let resp = http::dispatch(store, AUTH_REGISTER, options)
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(register_failed_message(resp.status));
    }
    let auth: AuthPayload = resp.json()?;
    store.set_session(&auth.token, &auth.user);
    Ok(auth.user)
}

/// Fetch the currently authenticated user from `/api/auth/me`.
/// Returns `None` if not authenticated or the request fails.
pub async fn fetch_current_user(store: &dyn SessionStore) -> Option<User> {
    let resp = http::get(store, AUTH_ME).await.ok()?;
    if !resp.ok() {
        return None;
    }
    let user: User = resp.json().ok()?;
    // Refresh the cached mirror; the token itself is unchanged.
    if let Some(token) = store.token() {
        store.set_session(&token, &user);
    }
    Some(user)
}

/// Invalidate the server-side session via `POST /api/auth/logout`.
///
/// Every failure is tolerated: local teardown must proceed whether or not
/// the server heard us.
pub async fn logout_server(store: &dyn SessionStore) {
    let _ = http::dispatch(store, AUTH_LOGOUT, RequestOptions::new(Method::Post)).await;
}
