//! Injected session storage for the bearer token, cached user record, and
//! the one-shot login notice.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dispatcher and the session guard only ever touch storage through the
//! [`SessionStore`] trait, so both stay testable without a browser. The
//! browser implementation persists to `localStorage`; the in-memory one
//! backs tests and non-browser builds.

#[cfg(test)]
#[path = "session_store_test.rs"]
mod session_store_test;

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::net::types::User;
use crate::state::toast::ToastKind;

/// `localStorage` key for the bearer token.
pub const TOKEN_KEY: &str = "petalcart_token";
/// `localStorage` key for the cached user record.
pub const USER_KEY: &str = "petalcart_user";
/// `localStorage` key for the pending login notice.
pub const LOGIN_NOTICE_KEY: &str = "petalcart_login_notice";

/// A transient notification written before a login redirect and consumed
/// exactly once by the login view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginNotice {
    pub kind: ToastKind,
    pub message: String,
}

impl LoginNotice {
    /// The canonical notice stored when an expired session bounces the
    /// visitor to login.
    pub fn session_expired() -> Self {
        Self {
            kind: ToastKind::Error,
            message: "Your session has expired. Please sign in again.".to_owned(),
        }
    }
}

/// Storage access for the authenticated session.
///
/// The token and user are a pair: there is deliberately no way to set or
/// clear one without the other.
pub trait SessionStore {
    /// The stored bearer token, if any.
    fn token(&self) -> Option<String>;
    /// The cached user record, if any.
    fn user(&self) -> Option<User>;
    /// Store `token` and `user` together.
    fn set_session(&self, token: &str, user: &User);
    /// Remove the token and user together.
    fn clear_session(&self);
    /// Store the pending login notice, replacing any previous one.
    fn set_login_notice(&self, notice: &LoginNotice);
    /// Remove and return the pending login notice, if one is stored.
    fn take_login_notice(&self) -> Option<LoginNotice>;
}

/// `localStorage`-backed store used in the browser.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionStore;

#[cfg(feature = "hydrate")]
impl BrowserSessionStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }

    fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(feature = "hydrate")]
impl SessionStore for BrowserSessionStore {
    fn token(&self) -> Option<String> {
        Self::get(TOKEN_KEY)
    }

    fn user(&self) -> Option<User> {
        let raw = Self::get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    fn set_session(&self, token: &str, user: &User) {
        // Serialize first so a failure cannot leave a token stored without
        // its user.
        let Ok(raw) = serde_json::to_string(user) else {
            return;
        };
        Self::set(TOKEN_KEY, token);
        Self::set(USER_KEY, &raw);
    }

    fn clear_session(&self) {
        Self::remove(TOKEN_KEY);
        Self::remove(USER_KEY);
    }

    fn set_login_notice(&self, notice: &LoginNotice) {
        if let Ok(raw) = serde_json::to_string(notice) {
            Self::set(LOGIN_NOTICE_KEY, &raw);
        }
    }

    fn take_login_notice(&self) -> Option<LoginNotice> {
        let raw = Self::get(LOGIN_NOTICE_KEY)?;
        Self::remove(LOGIN_NOTICE_KEY);
        serde_json::from_str(&raw).ok()
    }
}

/// In-memory store for tests and non-browser builds.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RefCell<Option<String>>,
    user: RefCell<Option<User>>,
    notice: RefCell<Option<LoginNotice>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    fn set_session(&self, token: &str, user: &User) {
        *self.token.borrow_mut() = Some(token.to_owned());
        *self.user.borrow_mut() = Some(user.clone());
    }

    fn clear_session(&self) {
        *self.token.borrow_mut() = None;
        *self.user.borrow_mut() = None;
    }

    fn set_login_notice(&self, notice: &LoginNotice) {
        *self.notice.borrow_mut() = Some(notice.clone());
    }

    fn take_login_notice(&self) -> Option<LoginNotice> {
        self.notice.borrow_mut().take()
    }
}
