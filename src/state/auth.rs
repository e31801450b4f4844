//! Auth-session state for the current storefront visitor.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards and account-aware components read this mirror to decide on
//! login redirects and identity-dependent rendering; browser storage holds
//! the durable copy and the server stays the source of truth.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::User;
use crate::util::session_store::SessionStore;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl AuthState {
    /// Seed the mirror from the cached session.
    pub fn from_store(store: &dyn SessionStore) -> Self {
        Self {
            user: store.user(),
            loading: false,
        }
    }

    /// Whether a signed-in user is present.
    pub fn authenticated(&self) -> bool {
        self.user.is_some()
    }
}
