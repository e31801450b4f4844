//! Wire DTOs for the storefront auth endpoints.
//!
//! DESIGN
//! ======
//! These types mirror the server's JSON payloads so serde round-trips stay
//! lossless; the copy cached in browser storage uses the same shapes and is
//! treated as a mirror, never as the source of truth.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// A signed-in shop visitor as returned by the auth endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID string).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email address.
    pub email: String,
    /// Delivery contact number, if the visitor provided one.
    pub phone: Option<String>,
    /// Account role (e.g. `"customer"`, `"admin"`).
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "customer".to_owned()
}

/// Response body of a successful login or registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Opaque bearer credential for subsequent requests.
    pub token: String,
    /// The authenticated user record.
    pub user: User,
}

/// Request body for account registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterPayload {
    /// Display name.
    pub name: String,
    /// Account email address.
    pub email: String,
    /// Plaintext password; only ever sent over the wire, never stored.
    pub password: String,
    /// Optional delivery contact number.
    pub phone: Option<String>,
}
