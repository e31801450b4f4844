//! Networking modules for the storefront REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the dispatcher every call flows through, `api` builds the
//! typed auth endpoints on top, and `types` defines the shared wire schema.

pub mod api;
pub mod http;
pub mod types;
