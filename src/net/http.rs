//! Core HTTP dispatcher for the storefront API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every REST call flows through [`dispatch`], which injects the bearer
//! credential and JSON content type, sends cookies by default, and watches
//! responses for session expiry (401/403). `net::api` builds typed
//! endpoints on top; the session guard in `util::auth` owns what happens
//! after an auth failure.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures are logged and re-raised; there is no retry policy.
//! Auth failures are not errors at this layer: the guard side effect fires
//! once and the original failed response is still handed back, so callers
//! keep their own failure handling.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use serde::de::DeserializeOwned;

use crate::util::session_store::SessionStore;

/// HTTP methods understood by the dispatcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Cookie behavior for a request. Cookies ride along by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CredentialsMode {
    #[default]
    Include,
    SameOrigin,
    Omit,
}

/// Options for a dispatched request.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    /// JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Extra headers appended after the standard ones.
    pub headers: Vec<(String, String)>,
    /// Skip bearer-credential injection (login/register style calls).
    pub skip_auth: bool,
    pub credentials: CredentialsMode,
}

impl RequestOptions {
    /// Options for `method` with no body.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Options for `method` carrying a JSON body.
    pub fn with_body(method: Method, body: serde_json::Value) -> Self {
        Self {
            method,
            body: Some(body),
            ..Self::default()
        }
    }
}

/// Dispatcher failure taxonomy. Auth failures are not represented here;
/// they surface as ordinary responses.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid request body: {0}")]
    Body(String),
    #[error("http dispatch is only available in the browser")]
    Unavailable,
}

/// A received response, reduced to what API callers consume.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: String) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the 2xx range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_str(&self.body).map_err(|e| e.to_string())
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer_value(token: &str) -> String {
    format!("Bearer {token}")
}

/// Bearer header value for a request, or `None` when the caller opted out
/// or no token is stored.
#[cfg(any(test, feature = "hydrate"))]
fn auth_header_value(skip_auth: bool, token: Option<&str>) -> Option<String> {
    if skip_auth {
        return None;
    }
    token.map(bearer_value)
}

/// The two statuses that signal an invalid or expired session.
#[cfg(any(test, feature = "hydrate"))]
fn is_auth_failure(status: u16) -> bool {
    matches!(status, 401 | 403)
}

#[cfg(feature = "hydrate")]
fn web_credentials(mode: CredentialsMode) -> web_sys::RequestCredentials {
    match mode {
        CredentialsMode::Include => web_sys::RequestCredentials::Include,
        CredentialsMode::SameOrigin => web_sys::RequestCredentials::SameOrigin,
        CredentialsMode::Omit => web_sys::RequestCredentials::Omit,
    }
}

/// Dispatch `options` against `path`.
///
/// Header attachment happens before transmission; status inspection happens
/// after receipt. On 401/403 the session guard fires (once; repeat
/// failures inside the same guard cycle are no-ops) and the original failed
/// response is still returned, so callers must handle the failure
/// themselves. Nothing is suppressed or retried.
///
/// # Errors
///
/// [`HttpError::Transport`] when the request cannot be sent or its body
/// read, [`HttpError::Body`] when `options.body` cannot be attached, and
/// [`HttpError::Unavailable`] outside the browser.
pub async fn dispatch(
    store: &dyn SessionStore,
    path: &str,
    options: RequestOptions,
) -> Result<ApiResponse, HttpError> {
    #[cfg(feature = "hydrate")]
    {
        use gloo_net::http::Request;

        let mut builder = match options.method {
            Method::Get => Request::get(path),
            Method::Post => Request::post(path),
            Method::Put => Request::put(path),
            Method::Patch => Request::patch(path),
            Method::Delete => Request::delete(path),
        };
        builder = builder.credentials(web_credentials(options.credentials));
        builder = builder.header("Content-Type", "application/json");
        if let Some(value) = auth_header_value(options.skip_auth, store.token().as_deref()) {
            builder = builder.header("Authorization", &value);
        }
        for (name, value) in &options.headers {
            builder = builder.header(name, value);
        }
        let request = match options.body {
            Some(body) => builder.json(&body).map_err(|e| HttpError::Body(e.to_string()))?,
            None => builder.build().map_err(|e| HttpError::Body(e.to_string()))?,
        };
        let response = request.send().await.map_err(|e| {
            log::error!("request to {path} failed: {e}");
            HttpError::Transport(e.to_string())
        })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        if is_auth_failure(status)
            && crate::util::auth::guard_phase() == crate::util::auth::GuardPhase::Idle
        {
            crate::util::auth::expire_session(store);
        }
        Ok(ApiResponse::new(status, body))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (store, path, options);
        Err(HttpError::Unavailable)
    }
}

/// `GET path`.
///
/// # Errors
///
/// See [`dispatch`].
pub async fn get(store: &dyn SessionStore, path: &str) -> Result<ApiResponse, HttpError> {
    dispatch(store, path, RequestOptions::new(Method::Get)).await
}

/// `POST path` with a JSON body.
///
/// # Errors
///
/// See [`dispatch`].
pub async fn post(
    store: &dyn SessionStore,
    path: &str,
    body: serde_json::Value,
) -> Result<ApiResponse, HttpError> {
    dispatch(store, path, RequestOptions::with_body(Method::Post, body)).await
}

/// `PUT path` with a JSON body.
///
/// # Errors
///
/// See [`dispatch`].
pub async fn put(
    store: &dyn SessionStore,
    path: &str,
    body: serde_json::Value,
) -> Result<ApiResponse, HttpError> {
    dispatch(store, path, RequestOptions::with_body(Method::Put, body)).await
}

/// `PATCH path` with a JSON body.
///
/// # Errors
///
/// See [`dispatch`].
pub async fn patch(
    store: &dyn SessionStore,
    path: &str,
    body: serde_json::Value,
) -> Result<ApiResponse, HttpError> {
    dispatch(store, path, RequestOptions::with_body(Method::Patch, body)).await
}

/// `DELETE path`.
///
/// # Errors
///
/// See [`dispatch`].
pub async fn delete(store: &dyn SessionStore, path: &str) -> Result<ApiResponse, HttpError> {
    dispatch(store, path, RequestOptions::new(Method::Delete)).await
}
