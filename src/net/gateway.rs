//! Auth gateway: the async boundary between the session store and the backend.
//!
//! DESIGN
//! ======
//! The gateway owns no session state. It turns each intent into one request
//! and normalizes the outcome into a payload or a [`GatewayError`] carrying
//! the HTTP status (when a response arrived) and the backend's message.
//! Futures are `?Send` so the same trait fits a single-threaded browser loop.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::fmt;

use super::types::{Confirmation, IdentityPayload, LoginPayload, SignInCredentials, SignUpCredentials};

pub const SIGN_UP_PATH: &str = "/api/auth/signup";
pub const SIGN_IN_PATH: &str = "/api/auth/signin";
pub const SIGN_OUT_PATH: &str = "/api/auth/logout";
pub const CHECK_SESSION_PATH: &str = "/api/auth/checkAuth";

// =============================================================================
// ERROR
// =============================================================================

/// A failed round trip to the auth backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    /// HTTP status of the response; `None` when no response arrived.
    pub http_status: Option<u16>,
    /// Message extracted from the response body, or the transport error text.
    pub backend_message: String,
}

impl GatewayError {
    /// The backend could not be reached (connect failure, timeout, aborted fetch).
    #[must_use]
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self { http_status: None, backend_message: message.into() }
    }

    /// The backend answered with `status`.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self { http_status: Some(status), backend_message: message.into() }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.http_status == Some(401)
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "HTTP {status}: {}", self.backend_message),
            None => write!(f, "backend unreachable: {}", self.backend_message),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Pick the human-readable message out of an error response body.
///
/// Prefers a JSON `message` (then `error`) field, then the raw text, then
/// the canonical reason phrase for the status.
#[must_use]
pub fn backend_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "error"] {
            if let Some(text) = map.get(key).and_then(serde_json::Value::as_str) {
                return text.to_owned();
            }
        }
    }
    if trimmed.is_empty() {
        return reason_phrase(status).to_owned();
    }
    trimmed.to_owned()
}

fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .as_ref()
        .and_then(reqwest::StatusCode::canonical_reason)
        .unwrap_or("request failed")
}

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// The four auth intents. Implementations must send the session cookie on
/// every call; callers never pass a token.
#[async_trait::async_trait(?Send)]
pub trait AuthGateway {
    /// `POST /api/auth/signup` with all three credential fields.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or non-2xx status.
    async fn sign_up(&self, credentials: &SignUpCredentials) -> Result<Confirmation, GatewayError>;

    /// `POST /api/auth/signin`. The payload's marker is passed through raw.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or non-2xx status.
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<LoginPayload, GatewayError>;

    /// `POST /api/auth/logout`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or non-2xx status.
    async fn sign_out(&self) -> Result<Confirmation, GatewayError>;

    /// `GET /api/auth/checkAuth` using the ambient session cookie. Any 2xx
    /// is a valid session, whatever the body.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] (401 for an invalid or expired session).
    async fn check_session(&self) -> Result<IdentityPayload, GatewayError>;
}
