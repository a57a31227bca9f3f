//! Auth-session state value and error taxonomy.
//!
//! DESIGN
//! ======
//! Fields are private so the only way to build a state is through
//! [`SessionState::anonymous`] or [`SessionState::authenticated`]; an identity
//! can therefore never be attached to an anonymous session.
//!
//! ERROR HANDLING
//! ==============
//! Store operations return one tagged [`StoreError`]. The same failure is
//! also recorded as a [`LastError`] for display. Only backend-originated
//! failures carry an HTTP status; validation and logic errors do not.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::Serialize;

use crate::net::gateway::GatewayError;

pub const VALIDATION_SIGN_IN_MESSAGE: &str = "phone number and password are required";
pub const VALIDATION_SIGN_UP_MESSAGE: &str = "phone number, user name and password are required";
pub const LOGIC_SIGN_IN_MESSAGE: &str = "sign-in failed, check phone number or password";
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized, please sign in again";
pub const SERVER_ERROR_MESSAGE: &str = "server error";

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Anonymous,
    Authenticated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required local input was missing; no request was sent.
    Validation,
    /// The backend answered 2xx without the sign-in success marker.
    Logic,
    /// The backend rejected the session (HTTP 401).
    Unauthorized,
    /// Any other backend status, or the backend was unreachable.
    ServerError,
}

/// The most recent failure, kept for inline display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LastError {
    pub kind: ErrorKind,
    /// HTTP status for backend-originated failures.
    pub status: Option<u16>,
    pub message: String,
}

impl LastError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Validation, status: None, message: message.into() }
    }

    #[must_use]
    pub fn logic() -> Self {
        Self { kind: ErrorKind::Logic, status: None, message: LOGIC_SIGN_IN_MESSAGE.to_owned() }
    }

    /// Classify a gateway failure: 401 is `Unauthorized`, everything else
    /// (including an unreachable backend) is `ServerError`.
    #[must_use]
    pub fn classify(err: &GatewayError) -> Self {
        if err.is_unauthorized() {
            return Self { kind: ErrorKind::Unauthorized, status: err.http_status, message: UNAUTHORIZED_MESSAGE.to_owned() };
        }
        let message = if err.backend_message.trim().is_empty() {
            SERVER_ERROR_MESSAGE.to_owned()
        } else {
            format!("{SERVER_ERROR_MESSAGE}: {}", err.backend_message.trim())
        };
        Self { kind: ErrorKind::ServerError, status: err.http_status, message }
    }

    /// Map a store error onto the recorded form.
    #[must_use]
    pub fn from_store_error(err: &StoreError) -> Self {
        match err {
            StoreError::Validation(message) => Self::validation(message.clone()),
            StoreError::Gateway(gateway) => Self::classify(gateway),
            StoreError::Logic { .. } => Self::logic(),
        }
    }
}

/// Snapshot of the client's auth session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    status: SessionStatus,
    identity: Option<String>,
    last_error: Option<LastError>,
}

impl SessionState {
    /// Not signed in, optionally carrying the failure that led here.
    #[must_use]
    pub fn anonymous(last_error: Option<LastError>) -> Self {
        Self { status: SessionStatus::Anonymous, identity: None, last_error }
    }

    /// Signed in as `identity` (which the backend may omit); clears any error.
    #[must_use]
    pub fn authenticated(identity: Option<String>) -> Self {
        Self { status: SessionStatus::Authenticated, identity, last_error: None }
    }

    /// Same status and identity, error dismissed.
    #[must_use]
    pub fn without_error(self) -> Self {
        Self { last_error: None, ..self }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Errors returned by [`crate::SessionStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Missing required input; the gateway was not called.
    #[error("{0}")]
    Validation(String),

    /// The backend failed or could not be reached.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Sign-in returned 2xx without the success marker.
    #[error("sign-in failed, check phone number or password (backend status: {})", .marker.as_deref().unwrap_or("none"))]
    Logic { marker: Option<String> },
}

impl StoreError {
    /// Recorded-error kind for this failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        LastError::from_store_error(self).kind
    }
}
