//! Wire DTOs for the auth endpoints.
//!
//! DESIGN
//! ======
//! Field names follow the backend contract (`phoneNumber`, `userName`,
//! `message`, `username`). Aliases accept the `status`/`identity` spelling so
//! either backend revision decodes into the same payloads. Parsing is done in
//! free functions over the raw body text so it can be tested without a server.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The sign-in marker the backend returns on a successful login.
pub const LOGIN_SUCCESS_MARKER: &str = "Login success";

/// Sign-in input. Sent as the JSON body of `POST /api/auth/signin`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInCredentials {
    pub phone_number: String,
    pub password: String,
}

impl SignInCredentials {
    #[must_use]
    pub fn new(phone_number: impl Into<String>, password: impl Into<String>) -> Self {
        Self { phone_number: phone_number.into(), password: password.into() }
    }
}

impl fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("phone_number", &self.phone_number)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign-up input. Sent as the JSON body of `POST /api/auth/signup`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpCredentials {
    pub phone_number: String,
    pub user_name: String,
    pub password: String,
}

impl SignUpCredentials {
    #[must_use]
    pub fn new(phone_number: impl Into<String>, user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self { phone_number: phone_number.into(), user_name: user_name.into(), password: password.into() }
    }
}

impl fmt::Debug for SignUpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpCredentials")
            .field("phone_number", &self.phone_number)
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /api/auth/signin`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPayload {
    /// Raw backend marker; only [`LOGIN_SUCCESS_MARKER`] means logged in.
    #[serde(default, rename = "message", alias = "status")]
    pub status: Option<String>,
    /// Display name of the signed-in user.
    #[serde(default, rename = "username", alias = "identity")]
    pub identity: Option<String>,
}

impl LoginPayload {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(LOGIN_SUCCESS_MARKER)
    }
}

/// Response of `GET /api/auth/checkAuth`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPayload {
    #[serde(default, rename = "username", alias = "identity")]
    pub identity: Option<String>,
}

/// Backend-defined confirmation body, passed through unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confirmation(pub Value);

impl Confirmation {
    /// The `message` field when the confirmation is an object, or the body
    /// itself when it is a bare string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.0 {
            Value::String(s) => Some(s),
            Value::Object(map) => map.get("message").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Decode a 2xx sign-in body.
///
/// Accepts a JSON object, a bare JSON string (`"Login success"`), or plain
/// text. Any other shape, or an object whose fields are not strings, yields
/// a payload without a marker, which the store reports as a failed sign-in.
#[must_use]
pub fn parse_login_payload(body: &str) -> LoginPayload {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return LoginPayload::default();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(marker)) => LoginPayload { status: Some(marker), identity: None },
        Ok(Value::Object(map)) => LoginPayload {
            status: string_field(&map, &["message", "status"]),
            identity: string_field(&map, &["username", "identity"]),
        },
        Ok(_) => LoginPayload::default(),
        Err(_) => LoginPayload { status: Some(trimmed.to_owned()), identity: None },
    }
}

/// Decode a 2xx session-check body.
///
/// Any 2xx means the session is valid; the identity is read from an
/// object's `username` (or `identity`) and is `None` for every other body.
#[must_use]
pub fn parse_identity_payload(body: &str) -> IdentityPayload {
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(Value::Object(map)) => IdentityPayload { identity: string_field(&map, &["username", "identity"]) },
        _ => IdentityPayload::default(),
    }
}

/// First of `keys` present in `map` with a string value.
fn string_field(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| map.get(*key).and_then(Value::as_str)).map(ToOwned::to_owned)
}

/// Decode a confirmation body: empty → `null`, JSON → value, text → string.
#[must_use]
pub fn parse_confirmation(body: &str) -> Confirmation {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Confirmation(Value::Null);
    }
    Confirmation(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_owned())))
}
