//! Session store: the client's auth state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! Constructed once at application start and passed by reference to the views
//! that need it. Views call `login`/`logout`/`register`/`check_session`; the
//! store calls the gateway, applies the result, and publishes the new
//! [`SessionState`] to subscribers.
//!
//! DESIGN
//! ======
//! State lives in a `watch` channel: `state()` is a snapshot, `subscribe()`
//! gives a receiver that wakes on every transition. Each operation publishes
//! once, after its gateway call completes. Overlapping operations are not
//! serialized; whichever completes last wins. Dropping the store closes the
//! channel.
//!
//! TRANSITIONS
//! ===========
//! - login ok + success marker     → Authenticated(identity)
//! - login other marker / failure  → Anonymous + error
//! - `check_session` ok            → Authenticated(identity?)
//! - `check_session` failure       → Anonymous + classified error (401 = Unauthorized)
//! - logout (always)               → Anonymous, no error
//! - register ok                   → Anonymous, no error
//! - register failure              → Anonymous + error

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use tokio::sync::watch;

use super::session::{
    ErrorKind, LastError, SessionState, SessionStatus, StoreError, VALIDATION_SIGN_IN_MESSAGE,
    VALIDATION_SIGN_UP_MESSAGE,
};
use crate::net::gateway::AuthGateway;
use crate::net::types::{Confirmation, SignInCredentials, SignUpCredentials};

pub struct SessionStore<G> {
    gateway: G,
    state: watch::Sender<SessionState>,
}

impl<G: AuthGateway> SessionStore<G> {
    /// Create an anonymous store without contacting the backend.
    #[must_use]
    pub fn new(gateway: G) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { gateway, state }
    }

    /// Create a store and restore any existing backend session once.
    pub async fn start(gateway: G) -> Self {
        let store = Self::new(gateway);
        store.restore().await;
        store
    }

    // =========================================================================
    // OBSERVATION
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    #[must_use]
    pub fn identity(&self) -> Option<String> {
        self.state.borrow().identity().map(ToOwned::to_owned)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<LastError> {
        self.state.borrow().last_error().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Receiver that observes every published state until the store is dropped.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Sign in with phone number and password.
    ///
    /// Only the backend's `"Login success"` marker authenticates the session.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] for a blank phone number or password (no request sent).
    /// - [`StoreError::Logic`] when the backend answers without the success marker.
    /// - [`StoreError::Gateway`] when the request fails.
    ///
    /// Every error leaves the store `Anonymous` with the failure recorded.
    pub async fn login(&self, credentials: SignInCredentials) -> Result<SessionState, StoreError> {
        if let Err(err) = validate_sign_in(&credentials) {
            return Err(self.fail(err));
        }

        let result = self.gateway.sign_in(&credentials).await;
        drop(credentials);

        match result {
            Ok(payload) if payload.is_success() => {
                tracing::info!(identity = payload.identity.as_deref().unwrap_or(""), "signed in");
                Ok(self.publish(SessionState::authenticated(payload.identity)))
            }
            Ok(payload) => {
                tracing::warn!(marker = payload.status.as_deref().unwrap_or(""), "sign-in answered without success marker");
                Err(self.fail(StoreError::Logic { marker: payload.status }))
            }
            Err(err) => Err(self.fail(StoreError::Gateway(err))),
        }
    }

    /// Ask the backend whether the ambient session cookie is still valid.
    ///
    /// A 401 is treated as the server invalidating the session: the local
    /// session is cleared as if the user had logged out, and the recorded
    /// error is `Unauthorized`. No sign-out request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Gateway`] when the check fails; the store is then
    /// `Anonymous` with the classified error recorded.
    pub async fn check_session(&self) -> Result<SessionState, StoreError> {
        match self.gateway.check_session().await {
            Ok(payload) => Ok(self.publish(SessionState::authenticated(payload.identity))),
            Err(err) => {
                let recorded = LastError::classify(&err);
                if recorded.kind == ErrorKind::Unauthorized {
                    tracing::info!("backend rejected session; clearing local session");
                } else {
                    tracing::warn!(error = %err, "session check failed");
                }
                self.publish(SessionState::anonymous(Some(recorded)));
                Err(StoreError::Gateway(err))
            }
        }
    }

    /// Re-derive the session from the backend, swallowing failure.
    ///
    /// A first-time visitor has no cookie, so failure here is expected; the
    /// store settles in `Anonymous` and the classified error stays readable.
    pub async fn restore(&self) {
        match self.check_session().await {
            Ok(state) => tracing::debug!(identity = state.identity().unwrap_or(""), "session restored"),
            Err(err) => tracing::debug!(error = %err, "no session to restore"),
        }
    }

    /// Sign out. Waits for the backend, then clears local state whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Gateway`] if the backend did not confirm the
    /// sign-out. Local state is cleared regardless and no error is recorded.
    pub async fn logout(&self) -> Result<(), StoreError> {
        let outcome = self.gateway.sign_out().await;
        self.publish(SessionState::anonymous(None));
        match outcome {
            Ok(_) => {
                tracing::info!("signed out");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "sign-out not confirmed by backend; local session cleared");
                Err(StoreError::Gateway(err))
            }
        }
    }

    /// Register a new account. Registration never signs the user in.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] for a blank phone number, user name or password (no request sent).
    /// - [`StoreError::Gateway`] when the backend rejects the registration.
    pub async fn register(&self, credentials: SignUpCredentials) -> Result<Confirmation, StoreError> {
        if let Err(err) = validate_sign_up(&credentials) {
            return Err(self.fail(err));
        }

        let result = self.gateway.sign_up(&credentials).await;
        drop(credentials);

        match result {
            Ok(confirmation) => {
                tracing::info!("registered");
                self.publish(SessionState::anonymous(None));
                Ok(confirmation)
            }
            Err(err) => Err(self.fail(StoreError::Gateway(err))),
        }
    }

    /// Clear the recorded error without changing status or identity.
    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|state| {
            if state.last_error().is_none() {
                return false;
            }
            *state = state.clone().without_error();
            true
        });
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn publish(&self, next: SessionState) -> SessionState {
        tracing::debug!(status = ?next.status(), "session state published");
        self.state.send_replace(next.clone());
        next
    }

    /// Record `err` and settle into `Anonymous`.
    fn fail(&self, err: StoreError) -> StoreError {
        self.publish(SessionState::anonymous(Some(LastError::from_store_error(&err))));
        err
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn validate_sign_in(credentials: &SignInCredentials) -> Result<(), StoreError> {
    if is_blank(&credentials.phone_number) || is_blank(&credentials.password) {
        return Err(StoreError::Validation(VALIDATION_SIGN_IN_MESSAGE.to_owned()));
    }
    Ok(())
}

fn validate_sign_up(credentials: &SignUpCredentials) -> Result<(), StoreError> {
    if is_blank(&credentials.phone_number) || is_blank(&credentials.user_name) || is_blank(&credentials.password) {
        return Err(StoreError::Validation(VALIDATION_SIGN_UP_MESSAGE.to_owned()));
    }
    Ok(())
}
