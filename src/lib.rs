//! # bookdesk
//!
//! Client-side session core for the bookdesk lending system.
//!
//! The backend identifies sessions solely by an opaque cookie it sets on
//! sign-in. This crate issues the four auth requests (`net`), keeps the
//! resulting session state machine (`state`), and classifies failures so
//! consumers can react to an expired session.

pub mod config;
pub mod net;
pub mod state;

pub use config::{ClientConfig, ConfigError};
pub use net::gateway::{AuthGateway, GatewayError};
pub use net::http::HttpAuthGateway;
pub use net::types::{Confirmation, IdentityPayload, LoginPayload, SignInCredentials, SignUpCredentials};
pub use state::session::{ErrorKind, LastError, SessionState, SessionStatus, StoreError};
pub use state::store::SessionStore;
