//! Session state for the current client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` holds the state value and error taxonomy; `store` owns the state
//! machine that drives it from gateway results.

pub mod session;
pub mod store;
