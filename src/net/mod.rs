//! Networking modules for the auth backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `gateway` defines the async boundary the session store talks to, `http`
//! implements it over reqwest with a cookie-bearing client, and `types`
//! defines the wire schema shared by both.

pub mod gateway;
pub mod http;
pub mod types;
