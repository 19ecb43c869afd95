//! Gateway: the HTTP surface proxying REST calls to the messaging session.
//!
//! Lifecycle:
//! 1. Load config, build the media fetcher
//! 2. Connect the session client (stub or live)
//! 3. Build the router, bind, serve
//!
//! Session logic lives in `wagate-session`; handlers here only translate
//! JSON payloads, check readiness, and surface failures as JSON errors.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;
