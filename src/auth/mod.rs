//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `Session`: the token pair plus disk persistence
//! - `SessionHandle`: the shared, injectable session context the API
//!   client reads during the attach phase and mutates on refresh and
//!   teardown
//!
//! Sessions are persisted to disk so a restart does not force a fresh
//! login while the refresh token is still good.

pub mod session;

pub use session::{Session, SessionHandle, SessionTokens};
