//! REST API client module for the Rollcall attendance service.
//!
//! This module provides the `ApiClient` for communicating with the
//! attendance API: courses, class sessions, and attendance records.
//!
//! The API uses JWT bearer token authentication. Access tokens are
//! short-lived; the client refreshes them transparently (once per
//! request) through the token refresh endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
