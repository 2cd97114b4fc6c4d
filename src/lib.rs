//! Rollcall API client library.
//!
//! This crate provides the client-side plumbing for the Rollcall
//! attendance service: an authenticated HTTP gateway with automatic
//! single-shot token refresh, session persistence, typed endpoint
//! methods for courses, class sessions, and attendance records, and a
//! small disk cache for slowly-changing server state.
//!
//! The gateway contract in one paragraph: every authenticated request
//! carries the current access token as a bearer credential. A 401
//! response triggers exactly one refresh against the token endpoint,
//! followed by a replay of the original request with the new token. A
//! failed refresh, or a second 401 on the replay, tears the session
//! down and surfaces the error. Nothing else is ever retried.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod notify;

pub use api::{ApiClient, ApiError};
pub use auth::{Session, SessionHandle, SessionTokens};
pub use config::Config;
pub use notify::{LogNotifier, Notifier};
