//! Data models for the Rollcall attendance API.
//!
//! These mirror the service's wire format (snake_case JSON). Request
//! DTOs live next to the response types they produce.

pub mod attendance;
pub mod course;
pub mod session;
pub mod user;

pub use attendance::{Attendance, FaceRecognitionStatus};
pub use course::Course;
pub use session::{ClassSession, NewSession};
pub use user::{MessageResponse, PasswordResetConfirm, Role, User};
