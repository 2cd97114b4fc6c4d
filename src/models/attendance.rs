use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClassSession, User};

/// Outcome of the face recognition check for an attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaceRecognitionStatus {
    Pending,
    Success,
    Failed,
    NotRequired,
}

/// A student's attendance record for one class session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    pub id: i64,
    /// The API embeds the full session object under this key.
    pub session_id: ClassSession,
    #[serde(rename = "student_id")]
    pub student: User,
    pub created_at: DateTime<Utc>,
    pub face_recognition_status: FaceRecognitionStatus,
    pub is_present: bool,
}
