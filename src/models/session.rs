use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Course;

/// A single sitting of a course, open for attendance between
/// `start_time` and `end_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: i64,
    /// The API embeds the full course object under this key.
    pub course_id: Course,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub face_recognition_enabled: bool,
    pub location_enabled: bool,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl ClassSession {
    /// A session with no end time is still accepting attendance.
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Request body for creating a class session.
///
/// The misspelled `longtitute` key is what the server accepts; the
/// response comes back with the corrected `longitude` spelling.
#[derive(Debug, Clone, Serialize)]
pub struct NewSession {
    pub course_id: i64,
    pub face_recognition_enabled: bool,
    pub location_enabled: bool,
    #[serde(rename = "longtitute", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
}
