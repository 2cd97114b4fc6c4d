use serde::{Deserialize, Serialize};

/// A course that class sessions are held for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: i64,
    pub name: String,
}
