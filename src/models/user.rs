use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Lecturer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Detail-only response body used by the password reset endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub detail: String,
}

/// Request body for completing a password reset from an emailed link.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirm {
    pub uid: String,
    pub token: String,
    pub new_password1: String,
    pub new_password2: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user() {
        let json = r#"{
            "id": 42,
            "email": "ada@example.edu",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "role": "lecturer"
        }"#;

        let user: User = serde_json::from_str(json).expect("Failed to parse user");
        assert_eq!(user.role, Role::Lecturer);
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_role_wire_strings_are_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
        let role: Role = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(role, Role::Student);
    }
}
