// Authentication wire models

use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Token pair returned by the login and refresh endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh request body
/// Field naming follows the backend contract; the endpoint path itself is
/// configurable because deployments disagree on it
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Authenticated user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_deserialization() {
        let body = r#"{"access_token":"abc","refresh_token":"def"}"#;
        let pair: AuthResponse = serde_json::from_str(body).unwrap();

        assert_eq!(pair.access_token, "abc");
        assert_eq!(pair.refresh_token, "def");
    }

    #[test]
    fn test_refresh_request_serialization() {
        let request = RefreshRequest {
            refresh_token: "tok".to_string(),
        };
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body, serde_json::json!({ "refresh_token": "tok" }));
    }

    #[test]
    fn test_user_tolerates_missing_password() {
        let body = r#"{"id":1,"email":"a@b.c","name":"Ada","role":"admin","avatar":"http://img"}"#;
        let user: User = serde_json::from_str(body).unwrap();

        assert_eq!(user.name, "Ada");
        assert_eq!(user.password, None);
    }
}
