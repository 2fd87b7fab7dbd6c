use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for registration. Fields default to empty so a missing field
/// reaches the handler's own validation instead of a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `?email=` query used by the preference and bookmark reads.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Request body for preference updates. Absent fields are left untouched;
/// provided lists replace the stored ones wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub email: Option<String>,
    pub categories: Option<Vec<String>>,
    pub sources: Option<Vec<String>>,
    pub country: Option<String>,
}

/// Request body for the bookmark toggle.
#[derive(Debug, Deserialize)]
pub struct ToggleBookmarkRequest {
    pub email: Option<String>,
    pub article: Option<Value>,
}

/// Plain acknowledgment body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Preferences {
    pub categories: Vec<String>,
    pub sources: Vec<String>,
    pub country: String,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub preferences: Preferences,
}

#[derive(Debug, Serialize)]
pub struct BookmarksResponse {
    pub bookmarks: Vec<Value>,
}
