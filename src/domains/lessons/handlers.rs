//! Request and response bodies for the lesson endpoints.

use serde::{Deserialize, Serialize};

use super::service::SpacesUpdate;

/// Query string of `GET /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text query; absent means "no results".
    #[serde(default)]
    pub q: Option<String>,
}

/// Body of `PUT /lessons/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSpacesRequest {
    pub spaces: i64,
}

/// `{ success, message }` reply used by lesson updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Whether the update took effect.
    pub success: bool,

    /// Human-readable outcome.
    pub message: String,
}

impl StatusResponse {
    /// Create a successful response.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Create an unsuccessful (but not failed) response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<SpacesUpdate> for StatusResponse {
    fn from(update: SpacesUpdate) -> Self {
        match update {
            SpacesUpdate::Updated => Self::success("Spaces updated"),
            SpacesUpdate::Unchanged => Self::failure("Spaces unchanged"),
            SpacesUpdate::NotFound => Self::failure("Not Found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_message() {
        let response = StatusResponse::from(SpacesUpdate::NotFound);
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "success": false, "message": "Not Found" })
        );
    }

    #[test]
    fn test_only_a_modification_is_success() {
        assert!(StatusResponse::from(SpacesUpdate::Updated).success);
        assert_eq!(
            serde_json::to_value(StatusResponse::from(SpacesUpdate::Unchanged)).unwrap(),
            json!({ "success": false, "message": "Spaces unchanged" })
        );
    }

    #[test]
    fn test_update_request_requires_integer() {
        assert!(serde_json::from_value::<UpdateSpacesRequest>(json!({ "spaces": 3 })).is_ok());
        assert!(serde_json::from_value::<UpdateSpacesRequest>(json!({ "spaces": "3" })).is_err());
        assert!(serde_json::from_value::<UpdateSpacesRequest>(json!({})).is_err());
    }
}
