//! Collection request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EstuaryError, Result};

/// Body of `POST /collections/create`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    pub description: String,
}

impl CreateCollectionRequest {
    /// Creates a new request.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A collection as described by the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Collection id, used as `collection` when uploading
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Collection {
    /// Decodes the raw body returned by
    /// [`create_collection`](crate::PinningService::create_collection).
    pub fn from_body(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| EstuaryError::DecodeError {
            target: "Collection",
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_string(&CreateCollectionRequest::new("X", "Y")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, serde_json::json!({"name": "X", "description": "Y"}));
    }

    #[test]
    fn test_collection_from_body() {
        let body = r#"{
            "uuid": "c0ffee00-0000-4000-8000-000000000001",
            "name": "backups",
            "description": "nightly",
            "userId": 9,
            "createdAt": "2022-09-01T12:00:00Z"
        }"#;
        let collection = Collection::from_body(body).unwrap();
        assert_eq!(collection.name, "backups");
        assert_eq!(collection.user_id, 9);
    }

    #[test]
    fn test_collection_from_error_body() {
        let err = Collection::from_body(r#"{"error":"unauthorized"}"#).unwrap_err();
        assert!(matches!(err, EstuaryError::DecodeError { target: "Collection", .. }));
    }
}
