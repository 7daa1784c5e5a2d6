//! Content records returned by the Estuary API.
//!
//! All types ignore unknown fields. Only the fields a record cannot exist
//! without (`cid`, `id`) are required; a body missing them fails to decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

// ═══════════════════════════════════════════════════════════════════════════════
// UPLOADS
// ═══════════════════════════════════════════════════════════════════════════════

/// Response to `POST /content/add`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Content identifier assigned by the service
    pub cid: String,
    /// Gateway URL for retrieval
    #[serde(default)]
    pub retrieval_url: Option<String>,
    /// Service-side content id
    #[serde(rename = "estuaryId", default)]
    pub estuary_id: Option<u64>,
    /// Peers currently providing the content
    #[serde(default, deserialize_with = "null_as_default")]
    pub providers: Vec<String>,
    /// Size in bytes, when reported
    #[serde(default)]
    pub size: Option<u64>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTENT
// ═══════════════════════════════════════════════════════════════════════════════

/// A content record stored by the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Service-side id
    pub id: u64,
    /// Content identifier
    pub cid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub description: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Content type code (file, directory, ...)
    #[serde(rename = "type", default)]
    pub kind: i32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub offloaded: bool,
    /// Target number of storage deals
    #[serde(default)]
    pub replication: u32,
    /// Id of the aggregate this content was folded into, or 0
    #[serde(default)]
    pub aggregated_in: u64,
    #[serde(default)]
    pub aggregate: bool,
    #[serde(default)]
    pub pinning: bool,
    #[serde(default)]
    pub pin_meta: String,
    #[serde(default)]
    pub failed: bool,
    /// Shuttle holding the data
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub dag_split: bool,
    /// Parent content id when this record is a split piece
    #[serde(default)]
    pub split_from: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One entry of the `GET /content/by-cid/{cid}` response array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentElement {
    pub content: Content,
    /// Aggregate holding this content, if any
    #[serde(default)]
    pub aggregated_in: Option<Content>,
    /// IPLD selector path inside the aggregate
    #[serde(default)]
    pub selector: String,
}

impl ContentElement {
    /// Content identifier of the record.
    pub fn cid(&self) -> &str {
        &self.content.cid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_result_ignores_unknown_fields() {
        let body = r#"{
            "cid": "bafkreihello",
            "retrieval_url": "https://dweb.link/ipfs/bafkreihello",
            "estuaryId": 42,
            "providers": ["/ip4/1.2.3.4/tcp/6744/p2p/12D3Koo"],
            "somethingNew": {"nested": true}
        }"#;
        let result: UploadResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.cid, "bafkreihello");
        assert_eq!(result.estuary_id, Some(42));
        assert_eq!(result.providers.len(), 1);
        assert_eq!(result.size, None);
    }

    #[test]
    fn test_upload_result_null_providers() {
        let body = r#"{"cid": "bafyx", "estuaryId": 9, "providers": null}"#;
        let result: UploadResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.cid, "bafyx");
        assert!(result.providers.is_empty());
    }

    #[test]
    fn test_upload_result_requires_cid() {
        assert!(serde_json::from_str::<UploadResult>("{}").is_err());
        assert!(serde_json::from_str::<UploadResult>(r#"{"error":"nope"}"#).is_err());
    }

    #[test]
    fn test_content_element_decodes() {
        let body = r#"{
            "content": {
                "id": 7,
                "cid": "bafy000",
                "name": "notes.txt",
                "userId": 3,
                "size": 1024,
                "type": 0,
                "active": true,
                "replication": 6,
                "location": "shuttle-4",
                "createdAt": "2022-09-01T12:00:00Z"
            },
            "aggregatedIn": null,
            "selector": ""
        }"#;
        let element: ContentElement = serde_json::from_str(body).unwrap();
        assert_eq!(element.cid(), "bafy000");
        assert_eq!(element.content.size, 1024);
        assert!(element.content.active);
        assert!(element.aggregated_in.is_none());
        assert!(element.content.created_at.is_some());
        assert!(element.content.updated_at.is_none());
    }
}
