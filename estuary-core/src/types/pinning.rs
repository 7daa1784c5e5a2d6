//! Pin status records from the IPFS pinning-service API (`/pinning/pins`).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Lifecycle state of a pin request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinStatus {
    Queued,
    Pinning,
    Pinned,
    Failed,
    /// A status string this client does not know about
    #[serde(other)]
    Unknown,
}

/// The pinned object itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub cid: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Multiaddrs known to provide the content
    #[serde(default, deserialize_with = "null_as_default")]
    pub origins: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: HashMap<String, serde_json::Value>,
}

/// A single pin status record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedElement {
    /// Request id, used for follow-up status calls
    pub requestid: String,
    pub status: PinStatus,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    pub pin: Pin,
    /// Multiaddrs of the service's own peers
    #[serde(default, deserialize_with = "null_as_default")]
    pub delegates: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub info: HashMap<String, serde_json::Value>,
}

/// Response to `GET /pinning/pins`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinningQueryResult {
    /// Total number of matches on the service
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<PinnedElement>,
}

impl PinningQueryResult {
    /// First result in the service's own order.
    ///
    /// Returns `None` when `count` is zero, even if `results` is not empty.
    pub fn first(&self) -> Option<&PinnedElement> {
        if self.count == 0 {
            return None;
        }
        self.results.first()
    }

    /// Consumes the result and returns its first element.
    pub fn into_first(self) -> Option<PinnedElement> {
        if self.count == 0 {
            return None;
        }
        self.results.into_iter().next()
    }
}
