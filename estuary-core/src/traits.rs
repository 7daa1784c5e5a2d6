//! Common traits for Estuary.
//!
//! [`PinningService`] is the seam between callers and the HTTP client, so
//! tests and alternative transports can stand in for the real service.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ContentElement, PinnedElement, UploadResult};

/// Interface to a remote pinning service with a primary and a shuttle host.
///
/// Each method issues one logical request and resolves once its full
/// response has been read.
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Uploads a local file into a collection.
    ///
    /// The file's base name is used as both the multipart filename and the
    /// `name` field. Returns the raw response body.
    async fn upload_file_to_collection(
        &self,
        path: &Path,
        collection_id: &str,
        collection_path: &str,
    ) -> Result<String>;

    /// Uploads raw bytes, named by their SHA-256 digest.
    async fn upload_content(&self, data: &[u8]) -> Result<UploadResult>;

    /// Creates a collection. Returns the raw response body.
    async fn create_collection(&self, name: &str, description: &str) -> Result<String>;

    /// Looks up content by content identifier.
    ///
    /// Returns the first record in the service's order, or
    /// `ContentNotFound` when there are none.
    async fn get_content_by_identifier(&self, cid: &str) -> Result<ContentElement>;

    /// Looks up a pin by name.
    ///
    /// Returns the first result in the service's order, or `PinNotFound`
    /// when the count is zero.
    async fn get_content_by_name(&self, name: &str) -> Result<PinnedElement>;
}
