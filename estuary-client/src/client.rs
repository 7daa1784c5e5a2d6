//! Estuary pinning client.
//!
//! Lookups go to the primary API host; uploads and collection writes go to
//! the shuttle host. Every request carries the bearer token and is retried
//! according to the configured [`RetryPolicy`].

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use estuary_core::constants::{
    FIELD_COLLECTION, FIELD_COLLECTION_PATH, FIELD_DATA, FIELD_NAME, PATH_COLLECTIONS_CREATE,
    PATH_CONTENT_ADD, PATH_CONTENT_BY_CID, PATH_PINNING_PINS, QUERY_NAME,
};
use estuary_core::error::{EstuaryError, Result};
use estuary_core::types::{
    ContentDigest, ContentElement, CreateCollectionRequest, PinnedElement, PinningQueryResult,
    UploadResult,
};
use estuary_core::PinningService;

use crate::config::ClientConfig;
use crate::retry::{run_with_retry, Idempotency, RetryPolicy};

const USER_AGENT: &str = concat!("estuary-client/", env!("CARGO_PKG_VERSION"));
const OCTET_STREAM: &str = "application/octet-stream";
const JSON: &str = "application/json";

/// HTTP client for an Estuary-style pinning service.
///
/// Cloning is cheap and clones share the underlying connection pool, so a
/// single client can serve concurrent callers.
#[derive(Clone)]
pub struct PinningServiceClient {
    primary: Url,
    upload: Url,
    token: String,
    timeout: Duration,
    retry: RetryPolicy,
    http_client: reqwest::Client,
}

impl PinningServiceClient {
    /// Creates a client for the given endpoints with default transport settings.
    pub fn new(
        primary_endpoint: impl Into<String>,
        upload_endpoint: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(ClientConfig::new(primary_endpoint, upload_endpoint, auth_token))
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| EstuaryError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Self::with_http_client(config, http_client)
    }

    /// Creates a client on top of an existing `reqwest::Client`.
    ///
    /// Per-request timeouts from `config` still apply.
    pub fn with_http_client(config: ClientConfig, http_client: reqwest::Client) -> Result<Self> {
        let (primary, upload) = config.validate()?;

        Ok(Self {
            primary,
            upload,
            token: config.auth_token,
            timeout: Duration::from_secs(config.timeout_seconds),
            retry: config.retry,
            http_client,
        })
    }

    /// Returns a copy of this client that uses `timeout` for each request.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }

    /// Primary API endpoint.
    pub fn primary_endpoint(&self) -> &Url {
        &self.primary
    }

    /// Shuttle upload endpoint.
    pub fn upload_endpoint(&self) -> &Url {
        &self.upload
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // UPLOADS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Uploads a local file into a collection and returns the raw response body.
    ///
    /// The file is read before any request is made; an unreadable file fails
    /// with `FileRead` and nothing is sent.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn upload_file_to_collection(
        &self,
        path: &Path,
        collection_id: &str,
        collection_path: &str,
    ) -> Result<String> {
        let data = read_file(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                EstuaryError::ValidationError(format!("'{}' has no file name", path.display()))
            })?;
        let url = endpoint(&self.upload, PATH_CONTENT_ADD, None)?;
        let size = data.len();

        let response = self
            .send(Idempotency::NonIdempotent, "upload file to collection", || {
                let form = Form::new()
                    .part(FIELD_DATA, data_part(data.clone(), &file_name)?)
                    .text(FIELD_NAME, file_name.clone())
                    .text(FIELD_COLLECTION, collection_id.to_string())
                    .text(FIELD_COLLECTION_PATH, collection_path.to_string());
                Ok(self.http_client.post(url.clone()).multipart(form))
            })
            .await?;

        let body = read_text(response).await?;
        debug!(size, file_name = %file_name, collection_id, "Uploaded file to collection");
        Ok(body)
    }

    /// Uploads raw bytes, named by their SHA-256 digest.
    pub async fn upload_content(&self, data: &[u8]) -> Result<UploadResult> {
        self.upload_content_named(data, None).await
    }

    /// Uploads raw bytes under `name`, or under their digest when `name` is `None`.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload_content_named(
        &self,
        data: &[u8],
        name: Option<&str>,
    ) -> Result<UploadResult> {
        let file_name = match name {
            Some(n) if !n.trim().is_empty() => n.to_string(),
            Some(_) => {
                return Err(EstuaryError::ValidationError("upload name cannot be empty".into()))
            }
            None => ContentDigest::of(data).to_string(),
        };
        let data = Bytes::copy_from_slice(data);
        let url = endpoint(&self.upload, PATH_CONTENT_ADD, None)?;

        let response = self
            .send(Idempotency::NonIdempotent, "upload content", || {
                let mut form = Form::new().part(FIELD_DATA, data_part(data.clone(), &file_name)?);
                if name.is_some() {
                    form = form.text(FIELD_NAME, file_name.clone());
                }
                Ok(self.http_client.post(url.clone()).multipart(form))
            })
            .await?;

        let result: UploadResult = decode(response, "UploadResult").await?;
        debug!(cid = %result.cid, file_name = %file_name, "Uploaded content");
        Ok(result)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // COLLECTIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Creates a collection and returns the raw response body.
    ///
    /// Use [`Collection::from_body`](estuary_core::Collection::from_body) to decode it.
    #[instrument(skip(self))]
    pub async fn create_collection(&self, name: &str, description: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(EstuaryError::ValidationError("collection name cannot be empty".into()));
        }

        let url = endpoint(&self.upload, PATH_COLLECTIONS_CREATE, None)?;
        let request = CreateCollectionRequest::new(name, description);

        let response = self
            .send(Idempotency::NonIdempotent, "create collection", || {
                Ok(self.http_client.post(url.clone()).json(&request))
            })
            .await?;

        let body = read_text(response).await?;
        debug!(name, "Created collection");
        Ok(body)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUPS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Looks up content by cid and returns the first record.
    #[instrument(skip(self))]
    pub async fn get_content_by_identifier(&self, cid: &str) -> Result<ContentElement> {
        if cid.trim().is_empty() {
            return Err(EstuaryError::ValidationError("CID cannot be empty".into()));
        }
        // `.` and `..` would be dropped from the path and hit a different route
        if cid == "." || cid == ".." {
            return Err(EstuaryError::ValidationError(format!("'{}' is not a CID", cid)));
        }

        let mut segments = PATH_CONTENT_BY_CID.to_vec();
        segments.push(cid);
        let url = endpoint(&self.primary, &segments, None)?;

        let response = self
            .send(Idempotency::Idempotent, "get content by cid", || {
                Ok(self.http_client.get(url.clone()).header(ACCEPT, JSON))
            })
            .await?;

        let elements: Vec<ContentElement> = decode(response, "Vec<ContentElement>").await?;
        let count = elements.len();
        let first = elements
            .into_iter()
            .next()
            .ok_or_else(|| EstuaryError::ContentNotFound(cid.to_string()))?;

        debug!(cid, count, "Found content");
        Ok(first)
    }

    /// Looks up a pin by name and returns the first result.
    #[instrument(skip(self))]
    pub async fn get_content_by_name(&self, name: &str) -> Result<PinnedElement> {
        if name.trim().is_empty() {
            return Err(EstuaryError::ValidationError("pin name cannot be empty".into()));
        }

        let url = endpoint(&self.primary, PATH_PINNING_PINS, Some((QUERY_NAME, name)))?;

        let response = self
            .send(Idempotency::Idempotent, "get content by name", || {
                Ok(self.http_client.get(url.clone()).header(ACCEPT, JSON))
            })
            .await?;

        let query: PinningQueryResult = decode(response, "PinningQueryResult").await?;
        if query.count == 0 {
            return Err(EstuaryError::PinNotFound(name.to_string()));
        }

        let count = query.count;
        let first = query.into_first().ok_or_else(|| EstuaryError::DecodeError {
            target: "PinningQueryResult",
            reason: format!("count is {} but results is empty", count),
        })?;

        debug!(name, count, cid = %first.pin.cid, "Found pin");
        Ok(first)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT
    // ═══════════════════════════════════════════════════════════════════════════

    /// Sends the request produced by `build`, rebuilding it for each attempt.
    ///
    /// Non-success statuses become `UnexpectedStatus` carrying the body.
    async fn send<F>(
        &self,
        idempotency: Idempotency,
        description: &'static str,
        build: F,
    ) -> Result<reqwest::Response>
    where
        F: Fn() -> Result<reqwest::RequestBuilder>,
    {
        let build = &build;
        run_with_retry(&self.retry, idempotency, description, move || async move {
            let response = build()?
                .bearer_auth(&self.token)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EstuaryError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            Ok(response)
        })
        .await
    }
}

#[async_trait]
impl PinningService for PinningServiceClient {
    async fn upload_file_to_collection(
        &self,
        path: &Path,
        collection_id: &str,
        collection_path: &str,
    ) -> Result<String> {
        PinningServiceClient::upload_file_to_collection(self, path, collection_id, collection_path)
            .await
    }

    async fn upload_content(&self, data: &[u8]) -> Result<UploadResult> {
        PinningServiceClient::upload_content(self, data).await
    }

    async fn create_collection(&self, name: &str, description: &str) -> Result<String> {
        PinningServiceClient::create_collection(self, name, description).await
    }

    async fn get_content_by_identifier(&self, cid: &str) -> Result<ContentElement> {
        PinningServiceClient::get_content_by_identifier(self, cid).await
    }

    async fn get_content_by_name(&self, name: &str) -> Result<PinnedElement> {
        PinningServiceClient::get_content_by_name(self, name).await
    }
}

impl std::fmt::Debug for PinningServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinningServiceClient")
            .field("primary", &self.primary.as_str())
            .field("upload", &self.upload.as_str())
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Joins `segments` (and an optional query pair) onto `base`.
fn endpoint(base: &Url, segments: &[&str], query: Option<(&str, &str)>) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| EstuaryError::InvalidEndpoint {
            endpoint: base.to_string(),
            reason: "endpoint cannot be a base URL".into(),
        })?;
        path.pop_if_empty().extend(segments);
    }
    if let Some((key, value)) = query {
        url.query_pairs_mut().append_pair(key, value);
    }
    Ok(url)
}

async fn read_file(path: &Path) -> Result<Bytes> {
    tokio::fs::read(path)
        .await
        .map(Bytes::from)
        .map_err(|source| EstuaryError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Builds the `data` part as a stream of unknown length, so the transport
/// sends the form with chunked transfer encoding.
fn data_part(data: Bytes, file_name: &str) -> Result<Part> {
    let stream = futures::stream::once(async move { Ok::<_, std::io::Error>(data) });
    Part::stream(reqwest::Body::wrap_stream(stream))
        .file_name(file_name.to_string())
        .mime_str(OCTET_STREAM)
        .map_err(|e| EstuaryError::Multipart(e.to_string()))
}

async fn read_text(response: reqwest::Response) -> Result<String> {
    response
        .text()
        .await
        .map_err(|e| EstuaryError::HttpError(format!("failed to read response body: {}", e)))
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    target: &'static str,
) -> Result<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| EstuaryError::HttpError(format!("failed to read response body: {}", e)))?;

    serde_json::from_slice(&body).map_err(|e| EstuaryError::DecodeError {
        target,
        reason: e.to_string(),
    })
}

fn transport_error(e: reqwest::Error) -> EstuaryError {
    if e.is_builder() {
        EstuaryError::InvalidRequest(e.to_string())
    } else if e.is_connect() {
        EstuaryError::ConnectFailed(e.to_string())
    } else if e.is_timeout() {
        EstuaryError::ConnectionTimeout(e.to_string())
    } else {
        EstuaryError::HttpError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_endpoint_join() {
        let url = endpoint(&base("https://upload.estuary.tech"), PATH_CONTENT_ADD, None).unwrap();
        assert_eq!(url.as_str(), "https://upload.estuary.tech/content/add");

        let url = endpoint(&base("https://upload.estuary.tech/"), PATH_CONTENT_ADD, None).unwrap();
        assert_eq!(url.as_str(), "https://upload.estuary.tech/content/add");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = endpoint(&base("http://localhost:3004/api/v1/"), PATH_PINNING_PINS, None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3004/api/v1/pinning/pins");
    }

    #[test]
    fn test_endpoint_encodes_query() {
        let url = endpoint(
            &base("https://api.estuary.tech"),
            PATH_PINNING_PINS,
            Some((QUERY_NAME, "my file&more")),
        )
        .unwrap();
        assert_eq!(url.path(), "/pinning/pins");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("name".to_string(), "my file&more".to_string())]);
    }

    #[test]
    fn test_client_rejects_bad_config() {
        let err = PinningServiceClient::new("::", "https://upload.estuary.tech", "tok").unwrap_err();
        assert!(matches!(err, EstuaryError::InvalidEndpoint { .. }));

        let err = PinningServiceClient::new(
            "https://api.estuary.tech",
            "https://upload.estuary.tech",
            "",
        )
        .unwrap_err();
        assert!(matches!(err, EstuaryError::ConfigError(_)));
    }

    #[test]
    fn test_with_timeout_overrides_only_timeout() {
        let client = PinningServiceClient::new(
            "https://api.estuary.tech",
            "https://upload.estuary.tech",
            "tok",
        )
        .unwrap();
        let fast = client.with_timeout(Duration::from_millis(250));
        assert_eq!(fast.timeout(), Duration::from_millis(250));
        assert_eq!(fast.primary_endpoint(), client.primary_endpoint());
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = PinningServiceClient::new(
            "https://api.estuary.tech",
            "https://upload.estuary.tech",
            "super-secret",
        )
        .unwrap();
        assert!(!format!("{:?}", client).contains("super-secret"));
    }
}
