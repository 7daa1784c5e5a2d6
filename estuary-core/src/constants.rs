//! Constants for the Estuary pinning API.
//!
//! Paths are relative to the configured endpoint; the client appends them as
//! path segments so endpoints with a base path keep working.

// ═══════════════════════════════════════════════════════════════════════════════
// ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default primary API host (queries).
pub const DEFAULT_PRIMARY_ENDPOINT: &str = "https://api.estuary.tech";

/// Default shuttle host (uploads and collection writes).
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://upload.estuary.tech";

// ═══════════════════════════════════════════════════════════════════════════════
// API PATHS
// ═══════════════════════════════════════════════════════════════════════════════

/// `POST {upload}/content/add`
pub const PATH_CONTENT_ADD: &[&str] = &["content", "add"];

/// `POST {upload}/collections/create`
pub const PATH_COLLECTIONS_CREATE: &[&str] = &["collections", "create"];

/// `GET {primary}/content/by-cid/{cid}`
pub const PATH_CONTENT_BY_CID: &[&str] = &["content", "by-cid"];

/// `GET {primary}/pinning/pins?name={name}`
pub const PATH_PINNING_PINS: &[&str] = &["pinning", "pins"];

/// Query parameter for name lookups.
pub const QUERY_NAME: &str = "name";

// ═══════════════════════════════════════════════════════════════════════════════
// MULTIPART FIELDS
// ═══════════════════════════════════════════════════════════════════════════════

/// File content part.
pub const FIELD_DATA: &str = "data";

/// Display name of the uploaded file.
pub const FIELD_NAME: &str = "name";

/// Target collection id.
pub const FIELD_COLLECTION: &str = "collection";

/// Path of the file inside the collection.
pub const FIELD_COLLECTION_PATH: &str = "collectionPath";

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Primary endpoint override.
pub const ENV_API_URL: &str = "ESTUARY_API_URL";

/// Shuttle endpoint override.
pub const ENV_SHUTTLE_URL: &str = "ESTUARY_SHUTTLE_URL";

/// Bearer token.
pub const ENV_API_TOKEN: &str = "ESTUARY_API_TOKEN";

/// Request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "ESTUARY_TIMEOUT_SECS";

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSPORT DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default number of attempts per request, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Delay before the first retry, in milliseconds.
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 250;

/// Upper bound for the delay between retries, in milliseconds.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 4_000;

// ═══════════════════════════════════════════════════════════════════════════════
// DIGESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Length of a raw SHA-256 digest.
pub const DIGEST_SIZE: usize = 32;
