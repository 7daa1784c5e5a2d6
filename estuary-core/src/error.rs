//! Error types for the Estuary client.
//!
//! Every failure is returned as an [`EstuaryError`]; the variant tells the
//! caller which stage of a call failed (see [`ErrorStage`]).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `EstuaryError`.
pub type Result<T> = std::result::Result<T, EstuaryError>;

/// Main error type for all Estuary operations.
#[derive(Debug, Error)]
pub enum EstuaryError {
    // ═══════════════════════════════════════════════════════════════════════════
    // LOCAL I/O ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A local file could not be opened or read.
    #[error("Failed to read '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Multipart form could not be encoded.
    #[error("Multipart encoding failed: {0}")]
    Multipart(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // REQUEST CONSTRUCTION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Endpoint URL is malformed or cannot carry a path.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Request could not be built (headers, URL composition).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Could not establish a connection. The request never reached the service.
    #[error("Connection failed: {0}")]
    ConnectFailed(String),

    /// Request timed out.
    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    /// Service answered with a non-success status.
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // DECODING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Response body did not decode into the expected shape.
    #[error("Failed to decode {target}: {reason}")]
    DecodeError { target: &'static str, reason: String },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // NOT-FOUND ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Lookup by content identifier returned no records.
    #[error("content not found for cid: {0}")]
    ContentNotFound(String),

    /// Lookup by pin name returned no results.
    #[error("no pinning results for name: {0}")]
    PinNotFound(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// The stage of a call at which an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorStage {
    /// Reading local input or encoding the request body.
    LocalIo,
    /// Composing the URL or headers.
    Request,
    /// Network failure or non-success status.
    Transport,
    /// Response body did not match the expected shape.
    Decode,
    /// Well-formed response with zero results.
    NotFound,
    /// Bad configuration or caller input.
    Config,
}

impl std::fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorStage::LocalIo => "local i/o",
            ErrorStage::Request => "request",
            ErrorStage::Transport => "transport",
            ErrorStage::Decode => "decode",
            ErrorStage::NotFound => "not found",
            ErrorStage::Config => "config",
        };
        f.write_str(s)
    }
}

impl EstuaryError {
    /// Returns the stage this error belongs to.
    pub fn stage(&self) -> ErrorStage {
        match self {
            EstuaryError::FileRead { .. }
            | EstuaryError::Io(_)
            | EstuaryError::Multipart(_) => ErrorStage::LocalIo,
            EstuaryError::InvalidEndpoint { .. } | EstuaryError::InvalidRequest(_) => {
                ErrorStage::Request
            }
            EstuaryError::HttpError(_)
            | EstuaryError::ConnectFailed(_)
            | EstuaryError::ConnectionTimeout(_)
            | EstuaryError::UnexpectedStatus { .. } => ErrorStage::Transport,
            EstuaryError::DecodeError { .. } | EstuaryError::JsonError(_) => ErrorStage::Decode,
            EstuaryError::ContentNotFound(_) | EstuaryError::PinNotFound(_) => {
                ErrorStage::NotFound
            }
            EstuaryError::ValidationError(_) | EstuaryError::ConfigError(_) => ErrorStage::Config,
        }
    }

    /// Returns true if this error is recoverable (can retry).
    ///
    /// Server errors and `429 Too Many Requests` count; other statuses do not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            EstuaryError::HttpError(_)
            | EstuaryError::ConnectFailed(_)
            | EstuaryError::ConnectionTimeout(_) => true,
            EstuaryError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if the request is known not to have reached the service.
    pub fn is_unsent(&self) -> bool {
        matches!(self, EstuaryError::ConnectFailed(_))
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.stage() == ErrorStage::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_not_found_messages_name_the_key() {
        let err = EstuaryError::ContentNotFound("bafy000".into());
        assert!(err.to_string().contains("bafy000"));

        let err = EstuaryError::PinNotFound("foo".into());
        assert!(err.to_string().contains("foo"));
        assert!(err.is_not_found());
    }

    #[test_case(500, true ; "internal server error")]
    #[test_case(503, true ; "service unavailable")]
    #[test_case(429, true ; "rate limited")]
    #[test_case(404, false ; "not found status")]
    #[test_case(401, false ; "unauthorized")]
    fn test_status_recoverability(status: u16, expected: bool) {
        let err = EstuaryError::UnexpectedStatus {
            status,
            body: String::new(),
        };
        assert_eq!(err.is_recoverable(), expected);
        assert_eq!(err.stage(), ErrorStage::Transport);
    }

    #[test]
    fn test_error_stages() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = EstuaryError::FileRead {
            path: "/tmp/missing".into(),
            source: io,
        };
        assert_eq!(err.stage(), ErrorStage::LocalIo);
        assert!(err.to_string().contains("/tmp/missing"));

        let err = EstuaryError::DecodeError {
            target: "UploadResult",
            reason: "missing field `cid`".into(),
        };
        assert_eq!(err.stage(), ErrorStage::Decode);
        assert!(!err.is_recoverable());

        assert_eq!(
            EstuaryError::ConfigError("x".into()).stage(),
            ErrorStage::Config
        );
    }

    #[test]
    fn test_only_connect_failures_are_unsent() {
        assert!(EstuaryError::ConnectFailed("refused".into()).is_unsent());
        assert!(!EstuaryError::ConnectionTimeout("slow".into()).is_unsent());
        assert!(!EstuaryError::HttpError("reset".into()).is_unsent());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = EstuaryError::from(io);
        assert!(matches!(err, EstuaryError::Io(_)));
        assert_eq!(err.stage(), ErrorStage::LocalIo);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid");
        let result: Result<serde_json::Value> = json_result.map_err(EstuaryError::from);
        assert!(matches!(result, Err(EstuaryError::JsonError(_))));
    }
}
