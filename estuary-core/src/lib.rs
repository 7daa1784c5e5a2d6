//! # Estuary Core
//!
//! Core types, errors, and traits for the Estuary pinning client.
//!
//! - **Types**: Upload results, content and pin records, collection requests
//! - **Errors**: One error enum, classified by the stage that failed
//! - **Constants**: Endpoints, API paths, multipart fields, transport defaults
//! - **Traits**: [`PinningService`], implemented by the HTTP client
//!
//! ## Example
//!
//! ```rust
//! use estuary_core::{ContentDigest, CreateCollectionRequest};
//!
//! let digest = ContentDigest::of(b"hello");
//! assert_eq!(digest.as_str().len(), 64);
//!
//! let body = serde_json::to_string(&CreateCollectionRequest::new("X", "Y")).unwrap();
//! assert_eq!(body, r#"{"name":"X","description":"Y"}"#);
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ErrorStage, EstuaryError, Result};
pub use traits::*;
pub use types::*;
