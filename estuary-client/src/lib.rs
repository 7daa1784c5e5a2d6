//! HTTP client for the Estuary pinning service.
//!
//! Uploads content and collections through the shuttle host and looks up
//! content and pins through the primary API host.
//!
//! ```rust,no_run
//! use estuary_client::PinningServiceClient;
//!
//! # async fn run() -> estuary_core::Result<()> {
//! let client = PinningServiceClient::new(
//!     "https://api.estuary.tech",
//!     "https://upload.estuary.tech",
//!     "EST-token",
//! )?;
//! let uploaded = client.upload_content(b"hello").await?;
//! let content = client.get_content_by_identifier(&uploaded.cid).await?;
//! # let _ = content;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod retry;

pub use client::PinningServiceClient;
pub use config::ClientConfig;
pub use retry::{run_with_retry, Idempotency, RetryPolicy};
