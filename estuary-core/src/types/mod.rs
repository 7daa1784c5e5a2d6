//! Domain types for Estuary.
//!
//! - [`ContentDigest`]: SHA-256 name for raw uploads
//! - [`UploadResult`]: Response to a content upload
//! - [`ContentElement`]: Content record looked up by cid
//! - [`PinnedElement`] / [`PinningQueryResult`]: Pin records looked up by name
//! - [`CreateCollectionRequest`] / [`Collection`]: Collection writes

mod collection;
mod content;
mod digest;
mod pinning;

pub use collection::*;
pub use content::*;
pub use digest::*;
pub use pinning::*;

use serde::{Deserialize, Deserializer};

/// Decodes an explicit `null` the same as a missing field.
///
/// The service writes empty lists and maps as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
