//! Version negotiation for plugin results.
//!
//! The version string comes from the configuration that produced the result,
//! not from the result payload itself.

use super::legacy::LegacyResult;
use super::types::CanonicalResult;
use super::v1::V1Result;
use super::{ConversionError, VersionedResult};
use log::debug;
use serde::de::DeserializeOwned;

/// Result versions this crate can decode
pub const SUPPORTED_VERSIONS: &[&str] = &["0.1.0", "0.2.0", "0.3.0", "0.3.1", "0.4.0", "1.0.0"];

/// Decode `bytes` with the adapter selected by `version`.
///
/// An empty version string is treated as 0.1.0.
pub fn negotiate(version: &str, bytes: &[u8]) -> Result<VersionedResult, ConversionError> {
    debug!("Decoding result with version {:?}", version);

    match version {
        "" | "0.1.0" | "0.2.0" => {
            decode::<LegacyResult>(version, bytes).map(VersionedResult::Legacy)
        }
        "0.3.0" | "0.3.1" | "0.4.0" => {
            decode::<CanonicalResult>(version, bytes).map(VersionedResult::Current)
        }
        "1.0.0" => decode::<V1Result>(version, bytes).map(VersionedResult::V1),
        other => Err(ConversionError::UnsupportedVersion(other.to_string())),
    }
}

fn decode<T: DeserializeOwned>(version: &str, bytes: &[u8]) -> Result<T, ConversionError> {
    serde_json::from_slice(bytes).map_err(|source| ConversionError::Decode {
        version: version.to_string(),
        source,
    })
}
