//! Deserialization helpers shared by the configuration types.

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing key.
///
/// Pair with `#[serde(default)]` so both cases yield `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
