//! Delegate plugin configuration.
//!
//! A delegate is one sub-plugin the meta-plugin runs on behalf of a workload.
//! Besides the typed fields, every [`DelegateConfiguration`] keeps the exact
//! bytes it was built from so they can be handed to the delegate unchanged.

use crate::error::ErrorKind;
use crate::result::Dns;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Errors that can occur while loading a delegate configuration
#[derive(Debug, thiserror::Error)]
pub enum DelegateError {
    #[error("error unmarshalling delegate config: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("delegate config must be a JSON object")]
    NotAnObject,

    #[error("missing type: delegate must have the 'type' field")]
    MissingType,
}

impl DelegateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DelegateError::Parse(_) | DelegateError::NotAnObject => ErrorKind::Parse,
            DelegateError::MissingType => ErrorKind::Structural,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IpamConfig {
    #[serde(default, rename = "type", deserialize_with = "crate::de::null_as_default")]
    pub plugin_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateConfiguration {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub cni_version: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub name: String,
    #[serde(default, rename = "type")]
    pub plugin_type: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub capabilities: BTreeMap<String, bool>,
    #[serde(default)]
    pub ipam: Option<IpamConfig>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub dns: Dns,
    /// Interface name the caller wants the delegate to use
    #[serde(default)]
    pub ifname_request: Option<String>,
    /// Set only on the first delegate of a configuration
    #[serde(skip)]
    pub master_plugin: bool,
    #[serde(skip)]
    bytes: Vec<u8>,
}

impl DelegateConfiguration {
    /// Build a delegate from an already decoded JSON tree.
    ///
    /// The stored bytes are the serialization of `value`.
    pub fn from_value(value: Value) -> Result<Self, DelegateError> {
        let bytes = serde_json::to_vec(&value).map_err(DelegateError::Parse)?;
        Self::from_parts(value, bytes)
    }

    /// Serialized configuration to pass to the delegate plugin
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn from_parts(value: Value, bytes: Vec<u8>) -> Result<Self, DelegateError> {
        let object = value.as_object().ok_or(DelegateError::NotAnObject)?;

        // Checked before mapping so a missing type wins over other bad fields
        match object.get("type").and_then(Value::as_str) {
            Some(plugin_type) if !plugin_type.is_empty() => {}
            _ => return Err(DelegateError::MissingType),
        }

        let mut delegate: DelegateConfiguration =
            serde_json::from_value(value).map_err(DelegateError::Parse)?;
        delegate.bytes = bytes;
        Ok(delegate)
    }
}

/// Parse raw delegate bytes.
///
/// A non-empty `ifname_request` replaces any `ifnameRequest` found in the
/// document.
pub fn load_delegate(
    bytes: &[u8],
    ifname_request: Option<&str>,
) -> Result<DelegateConfiguration, DelegateError> {
    let value: Value = serde_json::from_slice(bytes).map_err(DelegateError::Parse)?;
    let mut delegate = DelegateConfiguration::from_parts(value, bytes.to_vec())?;

    if let Some(ifname) = ifname_request.filter(|name| !name.is_empty()) {
        delegate.ifname_request = Some(ifname.to_string());
    }

    Ok(delegate)
}
