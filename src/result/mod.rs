//! Plugin result normalization.
//!
//! Plugin results arrive in one of several schema versions. [`version::negotiate`]
//! picks the matching adapter and [`normalize_result`] converts any adapter's
//! output into the single [`CanonicalResult`] schema the rest of the crate uses.

pub mod legacy;
pub mod types;
pub mod v1;
pub mod version;

pub use legacy::LegacyResult;
pub use types::{CanonicalResult, Dns, Interface, IpConfig, IpVersion, Route, CURRENT_VERSION};
pub use v1::V1Result;
pub use version::{negotiate, SUPPORTED_VERSIONS};

/// Errors raised while converting a plugin result
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("unsupported CNI result version {0:?}")]
    UnsupportedVersion(String),

    #[error("could not parse {version:?} result: {source}")]
    Decode {
        version: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize result: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("ip entry {ip} refers to interface {index} but only {count} interfaces exist")]
    InterfaceIndex { ip: usize, index: usize, count: usize },
}

/// A decoded result tagged with the schema it was decoded as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedResult {
    /// 0.1.0 and 0.2.0
    Legacy(LegacyResult),
    /// 0.3.0, 0.3.1 and 0.4.0
    Current(CanonicalResult),
    /// 1.0.0
    V1(V1Result),
}

impl VersionedResult {
    /// Version string found in the payload
    pub fn cni_version(&self) -> &str {
        match self {
            VersionedResult::Legacy(r) => &r.cni_version,
            VersionedResult::Current(r) => &r.cni_version,
            VersionedResult::V1(r) => &r.cni_version,
        }
    }
}

/// Convert a versioned result into the canonical schema
pub fn normalize_result(result: &VersionedResult) -> Result<CanonicalResult, ConversionError> {
    let canonical = match result {
        VersionedResult::Legacy(r) => r.to_canonical(),
        VersionedResult::Current(r) => CanonicalResult {
            cni_version: CURRENT_VERSION.to_string(),
            ..r.clone()
        },
        VersionedResult::V1(r) => r.to_canonical(),
    };

    check_interface_indexes(&canonical)?;
    Ok(canonical)
}

/// Negotiate the schema for `bytes` and normalize it in one step
pub fn normalize_bytes(version: &str, bytes: &[u8]) -> Result<CanonicalResult, ConversionError> {
    let result = negotiate(version, bytes)?;
    normalize_result(&result)
}

fn check_interface_indexes(result: &CanonicalResult) -> Result<(), ConversionError> {
    let count = result.interfaces.len();
    for (ip, config) in result.ips.iter().enumerate() {
        if let Some(index) = config.interface {
            if index >= count {
                return Err(ConversionError::InterfaceIndex { ip, index, count });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str = r#"{
        "cniVersion": "0.3.1",
        "interfaces": [
            {"name": "veth1a2b", "mac": "aa:bb:cc:dd:ee:01"},
            {"name": "eth0", "mac": "aa:bb:cc:dd:ee:02", "sandbox": "/var/run/netns/pod"}
        ],
        "ips": [
            {"version": "4", "interface": 1, "address": "10.0.0.5/24", "gateway": "10.0.0.1"}
        ],
        "routes": [{"dst": "0.0.0.0/0"}],
        "dns": {"nameservers": ["10.96.0.10"], "search": ["svc.cluster.local"]}
    }"#;

    #[test]
    fn test_current_result_gets_current_version() {
        let result = normalize_bytes("0.3.1", CURRENT.as_bytes()).unwrap();
        assert_eq!(result.cni_version, CURRENT_VERSION);
        assert_eq!(result.interfaces.len(), 2);
        assert_eq!(result.ips[0].interface, Some(1));
        assert_eq!(result.dns.search, vec!["svc.cluster.local".to_string()]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            ("0.3.1", CURRENT),
            ("0.2.0", r#"{"ip4": {"ip": "10.2.0.3/16", "routes": [{"dst": "0.0.0.0/0"}]}}"#),
            ("1.0.0", r#"{"ips": [{"address": "fd00::3/64"}]}"#),
        ];

        for (version, input) in inputs {
            let once = normalize_bytes(version, input.as_bytes()).unwrap();
            let bytes = serde_json::to_vec(&once).unwrap();
            let twice = normalize_bytes(&once.cni_version, &bytes).unwrap();
            assert_eq!(once, twice, "not idempotent for version {}", version);
        }
    }

    #[test]
    fn test_dangling_interface_index() {
        let input = r#"{"ips": [{"version": "4", "interface": 3, "address": "10.0.0.5/24"}]}"#;
        let err = normalize_bytes("0.4.0", input.as_bytes()).unwrap_err();
        assert!(matches!(err, ConversionError::InterfaceIndex { ip: 0, index: 3, count: 0 }));
    }

    #[test]
    fn test_cni_version_accessor() {
        let result = negotiate("0.2.0", br#"{"cniVersion": "0.2.0"}"#).unwrap();
        assert_eq!(result.cni_version(), "0.2.0");
    }
}
