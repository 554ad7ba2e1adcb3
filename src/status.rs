//! Network status projection.
//!
//! A [`NetworkStatus`] is the compact per-network summary attached to a
//! workload after a delegate has run. Its serialized form is one element of
//! the workload's network status annotation.

use crate::result::{
    normalize_result, CanonicalResult, ConversionError, Dns, IpConfig, IpVersion, VersionedResult,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStatus {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub default: bool,
    #[serde(default, skip_serializing_if = "Dns::is_empty")]
    pub dns: Dns,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl NetworkStatus {
    /// Build the status for network `name` from a canonical result.
    ///
    /// Only interfaces inside the workload sandbox are considered, and when
    /// several qualify the last one in the result wins. IP entries whose
    /// address does not fit their version tag are dropped.
    pub fn project(result: &CanonicalResult, name: &str, is_default: bool) -> Self {
        let mut status = NetworkStatus {
            name: name.to_string(),
            default: is_default,
            dns: result.dns.clone(),
            ..Default::default()
        };

        for iface in &result.interfaces {
            if !iface.sandbox.is_empty() {
                status.interface = Some(iface.name.clone());
                status.mac = (!iface.mac.is_empty()).then(|| iface.mac.clone());
            }
        }

        for config in &result.ips {
            match render_address(config) {
                Some(addr) => status.ips.push(addr),
                None => debug!(
                    "Dropping address {} tagged as {:?} for network {}",
                    config.address, config.version, name
                ),
            }
        }

        status
    }
}

/// Normalize a versioned result and project it into a status
pub fn load_network_status(
    result: &VersionedResult,
    name: &str,
    is_default: bool,
) -> Result<NetworkStatus, ConversionError> {
    let canonical = normalize_result(result)?;
    Ok(NetworkStatus::project(&canonical, name, is_default))
}

/// Textual address when it is representable in the family named by its tag
fn render_address(config: &IpConfig) -> Option<String> {
    let ip = config.address.ip();
    match config.version {
        IpVersion::V4 => match ip {
            IpAddr::V4(addr) => Some(addr),
            IpAddr::V6(addr) => addr.to_ipv4_mapped(),
        }
        .map(|addr| addr.to_string()),
        IpVersion::V6 => Some(ip.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{normalize_bytes, Interface};

    fn ip(version: IpVersion, address: &str) -> IpConfig {
        IpConfig {
            version,
            interface: None,
            address: address.parse().unwrap(),
            gateway: None,
        }
    }

    fn iface(name: &str, mac: &str, sandbox: &str) -> Interface {
        Interface {
            name: name.to_string(),
            mac: mac.to_string(),
            sandbox: sandbox.to_string(),
        }
    }

    #[test]
    fn test_project_sandboxed_interface_and_both_families() {
        let result = CanonicalResult {
            interfaces: vec![iface("eth0", "0a:58:0a:00:00:05", "/var/run/netns/pod")],
            ips: vec![ip(IpVersion::V4, "10.0.0.5"), ip(IpVersion::V6, "fe80::1")],
            ..Default::default()
        };

        let status = NetworkStatus::project(&result, "net1", true);
        assert_eq!(status.name, "net1");
        assert_eq!(status.interface.as_deref(), Some("eth0"));
        assert_eq!(status.mac.as_deref(), Some("0a:58:0a:00:00:05"));
        assert_eq!(status.ips, vec!["10.0.0.5".to_string(), "fe80::1".to_string()]);
        assert!(status.default);
    }

    #[test]
    fn test_host_side_interfaces_are_ignored() {
        let result = CanonicalResult {
            interfaces: vec![iface("veth9f", "ee:ee:ee:ee:ee:ee", "")],
            ..Default::default()
        };

        let status = NetworkStatus::project(&result, "net1", false);
        assert_eq!(status.interface, None);
        assert_eq!(status.mac, None);
        assert!(status.ips.is_empty());
    }

    #[test]
    fn test_last_sandboxed_interface_wins() {
        let result = CanonicalResult {
            interfaces: vec![
                iface("net1", "02:00:00:00:00:01", "/var/run/netns/pod"),
                iface("veth9f", "ee:ee:ee:ee:ee:ee", ""),
                iface("net2", "02:00:00:00:00:02", "/var/run/netns/pod"),
            ],
            ..Default::default()
        };

        let status = NetworkStatus::project(&result, "multi", false);
        assert_eq!(status.interface.as_deref(), Some("net2"));
        assert_eq!(status.mac.as_deref(), Some("02:00:00:00:00:02"));
    }

    #[test]
    fn test_mismatched_version_tag_is_dropped() {
        let result = CanonicalResult {
            ips: vec![
                ip(IpVersion::V4, "2001:db8::5/64"),
                ip(IpVersion::V4, "::ffff:10.0.0.9/120"),
                ip(IpVersion::V4, "192.168.1.20/24"),
            ],
            ..Default::default()
        };

        let status = NetworkStatus::project(&result, "net1", false);
        assert_eq!(status.ips, vec!["10.0.0.9".to_string(), "192.168.1.20".to_string()]);
        for addr in &status.ips {
            assert_eq!(addr.parse::<IpAddr>().unwrap().to_string(), *addr);
        }
    }

    #[test]
    fn test_serialized_status_omits_empty_fields() {
        let status = NetworkStatus {
            name: "cbr0".to_string(),
            ips: vec!["10.244.1.4".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"name":"cbr0","ips":["10.244.1.4"]}"#);
    }

    #[test]
    fn test_load_network_status_from_legacy_result() {
        let result = crate::result::negotiate(
            "0.2.0",
            br#"{"ip4": {"ip": "10.1.0.7/16"}, "dns": {"domain": "example.org"}}"#,
        )
        .unwrap();

        let status = load_network_status(&result, "legacy-net", true).unwrap();
        assert_eq!(status.ips, vec!["10.1.0.7".to_string()]);
        assert_eq!(status.dns.domain, "example.org");
        assert_eq!(status.interface, None);

        let canonical = normalize_bytes("0.2.0", br#"{"ip4": {"ip": "10.1.0.7/16"}}"#).unwrap();
        assert_eq!(NetworkStatus::project(&canonical, "legacy-net", true).ips, status.ips);
    }
}
