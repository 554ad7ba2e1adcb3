//! Results in the 0.1.0 / 0.2.0 shape.
//!
//! These carry at most one IPv4 and one IPv6 block, each with its own routes,
//! and no interface list.

use super::types::{CanonicalResult, Dns, IpConfig, IpVersion, Route, CURRENT_VERSION};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyIpConfig {
    pub ip: IpNetwork,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyResult {
    #[serde(default)]
    pub cni_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip4: Option<LegacyIpConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip6: Option<LegacyIpConfig>,
    #[serde(default, skip_serializing_if = "Dns::is_empty")]
    pub dns: Dns,
}

impl LegacyResult {
    pub(crate) fn to_canonical(&self) -> CanonicalResult {
        let mut result = CanonicalResult {
            cni_version: CURRENT_VERSION.to_string(),
            dns: self.dns.clone(),
            ..Default::default()
        };

        let blocks = [(IpVersion::V4, &self.ip4), (IpVersion::V6, &self.ip6)];
        for (version, block) in blocks {
            if let Some(block) = block {
                result.ips.push(IpConfig {
                    version,
                    interface: None,
                    address: block.ip,
                    gateway: block.gateway,
                });
                result.routes.extend(block.routes.iter().cloned());
            }
        }

        result
    }
}
