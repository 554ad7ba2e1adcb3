//! Results in the 1.0.0 shape, where IP entries carry no version tag.

use super::types::{CanonicalResult, Dns, Interface, IpConfig, IpVersion, Route, CURRENT_VERSION};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V1IpConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<usize>,
    pub address: IpNetwork,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V1Result {
    #[serde(default)]
    pub cni_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ips: Vec<V1IpConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Dns::is_empty")]
    pub dns: Dns,
}

impl V1Result {
    pub(crate) fn to_canonical(&self) -> CanonicalResult {
        let ips = self
            .ips
            .iter()
            .map(|ip| IpConfig {
                version: IpVersion::of(ip.address.ip()),
                interface: ip.interface,
                address: ip.address,
                gateway: ip.gateway,
            })
            .collect();

        CanonicalResult {
            cni_version: CURRENT_VERSION.to_string(),
            interfaces: self.interfaces.clone(),
            ips,
            routes: self.routes.clone(),
            dns: self.dns.clone(),
        }
    }
}
