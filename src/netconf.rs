//! Top-level meta-plugin network configuration.

use crate::delegate::DelegateConfiguration;
use crate::result::CanonicalResult;
use crate::status::NetworkStatus;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Directory for cached delegate results when `cniDir` is unset
pub const DEFAULT_CNI_DIR: &str = "/var/lib/cni/multus";

/// Directory for delegate configuration files when `confDir` is unset
pub const DEFAULT_CONF_DIR: &str = "/etc/cni/multus/net.d";

/// Network configuration as seen by the meta-plugin.
///
/// Built by [`crate::config_loader::load_net_conf`]. After a successful load
/// the raw delegate list and raw previous result are consumed, `delegates`
/// holds at least one entry and the first entry is the master plugin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetConf {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub cni_version: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "crate::de::null_as_default")]
    pub plugin_type: String,

    #[serde(default, rename = "delegates", deserialize_with = "crate::de::null_as_default")]
    pub(crate) raw_delegates: Vec<Value>,
    #[serde(skip)]
    pub delegates: Vec<DelegateConfiguration>,

    #[serde(default, rename = "prevResult")]
    pub(crate) raw_prev_result: Option<Value>,
    #[serde(skip)]
    pub prev_result: Option<CanonicalResult>,

    #[serde(skip)]
    pub net_status: Vec<NetworkStatus>,

    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub cni_dir: PathBuf,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub conf_dir: PathBuf,

    /// Used by the orchestrator to look up additional delegates
    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,

    /// Plugin-specific fields passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NetConf {
    /// Append delegates discovered after the initial load
    pub fn add_delegates<I>(&mut self, delegates: I)
    where
        I: IntoIterator<Item = DelegateConfiguration>,
    {
        self.delegates.extend(delegates);
    }

    /// Append the statuses of delegates that have run
    pub fn add_network_status<I>(&mut self, statuses: I)
    where
        I: IntoIterator<Item = NetworkStatus>,
    {
        self.net_status.extend(statuses);
    }

    /// The delegate flagged as master, if the configuration is loaded
    pub fn master(&self) -> Option<&DelegateConfiguration> {
        self.delegates.first().filter(|d| d.master_plugin)
    }

    pub(crate) fn apply_directory_defaults(&mut self) {
        if self.cni_dir.as_os_str().is_empty() {
            self.cni_dir = PathBuf::from(DEFAULT_CNI_DIR);
        }
        if self.conf_dir.as_os_str().is_empty() {
            self.conf_dir = PathBuf::from(DEFAULT_CONF_DIR);
        }
    }
}
