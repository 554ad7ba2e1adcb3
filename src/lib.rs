//! # Multinet - configuration handling for a CNI meta-plugin
//!
//! A meta-plugin attaches a workload to several networks by running a list of
//! other ("delegate") CNI plugins in order. This library covers the part of
//! that job that does not execute anything: loading the meta-plugin's own
//! configuration, turning its delegate list into validated delegate
//! configurations, converting plugin results of any supported schema version
//! into one canonical result, and summarizing results as network statuses.
//!
//! ## Architecture
//!
//! - `config_loader`: Top-level configuration loading
//! - `netconf`: The loaded configuration and its append-only accumulators
//! - `delegate`: Delegate configuration parsing and validation
//! - `result`: Versioned plugin results and conversion to the canonical schema
//! - `status`: Projection of canonical results into network statuses
//! - `logging`: The logging collaborator driven by `logFile`/`logLevel`
//! - `error`: Error classification shared by the loaders
//!
//! ## Example Usage
//!
//! ```rust
//! use multinet::config_loader::load_net_conf;
//! use multinet::logging::NullLogSink;
//! use multinet::result::normalize_bytes;
//! use multinet::status::NetworkStatus;
//!
//! let mut conf = load_net_conf(
//!     br#"{"cniVersion": "0.3.1", "delegates": [{"type": "bridge"}, {"type": "macvlan"}]}"#,
//!     &NullLogSink,
//! )?;
//! assert!(conf.delegates[0].master_plugin);
//!
//! // After the master delegate has run, record what it reported
//! let result = normalize_bytes(
//!     &conf.cni_version,
//!     br#"{"interfaces": [{"name": "eth0", "sandbox": "/var/run/netns/pod"}],
//!          "ips": [{"version": "4", "interface": 0, "address": "10.0.0.5/24"}]}"#,
//! )?;
//! conf.add_network_status([NetworkStatus::project(&result, "cbr0", true)]);
//! assert_eq!(conf.net_status[0].ips, vec!["10.0.0.5".to_string()]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Each module defines its own `thiserror` error type. Loading stops at the
//! first failure and every error reports an [`error::ErrorKind`].

pub mod config_loader;
mod de;
pub mod delegate;
pub mod error;
pub mod logging;
pub mod netconf;
pub mod result;
pub mod status;
