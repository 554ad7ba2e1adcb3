use crate::delegate::{DelegateConfiguration, DelegateError};
use crate::error::ErrorKind;
use crate::logging::LogSink;
use crate::netconf::NetConf;
use crate::result::{normalize_result, version, ConversionError};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Errors that can occur while loading a network configuration
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read netconf {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load netconf: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("could not convert prevResult: {0}")]
    PrevResult(#[source] ConversionError),

    #[error("no delegates: at least one delegate must be specified")]
    NoDelegates,

    #[error("failed to load delegate {index} config: {source}")]
    Delegate {
        index: usize,
        #[source]
        source: DelegateError,
    },
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Io { .. } => ErrorKind::Io,
            LoadError::Parse(_) => ErrorKind::Parse,
            LoadError::PrevResult(_) => ErrorKind::Conversion,
            LoadError::NoDelegates => ErrorKind::Policy,
            LoadError::Delegate { source, .. } => source.kind(),
        }
    }

    /// Index of the delegate that failed to load, if any
    pub fn delegate_index(&self) -> Option<usize> {
        match self {
            LoadError::Delegate { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Parse and assemble a network configuration.
///
/// Stages run in order and the first failure aborts the load:
/// parse, forward logging directives, convert `prevResult`, require at
/// least one delegate, default the directories, load every delegate, and
/// flag the first delegate as master.
pub fn load_net_conf(bytes: &[u8], log_sink: &dyn LogSink) -> Result<NetConf, LoadError> {
    let mut netconf: NetConf = serde_json::from_slice(bytes).map_err(LoadError::Parse)?;

    if let Some(path) = netconf.log_file.as_deref().filter(|p| !p.is_empty()) {
        log_sink.set_log_file(Path::new(path));
    }
    if let Some(level) = netconf.log_level.as_deref().filter(|l| !l.is_empty()) {
        log_sink.set_log_level(level);
    }

    if let Some(raw) = netconf.raw_prev_result.take() {
        let result_bytes = serde_json::to_vec(&raw)
            .map_err(|e| LoadError::PrevResult(ConversionError::Serialize(e)))?;
        let result = version::negotiate(&netconf.cni_version, &result_bytes)
            .map_err(LoadError::PrevResult)?;
        netconf.prev_result = Some(normalize_result(&result).map_err(LoadError::PrevResult)?);
        debug!(
            "Converted prevResult decoded as {:?} (payload version {:?})",
            netconf.cni_version,
            result.cni_version()
        );
    }

    if netconf.raw_delegates.is_empty() {
        return Err(LoadError::NoDelegates);
    }

    netconf.apply_directory_defaults();

    let raw_delegates = std::mem::take(&mut netconf.raw_delegates);
    let mut delegates = Vec::with_capacity(raw_delegates.len());
    for (index, raw) in raw_delegates.into_iter().enumerate() {
        let delegate = DelegateConfiguration::from_value(raw)
            .map_err(|source| LoadError::Delegate { index, source })?;
        debug!("Loaded delegate {} of type {}", index, delegate.plugin_type);
        delegates.push(delegate);
    }

    // Non-empty: checked above
    delegates[0].master_plugin = true;
    netconf.delegates = delegates;

    info!(
        "Loaded netconf {:?} with {} delegates, master plugin {}",
        netconf.name,
        netconf.delegates.len(),
        netconf.delegates[0].plugin_type
    );

    Ok(netconf)
}

/// Read a configuration file and load it with [`load_net_conf`]
pub fn load_net_conf_from_file(
    path: &Path,
    log_sink: &dyn LogSink,
) -> Result<NetConf, LoadError> {
    info!("Loading configuration from: {:?}", path);

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    load_net_conf(&bytes, log_sink)
}
