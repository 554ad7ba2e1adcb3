use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, LevelFilter};
use multinet::config_loader::load_net_conf_from_file;
use multinet::logging::ProcessLogger;
use multinet::netconf::NetConf;
use multinet::result;
use multinet::status::load_network_status;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

/// Check a meta-plugin network configuration and project plugin results
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the meta-plugin network configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Plugin result file to project into a network status
    #[arg(short, long)]
    result: Option<PathBuf>,

    /// Schema version of the result file (defaults to the configuration's cniVersion)
    #[arg(long, requires = "result")]
    result_version: Option<String>,

    /// Network name recorded in the status (defaults to the master delegate's name)
    #[arg(long, requires = "result")]
    network_name: Option<String>,

    /// Mark the projected network as the workload's default network
    #[arg(long, requires = "result")]
    default_network: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Configuration files may redirect this through logFile/logLevel
    let logger = ProcessLogger::install(LevelFilter::Info).wrap_err("Failed to install logger")?;

    let mut conf = load_net_conf_from_file(&args.config, logger)
        .wrap_err_with(|| format!("Failed to load configuration '{}'", args.config.display()))?;

    if let Some(result_path) = &args.result {
        let bytes = fs::read(result_path)
            .wrap_err_with(|| format!("Failed to read result '{}'", result_path.display()))?;
        let version = args.result_version.as_deref().unwrap_or(&conf.cni_version);
        let versioned = result::negotiate(version, &bytes)
            .wrap_err_with(|| format!("Failed to decode result '{}'", result_path.display()))?;

        let name = args
            .network_name
            .clone()
            .or_else(|| conf.master().map(|d| d.name.clone()))
            .unwrap_or_default();
        let status = load_network_status(&versioned, &name, args.default_network)?;
        info!("Projected status for network {:?} with {} addresses", name, status.ips.len());
        conf.add_network_status([status]);
    }

    let summary = summarize(&conf)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn summarize(conf: &NetConf) -> Result<Value> {
    let delegates: Vec<Value> = conf
        .delegates
        .iter()
        .map(|d| {
            json!({
                "type": d.plugin_type,
                "name": d.name,
                "master": d.master_plugin,
                "ifnameRequest": d.ifname_request,
            })
        })
        .collect();

    Ok(json!({
        "cniVersion": conf.cni_version,
        "name": conf.name,
        "cniDir": conf.cni_dir.display().to_string(),
        "confDir": conf.conf_dir.display().to_string(),
        "delegates": delegates,
        "prevResult": serde_json::to_value(&conf.prev_result)?,
        "networkStatus": serde_json::to_value(&conf.net_status)?,
    }))
}
