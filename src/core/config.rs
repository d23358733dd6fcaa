/*!
 * Configuration
 * Command-line flags (each with a SONIFIER_* environment fallback) and the
 * validated runtime configuration derived from them
 */

use super::errors::ConfigError;
use super::limits::{
    DEFAULT_CONTROL_ADDR, DEFAULT_DEVICE, DEFAULT_REPORT_DELAY_MS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEFAULT_STATUS_ADDR,
};
use super::types::HostId;
use crate::instruments::InstrumentCatalog;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Turns link-layer traffic into instrument control messages")]
pub struct Cli {
    /// Synthesis backend host
    #[arg(short = 's', long, env = "SONIFIER_SERVER_HOST", default_value = DEFAULT_SERVER_HOST)]
    pub server_host: String,

    /// Synthesis backend port
    #[arg(short = 'p', long, env = "SONIFIER_SERVER_PORT", default_value_t = DEFAULT_SERVER_PORT)]
    pub server_port: u16,

    /// Interface to listen on
    #[arg(short = 'd', long, env = "SONIFIER_DEVICE", default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// Initial report period in milliseconds (reset period is 4x)
    #[arg(long, env = "SONIFIER_REPORT_DELAY_MS", default_value_t = DEFAULT_REPORT_DELAY_MS)]
    pub report_delay_ms: u64,

    /// Address for inbound delay updates
    #[arg(long, env = "SONIFIER_CONTROL_ADDR", default_value = DEFAULT_CONTROL_ADDR)]
    pub control_addr: String,

    /// Address of the status line feed
    #[arg(long, env = "SONIFIER_STATUS_ADDR", default_value = DEFAULT_STATUS_ADDR)]
    pub status_addr: String,

    /// JSON instrument table replacing the built-in catalog
    #[arg(long, env = "SONIFIER_INSTRUMENTS")]
    pub instruments: Option<PathBuf>,

    /// Hardware address to leave out of the sonification (repeatable)
    #[arg(long = "ignore-host", value_name = "MAC")]
    pub ignore_hosts: Vec<String>,

    /// Also sonify the capturing interface's own traffic
    #[arg(long, env = "SONIFIER_INCLUDE_SELF")]
    pub include_self: bool,

    /// Leave the interface out of promiscuous mode
    #[arg(long, env = "SONIFIER_NO_PROMISC")]
    pub no_promisc: bool,
}

/// Resolved configuration after CLI parsing
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub device: String,
    pub report_delay_ms: u64,
    pub control_addr: SocketAddr,
    pub status_addr: SocketAddr,
    pub catalog: InstrumentCatalog,
    pub ignore_hosts: Vec<HostId>,
    pub include_self: bool,
    pub promiscuous: bool,
}

fn parse_addr(field: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .parse()
        .map_err(|e| ConfigError::invalid(field, format!("'{}': {}", value, e)))
}

fn normalize_mac(value: &str) -> Result<HostId, ConfigError> {
    let octets: Vec<&str> = value.split(|c| c == ':' || c == '-').collect();
    let valid = octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(ConfigError::invalid(
            "ignore-host",
            format!("'{}' is not a hardware address", value),
        ));
    }
    Ok(HostId::new(octets.join(":").to_lowercase()))
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.device.trim().is_empty() {
            return Err(ConfigError::invalid("device", "must not be empty"));
        }
        if cli.server_host.trim().is_empty() {
            return Err(ConfigError::invalid("server-host", "must not be empty"));
        }
        if cli.report_delay_ms == 0 {
            return Err(ConfigError::invalid("report-delay-ms", "must be positive"));
        }

        let catalog = match &cli.instruments {
            Some(path) => InstrumentCatalog::from_json_file(path)?,
            None => InstrumentCatalog::default(),
        };
        let ignore_hosts = cli
            .ignore_hosts
            .iter()
            .map(|m| normalize_mac(m))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Config {
            server_host: cli.server_host.clone(),
            server_port: cli.server_port,
            device: cli.device.clone(),
            report_delay_ms: cli.report_delay_ms,
            control_addr: parse_addr("control-addr", &cli.control_addr)?,
            status_addr: parse_addr("status-addr", &cli.status_addr)?,
            catalog,
            ignore_hosts,
            include_self: cli.include_self,
            promiscuous: !cli.no_promisc,
        })
    }
}
