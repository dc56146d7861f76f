use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Default location of the joined vehicle table, relative to the working
/// directory.
pub const DEFAULT_DATA_PATH: &str = "combined_vehicles.csv";

pub const DEFAULT_ADDR: &str = "127.0.0.1:8050";

// ---------------------------------------------------------------------------
// Chart limits
// ---------------------------------------------------------------------------

/// Sizes that shape the seven charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLimits {
    pub histogram_bins: usize,
    pub top_companies: usize,
    pub top_makes: usize,
    pub top_models: usize,
}

impl Default for ChartLimits {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            top_companies: 10,
            top_makes: 15,
            top_models: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub addr: SocketAddr,
    pub debug: bool,
    /// Vehicle types selected on first load (if present in the data).
    pub default_types: Vec<String>,
    /// Fuel sources selected on first load (if present in the data).
    pub default_fuels: Vec<String>,
    pub limits: ChartLimits,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            addr: SocketAddr::from(([127, 0, 0, 1], 8050)),
            debug: false,
            default_types: ["Taxi", "Pedicab", "Livery"].map(String::from).to_vec(),
            default_fuels: ["Gasoline", "Electric", "Hybrid"].map(String::from).to_vec(),
            limits: ChartLimits::default(),
        }
    }
}

impl DashboardConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    /// Install `env_logger` with this configuration's default filter.
    pub fn init_logging(&self) {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_filter()),
        )
        .init();
    }
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(about = "Illinois public passenger vehicle fleet dashboard")]
pub struct DesktopArgs {
    /// Vehicle table (.csv, .json or .parquet).
    #[arg(default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Verbose logging.
    #[arg(long)]
    pub debug: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Serve the fleet dashboard over HTTP")]
pub struct WebArgs {
    /// Vehicle table (.csv, .json or .parquet).
    #[arg(default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,

    /// Verbose logging.
    #[arg(long)]
    pub debug: bool,
}

impl From<DesktopArgs> for DashboardConfig {
    fn from(args: DesktopArgs) -> Self {
        DashboardConfig {
            data_path: args.data,
            debug: args.debug,
            ..Default::default()
        }
    }
}

impl From<WebArgs> for DashboardConfig {
    fn from(args: WebArgs) -> Self {
        DashboardConfig {
            data_path: args.data,
            addr: args.addr,
            debug: args.debug,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("combined_vehicles.csv"));
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.limits.histogram_bins, 20);
        assert_eq!(config.limits.top_companies, 10);
        assert_eq!(config.limits.top_makes, 15);
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn web_args_override_defaults() {
        let args = WebArgs::parse_from(["fleetboard-web", "fleet.parquet", "--addr", "0.0.0.0:9000", "--debug"]);
        let config = DashboardConfig::from(args);
        assert_eq!(config.data_path, PathBuf::from("fleet.parquet"));
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.log_filter(), "debug");
        assert_eq!(config.default_types, vec!["Taxi", "Pedicab", "Livery"]);
    }

    #[test]
    fn desktop_args_default_path() {
        let config = DashboardConfig::from(DesktopArgs::parse_from(["fleetboard"]));
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(!config.debug);
    }
}
