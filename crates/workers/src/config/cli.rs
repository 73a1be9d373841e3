use std::path::PathBuf;

use clap::Parser;

use super::loader::{self, LoadError};
use super::schema::RelayConfig;

/// Stamped by the release build; absent in local builds.
pub const BUILD_DATE: &str = match option_env!("ALERTRELAY_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

pub fn version_line() -> String {
    format!("alertrelay {} (built {BUILD_DATE})", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Parser)]
#[command(
    name = "alertrelay",
    about = "Enriches monitoring alerts and forwards them to an Alertmanager webhook",
    disable_version_flag = true
)]
pub struct Args {
    #[arg(short = 'V', long, help = "Print version and build date")]
    pub version: bool,

    #[arg(short, long, env = "ALERTRELAY_CONFIG", help = "Path to YAML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "ALERTRELAY_DSN", help = "MySQL connection URL")]
    pub dsn: Option<String>,

    #[arg(long, env = "ALERTRELAY_WEBHOOK", help = "Alertmanager webhook URL")]
    pub webhook: Option<String>,

    #[arg(long, help = "Seconds between dispatch cycles")]
    pub interval_seconds: Option<u64>,

    #[arg(long, help = "Zone notification timestamps are rendered in")]
    pub timezone: Option<String>,

    #[arg(long, help = "Zone the database stores DATETIME columns in")]
    pub database_timezone: Option<String>,

    #[arg(long, help = "Only alerts updated within this many minutes are sent")]
    pub lookback_minutes: Option<u32>,

    #[arg(long, help = "Timeout for each database query and webhook call")]
    pub call_timeout_seconds: Option<u64>,

    #[arg(long, env = "ALERTRELAY_API_ADDR", help = "Address for /healthz, /ready and /metrics")]
    pub api_addr: Option<String>,
}

impl Args {
    /// Config file (or defaults) with flags layered on top, validated.
    pub fn resolve(&self) -> Result<RelayConfig, LoadError> {
        let mut cfg = match &self.config {
            Some(path) => loader::parse_file(path)?,
            None => RelayConfig::default(),
        };
        self.apply(&mut cfg);
        loader::validate(&cfg)?;
        Ok(cfg)
    }

    fn apply(&self, cfg: &mut RelayConfig) {
        if let Some(v) = &self.dsn {
            cfg.dsn = v.clone();
        }
        if let Some(v) = &self.webhook {
            cfg.webhook = v.clone();
        }
        if let Some(v) = self.interval_seconds {
            cfg.interval_seconds = v;
        }
        if let Some(v) = &self.timezone {
            cfg.timezone = v.clone();
        }
        if let Some(v) = &self.database_timezone {
            cfg.database_timezone = Some(v.clone());
        }
        if let Some(v) = self.lookback_minutes {
            cfg.lookback_minutes = v;
        }
        if let Some(v) = self.call_timeout_seconds {
            cfg.call_timeout_seconds = v;
        }
        if let Some(v) = &self.api_addr {
            cfg.api_addr = Some(v.clone());
        }
    }
}
