use chrono_tz::Tz;
use serde::Deserialize;

use crate::alert::DEFAULT_TIMEZONE;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RelayConfig {
    #[serde(default)]
    pub dsn: String,
    #[serde(default)]
    pub webhook: String,
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    /// Zone notification timestamps are rendered in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Zone the database writes `DATETIME` columns in. Falls back to
    /// `timezone`; set `UTC` explicitly for a UTC database.
    #[serde(default)]
    pub database_timezone: Option<String>,
    #[serde(default = "default_lookback_minutes")]
    pub lookback_minutes: u32,
    #[serde(default = "default_call_timeout_seconds")]
    pub call_timeout_seconds: u64,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub api_addr: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            webhook: String::new(),
            interval_seconds: default_interval_seconds(),
            timezone: default_timezone(),
            database_timezone: None,
            lookback_minutes: default_lookback_minutes(),
            call_timeout_seconds: default_call_timeout_seconds(),
            max_connections: default_max_connections(),
            api_addr: None,
        }
    }
}

impl RelayConfig {
    /// Zone used to read `DATETIME` columns. `None` (UTC) when neither
    /// `database_timezone` nor `timezone` names a known zone.
    pub fn database_zone(&self) -> Option<Tz> {
        self.database_timezone
            .as_deref()
            .unwrap_or(&self.timezone)
            .parse()
            .ok()
    }
}

fn default_interval_seconds() -> u64 {
    120
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_lookback_minutes() -> u32 {
    20
}

fn default_call_timeout_seconds() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    2
}
