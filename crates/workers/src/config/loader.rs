use std::path::Path;

use chrono_tz::Tz;

use super::schema::RelayConfig;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

/// Reads a config file without validating it; flags may still fill required keys.
pub fn parse_file(path: &Path) -> Result<RelayConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    parse_str(&contents)
}

pub fn parse_str(yaml: &str) -> Result<RelayConfig, LoadError> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn validate(cfg: &RelayConfig) -> Result<(), LoadError> {
    if cfg.dsn.is_empty() {
        return Err(LoadError::Validation("dsn must not be empty".into()));
    }
    if !cfg.dsn.starts_with("mysql://") {
        return Err(LoadError::Validation(
            "dsn must be a mysql:// connection URL".into(),
        ));
    }
    if cfg.webhook.is_empty() {
        return Err(LoadError::Validation("webhook URL must not be empty".into()));
    }
    if cfg.interval_seconds == 0 {
        return Err(LoadError::Validation("interval_seconds must be > 0".into()));
    }
    if cfg.lookback_minutes == 0 {
        return Err(LoadError::Validation("lookback_minutes must be > 0".into()));
    }
    if cfg.call_timeout_seconds == 0 {
        return Err(LoadError::Validation(
            "call_timeout_seconds must be > 0".into(),
        ));
    }
    if cfg.max_connections == 0 {
        return Err(LoadError::Validation("max_connections must be > 0".into()));
    }
    if let Some(zone) = &cfg.database_timezone {
        if zone.parse::<Tz>().is_err() {
            return Err(LoadError::Validation(format!(
                "database_timezone {zone:?} is not a known zone"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"
dsn: mysql://relay:pw@127.0.0.1:3306/monitor
webhook: http://127.0.0.1:9093/api/v1/alerts
"#;

    fn load_from_str(yaml: &str) -> Result<RelayConfig, LoadError> {
        let cfg = parse_str(yaml)?;
        validate(&cfg)?;
        Ok(cfg)
    }

    #[test]
    fn valid_config() {
        let cfg = load_from_str(VALID).unwrap();
        assert_eq!(cfg.webhook, "http://127.0.0.1:9093/api/v1/alerts");
        assert_eq!(cfg.interval_seconds, 120);
    }

    #[test]
    fn empty_dsn_rejected() {
        let err = load_from_str("webhook: http://x/\n").unwrap_err();
        assert!(err.to_string().contains("dsn must not be empty"));
    }

    #[test]
    fn non_mysql_dsn_rejected() {
        let yaml = "dsn: postgres://localhost/db\nwebhook: http://x/\n";
        let err = load_from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("mysql://"));
    }

    #[test]
    fn empty_webhook_rejected() {
        let yaml = "dsn: mysql://localhost/monitor\nwebhook: \"\"\n";
        let err = load_from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("webhook"));
    }

    #[test]
    fn zero_interval_rejected() {
        let yaml = format!("{VALID}interval_seconds: 0\n");
        let err = load_from_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("interval_seconds"));
    }

    #[test]
    fn zero_lookback_rejected() {
        let yaml = format!("{VALID}lookback_minutes: 0\n");
        let err = load_from_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("lookback_minutes"));
    }

    #[test]
    fn unknown_database_timezone_rejected() {
        let yaml = format!("{VALID}database_timezone: Nowhere/Land\n");
        let err = load_from_str(&yaml).unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
    }

    #[test]
    fn invalid_yaml() {
        let err = load_from_str("{{{{").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn parse_file_then_validate() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(VALID.as_bytes()).unwrap();
        let cfg = parse_file(f.path()).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.dsn, "mysql://relay:pw@127.0.0.1:3306/monitor");
    }

    #[test]
    fn missing_file() {
        let err = parse_file(Path::new("/nonexistent/alertrelay.yml")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
