use alertrelay_common::{AlertRecord, RuleDefinition};

#[async_trait::async_trait]
pub trait AlertSource: Send + Sync {
    /// Alerts updated within the lookback window, as of the query.
    async fn active_alerts(&self) -> Result<Vec<AlertRecord>, SourceError>;
}

#[async_trait::async_trait]
pub trait RuleSource: Send + Sync {
    /// Enabled rules. May contain one row per rule and domain.
    async fn active_rules(&self) -> Result<Vec<RuleDefinition>, SourceError>;
}

#[derive(Debug)]
pub enum SourceError {
    Sql(String),
    Timeout(std::time::Duration),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sql(e) => write!(f, "sql: {e}"),
            Self::Timeout(d) => write!(f, "timed out after {}s", d.as_secs_f64()),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<sqlx::Error> for SourceError {
    fn from(e: sqlx::Error) -> Self {
        Self::Sql(e.to_string())
    }
}
