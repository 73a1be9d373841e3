use alertrelay_common::CompiledNotification;

#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;
    /// Delivers the whole batch in one request. Delivery is attempted once.
    async fn deliver(&self, batch: &[CompiledNotification]) -> Result<(), NotifyError>;
}

#[derive(Debug)]
pub enum NotifyError {
    Encode(String),
    Transport(String),
    Status(u16),
    Timeout(std::time::Duration),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "notify: encode: {e}"),
            Self::Transport(e) => write!(f, "notify: transport: {e}"),
            Self::Status(code) => write!(f, "notify: receiver answered HTTP {code}"),
            Self::Timeout(d) => write!(f, "notify: timed out after {}s", d.as_secs_f64()),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<serde_json::Error> for NotifyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e.to_string())
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(e.to_string()),
        }
    }
}
