use alertrelay_common::CompiledNotification;
use reqwest::Client;

use super::channel::{NotificationSink, NotifyError};

/// Posts the batch as a JSON array to an Alertmanager-compatible receiver.
pub struct WebhookNotifier {
    url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl NotificationSink for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, batch: &[CompiledNotification]) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(batch)?;
        tracing::debug!(payload = %String::from_utf8_lossy(&body), "posting batch");

        self.client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
