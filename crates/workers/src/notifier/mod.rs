mod channel;
mod webhook;

pub use channel::{NotificationSink, NotifyError};
pub use webhook::WebhookNotifier;
