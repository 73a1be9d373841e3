pub mod alert;
pub mod api;
pub mod config;
pub mod dispatch;
pub mod metrics;
pub mod notifier;
pub mod shutdown;
pub mod source;
