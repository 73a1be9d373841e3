use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::{health, metrics};
use crate::metrics::relay_metrics::RelayMetrics;

pub fn router(relay_metrics: Arc<RelayMetrics>) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::metrics))
        .with_state(relay_metrics)
}

/// Serves until `stop` flips to `true`.
pub async fn serve(
    listener: TcpListener,
    relay_metrics: Arc<RelayMetrics>,
    mut stop: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let app = router(relay_metrics);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = stop.wait_for(|stopped| *stopped).await;
        })
        .await
}
