use tokio::sync::watch;
use tokio::task::JoinHandle;

pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("ctrl-c handler");
    }
}

/// Flips `stop` to `true` on SIGTERM or ctrl-c.
pub fn spawn_signal_listener(stop: watch::Sender<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_shutdown().await;
        tracing::info!("shutdown signal received, finishing current cycle");
        let _ = stop.send(true);
    })
}
