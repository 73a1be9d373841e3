use std::sync::Arc;
use std::time::Duration;

use alertrelay_workers::alert::Compiler;
use alertrelay_workers::api;
use alertrelay_workers::config::cli::version_line;
use alertrelay_workers::config::Args;
use alertrelay_workers::dispatch::{DispatchCycle, IntervalScheduler};
use alertrelay_workers::metrics::relay_metrics::RelayMetrics;
use alertrelay_workers::notifier::WebhookNotifier;
use alertrelay_workers::shutdown::spawn_signal_listener;
use alertrelay_workers::source::{create_pool, MySqlSource};
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    if args.version {
        println!("{}", version_line());
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = args.resolve()?;
    let database_zone = config.database_zone();
    let compiler = Compiler::new(&config.timezone);

    tracing::info!(
        webhook = %config.webhook,
        interval_s = config.interval_seconds,
        lookback_min = config.lookback_minutes,
        display_zone = ?compiler.zone(),
        database_zone = ?database_zone,
        "alertrelay configured"
    );

    let pool = match create_pool(&config.dsn, config.max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "cannot connect to database");
            return Err(e.into());
        }
    };
    tracing::info!("database connected");

    let relay_metrics = RelayMetrics::new();
    let (stop_tx, stop_rx) = watch::channel(false);
    let _signals = spawn_signal_listener(stop_tx);

    let api_handle = match &config.api_addr {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "API server starting");
            let m = relay_metrics.clone();
            let stop = stop_rx.clone();
            Some(tokio::spawn(async move {
                if let Err(e) = api::serve(listener, m, stop).await {
                    tracing::error!(error = %e, "API server failed");
                }
            }))
        }
        None => None,
    };

    let source = Arc::new(MySqlSource::new(
        pool.clone(),
        config.lookback_minutes,
        database_zone,
    ));
    let cycle = DispatchCycle::new(
        source.clone(),
        source,
        Arc::new(WebhookNotifier::new(config.webhook.clone())),
        compiler,
        relay_metrics,
        Duration::from_secs(config.call_timeout_seconds),
    );

    let scheduler = IntervalScheduler::new(Duration::from_secs(config.interval_seconds));
    tracing::info!("entering dispatch loop");
    let cycle = &cycle;
    let runs = scheduler
        .run(
            move || async move {
                let outcome = cycle.run_once().await;
                tracing::debug!(?outcome, "cycle finished");
            },
            stop_rx,
        )
        .await;

    if let Some(handle) = api_handle {
        let _ = handle.await;
    }
    pool.close().await;
    tracing::info!(runs, "alertrelay stopped");

    Ok(())
}
