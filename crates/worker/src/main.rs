use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upwatch_events::{AlertForwarder, DeadLetterNotifier, EventBus};
use upwatch_worker::{HttpProber, PingWorker, WorkerConfig, WorkerRunner};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "upwatch_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();
    tracing::info!(
        probe_timeout_secs = config.probe_timeout_secs,
        max_attempts = config.max_attempts,
        alerting = config.alert_webhook_url.is_some(),
        "Loaded worker configuration"
    );

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = upwatch_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    upwatch_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    upwatch_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // Dead-letter alerts flow over the event bus; the forwarder pushes
    // them to the configured webhook when one is set.
    let event_bus = Arc::new(EventBus::default());
    let forwarder_handle = config.alert_webhook_url.clone().map(|url| {
        let receiver = event_bus.subscribe();
        tokio::spawn(AlertForwarder::new(url).run(receiver))
    });

    let prober = HttpProber::new(Duration::from_secs(config.probe_timeout_secs))
        .expect("Failed to build probe HTTP client");
    let notifier = DeadLetterNotifier::new(Arc::clone(&event_bus));
    let worker = PingWorker::new(pool.clone(), prober, notifier, &config);
    let runner = WorkerRunner::new(
        pool,
        worker,
        Duration::from_secs(config.poll_interval_secs),
    );

    let cancel = CancellationToken::new();
    let run_cancel = cancel.clone();
    let runner_handle = tokio::spawn(async move {
        runner.run(run_cancel).await;
    });

    shutdown_signal().await;
    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), runner_handle).await;

    // Dropping the last bus sender closes the broadcast channel and
    // signals the forwarder to shut down.
    drop(event_bus);
    if let Some(handle) = forwarder_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the process
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
