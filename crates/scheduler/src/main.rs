use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upwatch_scheduler::{SchedulerConfig, SchedulerCycle, SchedulerRunner};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "upwatch_scheduler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SchedulerConfig::from_env();
    tracing::info!(
        scan_interval_secs = config.scan_interval_secs,
        grace_period_secs = config.grace_period_secs,
        "Loaded scheduler configuration"
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

    let interval = Duration::from_secs(config.scan_interval_secs);
    let runner = SchedulerRunner::new(SchedulerCycle::new(pool, &config), interval);

    let cancel = CancellationToken::new();
    let run_cancel = cancel.clone();
    let runner_handle = tokio::spawn(async move {
        runner.run(run_cancel).await;
    });

    shutdown_signal().await;
    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), runner_handle).await;
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
