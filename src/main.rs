//! Loanbook Server
//!
//! Serves borrower detail pages and the borrower/loan read API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;

use loanbook_server::config::Config;
use loanbook_server::repository::PgLendingStore;
use loanbook_server::routes::app_router;
use loanbook_server::services::BorrowerDetailService;
use loanbook_server::state::AppState;
use loanbook_server::db;

/// How often expired query results are dropped
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting Loanbook server");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

async fn run(config: Config) -> anyhow::Result<()> {
    let db_pool = db::create_pool(&config).await?;
    if config.run_migrations {
        db::run_migrations(&db_pool).await?;
    }

    let store = Arc::new(PgLendingStore::new(db_pool));
    let detail_service = Arc::new(BorrowerDetailService::new(
        store,
        config.cache_policy(),
        config.render_deadline,
    ));

    let purge_service = detail_service.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = purge_service.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "Purged expired query cache entries");
            }
        }
    });

    let app_state = AppState::new(detail_service, config.display_options());
    let app = app_router(
        app_state,
        config.cors_allowed_origins.as_deref(),
        config.environment.is_production(),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
