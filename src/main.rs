//! SIXKUL server
//!
//! Main application entry point

use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

use sixkul::{
    config::Settings,
    database::{connection::create_pool, run_migrations, DatabaseService},
    handlers::{create_router, AppState},
    middleware::{LoginRateLimiter, RateLimitConfig},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging. The guard must stay alive until shutdown.
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting SIXKUL server...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = sixkul::database::DatabaseConfig::from_settings(&settings.database);
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    run_migrations(&db_pool).await?;

    // Initialize database service and business services
    let database_service = DatabaseService::new(db_pool);
    let services = ServiceFactory::new(settings.clone(), database_service.clone())?;

    let login_limiter = LoginRateLimiter::new(RateLimitConfig {
        max_requests: settings.auth.login_max_attempts,
        window_duration: Duration::from_secs(settings.auth.login_window_seconds),
        burst_allowance: 0,
    });

    // Periodic sweep of stale rate limit entries.
    let sweeper = login_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            sweeper.cleanup_old_entries();
        }
    });

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState {
        services,
        db: database_service,
        settings,
        login_limiter,
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, "SIXKUL is ready");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("SIXKUL server has been shut down.");
    Ok(())
}

/// Resolve when the process receives ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
