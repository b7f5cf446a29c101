//! EventPlanner REST API
//!
//! Main application entry point

use std::sync::Arc;
use tracing::info;

use eventplanner::{
    config::Settings,
    database::{connection, DatabaseService},
    handlers::{build_router, AppState},
    middleware::RateLimiter,
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting {}...", eventplanner::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..connection::DatabaseConfig::default()
    };
    let db_pool = connection::create_pool(&db_config).await?;

    // Run database migrations
    connection::run_migrations(&db_pool).await?;

    // Initialize Redis client for the weather cache
    info!("Connecting to Redis...");
    let redis_client = redis::Client::open(settings.redis.url.clone())?;

    // Initialize database service
    let database_service = DatabaseService::new(db_pool);

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(settings.clone(), &database_service, redis_client)?;

    let state = Arc::new(AppState {
        db: database_service,
        services,
        settings: settings.clone(),
        rate_limiter: RateLimiter::default(),
    });

    let router = build_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("EventPlanner API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("EventPlanner API has been shut down.");

    Ok(())
}

/// Resolve on ctrl-c or SIGTERM
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
        () = ctrl_c => {},
        _ = terminate => {},
    }
}
