//! Hospital Billing - API Server Binary
//!
//! Starts the HTTP API server for the hospital billing system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin billing-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin billing-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 86400)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_SEED_ADMIN_EMAIL` / `API_SEED_ADMIN_PASSWORD` - bootstrap website head account

use interface_api::{auth, config::ApiConfig, create_router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_access::{normalize_email, User};
use infra_db::{create_pool_from_url, run_migrations, UserRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Hospital Billing API Server"
    );

    tracing::info!("Connecting to database...");
    let pool = create_pool_from_url(&config.database_url).await?;

    tracing::info!("Running database migrations...");
    run_migrations(&pool).await?;

    seed_admin(&pool, &config).await?;

    let app = create_router(pool, config.clone());

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Ensures the bootstrap website head account exists.
///
/// Runs on every startup; a no-op once the account is in place, so the
/// system is never left without an active administrator.
async fn seed_admin(
    pool: &sqlx::PgPool,
    config: &ApiConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = UserRepository::new(pool.clone());
    let email = normalize_email(&config.seed_admin_email);

    if repo.find_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let hash = auth::hash_password(&config.seed_admin_password)?;
    let admin = User::admin("Website Head", &email, hash);
    repo.create(&admin).await?;

    tracing::info!(email = %email, "seeded website head account");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM) so in-flight requests
/// can complete before the process exits
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
