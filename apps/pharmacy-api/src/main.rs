//! Pharmacy API server binary.
//!
//! ## Running
//! ```bash
//! # Development (dev JWT secret, ./data/pharmacy.db)
//! cargo run -p pharmacy-api
//!
//! # Production
//! APP_ENV=production JWT_SECRET=... DATABASE_PATH=/var/lib/pharmacy/pharmacy.db \
//!     ADMIN_USERNAME=root ADMIN_PASSWORD=... cargo run --release -p pharmacy-api
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use pharmacy_api::auth::ensure_admin;
use pharmacy_api::{build_router, ApiConfig, AppState};
use pharmacy_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("Starting Pharmacy API v{}", env!("CARGO_PKG_VERSION"));

    let config = ApiConfig::load()?;
    if config.uses_default_secret() {
        warn!("JWT_SECRET is not set; using the development secret");
    }

    info!(
        path = %config.database_path.display(),
        max_connections = config.database_max_connections,
        "Opening database"
    );
    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.database_max_connections),
    )
    .await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(AppState::new(db.clone(), config));
    ensure_admin(&state).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
