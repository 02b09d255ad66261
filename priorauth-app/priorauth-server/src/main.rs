use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, Method, StatusCode};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use priorauth_api::{router, AppState};
use priorauth_infrastructure::{run_migrations, Database};
use priorauth_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (reads .env first)
    let config = AppConfig::load()?;

    // Initialize telemetry
    priorauth_shared::telemetry::init_telemetry(&config.log)?;

    info!(env = %config.app.env, "{} starting...", config.app.name);

    // Schema first, over the direct connection
    if config.database.run_migrations {
        if let Err(e) = run_migrations(&config.database).await {
            error!("Failed to apply migrations: {}", e);
            return Err(e.into());
        }
    }

    // Connect to Database
    info!("Connecting to database...");
    let db = Database::connect(&config.database).await?;
    info!("Database connection established.");

    // Create App State
    let state = AppState {
        db: db.clone(),
        config: config.clone(),
    };

    // Build router
    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(30),
            ))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
            ),
    );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
