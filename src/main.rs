use share_gate::{
    app_state::{AppState, AppStateError},
    config::{self, AppConfig},
    database::{self, initialize_database},
    logging::{init_logging, LoggingError},
    server::build_router,
};
use std::net::SocketAddr;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database initialization error: {0}")]
    DatabaseInit(#[from] database::DatabaseError),
    #[error("Application state error: {0}")]
    State(#[from] AppStateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging first
    init_logging()?;
    info!("Starting share download gate");

    let config = AppConfig::load()?;
    info!(
        failure_delay_ms = config.security.failure_delay_ms,
        pepper_configured = config.security.password_pepper.is_some(),
        "Configuration loaded successfully"
    );

    let db_pool = initialize_database(&config).await?;

    let addr = SocketAddr::new(config.server.bind_addr.parse()?, config.server.port);

    let app_state = AppState::new(db_pool, &config).await?;
    let app = build_router(app_state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
