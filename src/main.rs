//! Wavelink Server — real-time handshake hub and chat webhook gate
//!
//! Main entry point: loads configuration, initializes logging and runs the
//! HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use wavelink_core::config::AppConfig;
use wavelink_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("WAVELINK_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("WAVELINK_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load_from(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Wavelink v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind = %config.bind_address(),
        webhook = ?config.webhook,
        "Configuration loaded"
    );

    wavelink_api::run_server(config).await
}
