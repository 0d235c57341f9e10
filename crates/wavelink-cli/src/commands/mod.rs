//! CLI command definitions and dispatch.

pub mod config;
pub mod handshake;
pub mod serve;
pub mod webhook;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use wavelink_core::config::AppConfig;
use wavelink_core::error::AppError;

/// Wavelink — real-time handshake hub and chat webhook gate
#[derive(Debug, Parser)]
#[command(name = "wavelink", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Wavelink server
    Serve(serve::ServeArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Webhook tooling
    Webhook(webhook::WebhookArgs),
    /// Talk to a running server's handshake endpoints
    Handshake(handshake::HandshakeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
            Commands::Webhook(args) => webhook::execute(args, &self.config).await,
            Commands::Handshake(args) => handshake::execute(args, self.format).await,
        }
    }
}

/// Helper: load configuration from file, overlaid by `WAVELINK_ENV` and
/// `WAVELINK__*` variables.
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("WAVELINK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(config_path, &env)
}
