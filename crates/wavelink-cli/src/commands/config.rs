//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use wavelink_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration (secrets masked)
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut config = super::load_config(config_path)?;
            config.webhook.api_key = mask(&config.webhook.api_key);
            config.webhook.signing_secret = mask(&config.webhook.signing_secret);
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{}' is valid", config_path));
                output::print_kv("Server", &config.bind_address());
                output::print_kv(
                    "Outbound buffer",
                    &config.realtime.outbound_buffer_size.to_string(),
                );
                output::print_kv("Channel prefix", &config.webhook.channel_prefix);
                if config.webhook.signing_secret.is_empty() {
                    output::print_warning(
                        "webhook.signing_secret is empty; every webhook will be rejected",
                    );
                }
                if config.webhook.api_key.is_empty() {
                    output::print_warning("webhook.api_key is empty; X-Api-Key headers will not match");
                }
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
    }

    Ok(())
}

/// Mask a secret for display
fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}
