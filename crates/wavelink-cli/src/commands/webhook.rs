//! Webhook tooling.

use clap::{Args, Subcommand};

use crate::output;
use wavelink_core::error::{AppError, ErrorKind};
use wavelink_webhook::SignatureVerifier;

/// Arguments for webhook commands
#[derive(Debug, Args)]
pub struct WebhookArgs {
    /// Webhook subcommand
    #[command(subcommand)]
    pub command: WebhookCommand,
}

/// Webhook subcommands
#[derive(Debug, Subcommand)]
pub enum WebhookCommand {
    /// Print the X-Signature a payload file would need
    Sign {
        /// Payload file, signed byte-for-byte
        #[arg(long)]
        file: String,
    },
}

/// Execute webhook commands
pub async fn execute(args: &WebhookArgs, config_path: &str) -> Result<(), AppError> {
    match &args.command {
        WebhookCommand::Sign { file } => {
            let config = super::load_config(config_path)?;
            if config.webhook.signing_secret.is_empty() {
                return Err(AppError::configuration(
                    "webhook.signing_secret is not configured",
                ));
            }

            let body = tokio::fs::read(file).await.map_err(|e| {
                AppError::with_source(ErrorKind::Internal, format!("Failed to read '{file}'"), e)
            })?;

            let signature = SignatureVerifier::new(&config.webhook.signing_secret).sign(&body);
            output::print_kv("X-Signature", &signature);
        }
    }

    Ok(())
}
