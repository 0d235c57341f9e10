//! Handshake commands against a running server.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::client::ServerClient;
use crate::output::{self, OutputFormat};
use wavelink_core::error::AppError;

/// Arguments for handshake commands
#[derive(Debug, Args)]
pub struct HandshakeArgs {
    /// Handshake subcommand
    #[command(subcommand)]
    pub command: HandshakeCommand,
}

/// Handshake subcommands
#[derive(Debug, Subcommand)]
pub enum HandshakeCommand {
    /// Send a handshake
    Send {
        /// Server base URL
        #[arg(long, default_value = "http://localhost:8080")]
        server: String,
        /// Sender identity
        #[arg(long)]
        uid: String,
        /// Handshake kind (wave, high_five, fist_bump or any custom tag)
        #[arg(long)]
        kind: String,
        /// Target identity; omit to broadcast
        #[arg(long)]
        to: Option<String>,
        /// Optional note
        #[arg(long)]
        message: Option<String>,
    },
    /// List connected identities
    Active {
        /// Server base URL
        #[arg(long, default_value = "http://localhost:8080")]
        server: String,
    },
}

/// Table row for active identities
#[derive(Debug, Serialize, Tabled)]
struct ActiveRow {
    #[tabled(rename = "Identity")]
    identity: String,
}

/// Execute handshake commands
pub async fn execute(args: &HandshakeArgs, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        HandshakeCommand::Send {
            server,
            uid,
            kind,
            to,
            message,
        } => {
            let reply = ServerClient::new(server)
                .send_handshake(uid, kind, to.as_deref(), message.as_deref())
                .await?;
            output::print_success(&reply);
        }
        HandshakeCommand::Active { server } => {
            let rows: Vec<ActiveRow> = ServerClient::new(server)
                .active_users()
                .await?
                .into_iter()
                .map(|identity| ActiveRow { identity })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
