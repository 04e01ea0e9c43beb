//! Signing request CLI
//!
//! Command-line interface for building, inspecting and decoding signing
//! requests carried by ledger transactions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use signreq_lib::codec::PayloadKind;
use signreq_lib::config::ClientConfig;
use signreq_lib::ledger::Network;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "signreq")]
#[command(about = "Build and decode signing requests carried in ledger data entries", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Ledger server URL (can also be set via SIGNREQ_SERVER_URL env var)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Network: public, testnet or a passphrase (can also be set via SIGNREQ_NETWORK env var)
    #[arg(long, global = true)]
    network: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a hex payload into protocol data entries
    Encode {
        /// Payload kind (op or tx)
        #[arg(short, long, default_value = "op")]
        kind: PayloadKind,

        /// Fixed correlation id instead of a random one
        #[arg(long)]
        id: Option<String>,

        /// Payload bytes as hex
        payload: String,
    },

    /// Group a carrier's entries offline, without trust checks
    Inspect {
        /// Carrier envelope as hex
        envelope: String,
    },

    /// Decode a carrier, validating the sender's home domain
    Decode {
        /// Carrier envelope as hex
        envelope: String,

        /// Accept the carrier without checking the sender's domain
        #[arg(long)]
        skip_trust_validation: bool,
    },

    /// Build a carrier asking another account to sign a payload
    Request {
        /// Signer secret seed as hex
        #[arg(long)]
        secret: String,

        /// Destination account id or name*domain address
        #[arg(long)]
        to: String,

        /// Payload kind (op or tx)
        #[arg(short, long, default_value = "op")]
        kind: PayloadKind,

        /// Payload bytes as hex
        payload: String,

        /// Submit the carrier after building it
        #[arg(long)]
        submit: bool,
    },
}

/// Environment configuration with command-line overrides applied.
fn load_config(server: Option<String>, network: Option<String>) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(server) = server {
        config = config.with_server_url(server);
    }
    if let Some(network) = network {
        config = config.with_network(Network::from(network.as_str()));
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("signreq=debug,signreq_lib=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("signreq=info,signreq_lib=warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let config = load_config(cli.server, cli.network);

    // Dispatch commands
    match cli.command {
        Commands::Encode { kind, id, payload } => {
            commands::encode::run(kind, &payload, id.as_deref(), cli.verbose)?;
        }
        Commands::Inspect { envelope } => {
            commands::inspect::run(&envelope, cli.verbose)?;
        }
        Commands::Decode {
            envelope,
            skip_trust_validation,
        } => {
            commands::decode::run(config, &envelope, skip_trust_validation, cli.verbose).await?;
        }
        Commands::Request {
            secret,
            to,
            kind,
            payload,
            submit,
        } => {
            let args = commands::request::RequestArgs {
                secret_hex: &secret,
                to: &to,
                kind,
                payload_hex: &payload,
                submit,
            };
            commands::request::run(config, args, cli.verbose).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_encode() {
        let cli = Cli::try_parse_from(["signreq", "encode", "--kind", "tx", "abcd"]).unwrap();
        match cli.command {
            Commands::Encode { kind, payload, id } => {
                assert_eq!(kind, PayloadKind::Transaction);
                assert_eq!(payload, "abcd");
                assert!(id.is_none());
            }
            _ => panic!("expected encode"),
        }
        assert!(Cli::try_parse_from(["signreq", "encode", "--kind", "xx", "ab"]).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let config = load_config(
            Some("http://localhost:8000".into()),
            Some("public".into()),
        );
        assert_eq!(config.server_url, "http://localhost:8000");
        assert_eq!(config.network, Network::Public);
    }

    #[test]
    fn test_network_override_accepts_passphrase() {
        let config = load_config(None, Some("Private Ledger ; 2026".into()));
        assert_eq!(
            config.network,
            Network::Custom("Private Ledger ; 2026".into())
        );
    }
}
