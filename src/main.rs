//! Flashbots relay CLI
//!
//! Command-line access to the relay for operators: inspect stats, cancel
//! private transactions, submit or simulate raw bundles and compute request
//! signatures.

use alloy::primitives::{Bytes, B256};
use clap::{Parser, Subcommand};
use flashbots_relay::calls::{
    BundleStats, BundleStatsV2, CallBundle, CancelPrivateTransaction, SendBundle,
    SendPrivateTransaction, UserStats, UserStatsV2,
};
use flashbots_relay::{RelayClient, RelayConfig, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Talk to the Flashbots relay with signed requests")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file (defaults to FLASHBOTS_* env vars)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Call(CallCommand),

    /// Print the signature header value for a request body
    SignBody {
        /// Exact JSON body as it will be sent
        #[arg(long)]
        body: String,
    },

    /// Show current configuration
    Config,
}

/// Subcommands that talk to the relay
#[derive(Subcommand)]
enum CallCommand {
    /// Searcher reputation and payment totals
    UserStats {
        /// Block number near the chain tip
        #[arg(short, long)]
        block: u64,

        /// Use flashbots_getUserStats instead of the V2 method
        #[arg(long)]
        legacy: bool,
    },

    /// Simulation and builder status of a submitted bundle
    BundleStats {
        /// Bundle hash returned by send-bundle
        #[arg(long)]
        hash: B256,

        /// Target block of the bundle
        #[arg(short, long)]
        block: u64,

        /// Use flashbots_getBundleStats instead of the V2 method
        #[arg(long)]
        legacy: bool,
    },

    /// Submit a bundle of raw signed transactions
    SendBundle {
        /// Raw signed transaction (repeatable, in bundle order)
        #[arg(long = "tx", required = true)]
        txs: Vec<Bytes>,

        /// Target block
        #[arg(short, long)]
        block: u64,
    },

    /// Simulate a bundle of raw signed transactions
    CallBundle {
        /// Raw signed transaction (repeatable, in bundle order)
        #[arg(long = "tx", required = true)]
        txs: Vec<Bytes>,

        /// Target block
        #[arg(short, long)]
        block: u64,

        /// State block to simulate on (defaults to latest)
        #[arg(long)]
        state_block: Option<i64>,

        /// Timestamp of the simulated block (unix seconds)
        #[arg(long)]
        timestamp: Option<u64>,
    },

    /// Send a raw signed transaction privately
    SendPrivateTx {
        /// Raw signed transaction
        #[arg(long)]
        tx: Bytes,

        /// Last block to try inclusion in
        #[arg(long)]
        max_block: Option<u64>,

        /// Enable fast mode
        #[arg(long)]
        fast: bool,
    },

    /// Cancel a private transaction
    Cancel {
        /// Hash of the private transaction
        #[arg(long)]
        hash: B256,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => RelayConfig::from_file(path)?,
        None => RelayConfig::from_env()?,
    };

    match cli.command {
        Commands::SignBody { body } => sign_body(&config, &body),
        Commands::Config => show_config(&config),
        Commands::Call(command) => run_call(&config, command).await,
    }
}

async fn run_call(config: &RelayConfig, command: CallCommand) -> Result<()> {
    let client = RelayClient::from_config(config)?;
    tracing::debug!(endpoint = %client.endpoint(), "Connected to relay");

    match command {
        CallCommand::UserStats { block, legacy } => {
            if legacy {
                print_json(&client.request(UserStats::new(block)).await?)
            } else {
                print_json(&client.request(UserStatsV2::new(block)).await?)
            }
        }
        CallCommand::BundleStats {
            hash,
            block,
            legacy,
        } => {
            if legacy {
                print_json(&client.request(BundleStats::new(hash, block)).await?)
            } else {
                print_json(&client.request(BundleStatsV2::new(hash, block)).await?)
            }
        }
        CallCommand::SendBundle { txs, block } => {
            let bundle_hash = client
                .request(SendBundle {
                    raw_transactions: txs,
                    block_number: block,
                    ..Default::default()
                })
                .await?;
            tracing::info!(%bundle_hash, block, "Bundle submitted");
            print_json(&bundle_hash)
        }
        CallCommand::CallBundle {
            txs,
            block,
            state_block,
            timestamp,
        } => {
            let response = client
                .request(CallBundle {
                    raw_transactions: txs,
                    block_number: block,
                    state_block_number: state_block,
                    timestamp,
                    ..Default::default()
                })
                .await?;
            print_json(&response)
        }
        CallCommand::SendPrivateTx { tx, max_block, fast } => {
            let tx_hash = client
                .request(SendPrivateTransaction {
                    raw_transaction: tx,
                    max_block_number: max_block,
                    fast,
                    ..Default::default()
                })
                .await?;
            tracing::info!(%tx_hash, fast, "Private transaction sent");
            print_json(&tx_hash)
        }
        CallCommand::Cancel { hash } => {
            let cancelled = client
                .request(CancelPrivateTransaction::new(hash))
                .await?;
            print_json(&cancelled)
        }
    }
}

fn sign_body(config: &RelayConfig, body: &str) -> Result<()> {
    let signer = config.signer()?.ok_or_else(|| {
        flashbots_relay::Error::Config("FLASHBOTS_SIGNING_KEY is not set".to_string())
    })?;
    println!("{}", signer.sign(body.as_bytes())?);
    Ok(())
}

fn show_config(config: &RelayConfig) -> Result<()> {
    let signer = config.signer()?.map(|s| s.address().to_checksum(None));
    print_json(&serde_json::json!({
        "endpoint": config.endpoint,
        "auth": config.auth,
        "timeout_ms": config.timeout_ms,
        "signer": signer,
    }))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
