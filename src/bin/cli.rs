//! caskkv CLI
//!
//! Command-line interface over a local caskkv data file.

use std::process::ExitCode;

use caskkv::{Config, Store, SyncStrategy};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// caskkv CLI
#[derive(Parser, Debug)]
#[command(name = "caskkv-cli")]
#[command(about = "CLI for the caskkv key-value store")]
#[command(version)]
struct Args {
    /// Data file
    #[arg(short, long, default_value = "./caskkv.db")]
    file: String,

    /// fsync after every set
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// List all live keys
    Keys,

    /// Show replay statistics for the data file
    Stats,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,caskkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let sync_strategy = if args.sync {
        SyncStrategy::EveryWrite
    } else {
        SyncStrategy::Never
    };
    let config = Config::builder()
        .path(&args.file)
        .sync_strategy(sync_strategy)
        .build();

    let store = match Store::open_with_config(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to open {}: {}", args.file, e);
            return ExitCode::FAILURE;
        }
    };

    let code = match run(&store, args.command) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            ExitCode::FAILURE
        }
    };

    if let Err(e) = store.close() {
        tracing::error!("Failed to close {}: {}", args.file, e);
        return ExitCode::FAILURE;
    }

    code
}

fn run(store: &Store, command: Commands) -> caskkv::Result<ExitCode> {
    match command {
        Commands::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("not found");
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Set { key, value } => {
            store.set(&key, &value)?;
            println!("OK");
        }
        Commands::Keys => {
            for key in store.keys()? {
                println!("{}", key);
            }
        }
        Commands::Stats => {
            let stats = store.replay_stats();
            println!("records:   {}", stats.records_replayed);
            println!("live keys: {}", stats.live_keys);
            println!("bytes:     {}", stats.bytes_replayed);
        }
    }

    Ok(ExitCode::SUCCESS)
}
