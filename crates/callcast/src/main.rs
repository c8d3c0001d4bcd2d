// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callcast - outbound calling campaigns and call analytics.
//!
//! This is the binary entry point for the Callcast service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod campaign;
mod serve;
mod services;
mod shutdown;

use std::path::PathBuf;

use callcast_core::CallcastError;
use clap::{Parser, Subcommand};

/// Callcast - outbound calling campaigns and call analytics.
#[derive(Parser, Debug)]
#[command(name = "callcast", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway (webhooks and admin API).
    Serve,
    /// Create a campaign from a CSV file and dispatch its calls.
    Campaign(campaign::CampaignArgs),
    /// Print the effective configuration with credentials masked.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => callcast_config::load_and_validate_path(path),
        None => callcast_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            callcast_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => {
            serve::init_tracing(&config.service.log_level);
            serve::run_serve(config).await
        }
        Some(Commands::Campaign(args)) => {
            serve::init_tracing(&config.service.log_level);
            campaign::run_campaign(config, args).await
        }
        Some(Commands::Config) => callcast_config::to_redacted_toml(&config)
            .map(|rendered| print!("{rendered}"))
            .map_err(|e| CallcastError::Config(format!("cannot render configuration: {e}"))),
        None => {
            println!("callcast: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
