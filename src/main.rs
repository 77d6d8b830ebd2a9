//! Pokedex CLI - browse PokeAPI location areas from the terminal
//!
//! Reads commands from stdin, prints results to stdout and logs to stderr.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pokedex::api::PokeApiClient;
use pokedex::cache::Cache;
use pokedex::cli::{Cli, StartupConfig};
use pokedex::commands::CommandTable;
use pokedex::repl::Repl;
use pokedex::session::Session;

/// Sets up logging to stderr, filtered by `RUST_LOG` (default: warnings only)
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pokedex=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    info!(
        base_url = %config.endpoints.base(),
        ttl = ?config.cache.ttl,
        reap_interval = ?config.cache.reap_interval,
        "Starting Pokedex"
    );

    let client = match PokeApiClient::with_timeout(config.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cache = Cache::new(config.cache);
    let session = Session::new(client, cache.clone(), config.endpoints.clone(), config.rng());
    let mut repl = Repl::new(session, CommandTable::standard());

    let input = BufReader::new(tokio::io::stdin());
    let result = repl.run(input, &mut io::stdout()).await;
    cache.shutdown().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("reading standard input: {}", e);
            ExitCode::FAILURE
        }
    }
}
