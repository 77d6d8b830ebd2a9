//! Command-line interface parsing for the Pokedex REPL
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a validated `StartupConfig`: the API base URL, cache timing, request
//! timeout and an optional seed for catch rolls.

use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::api::{ApiError, Endpoints, DEFAULT_BASE_URL};
use crate::cache::CacheConfig;

/// Default HTTP request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The cache TTL was zero
    #[error("Invalid cache TTL: must be at least 1 second")]
    ZeroTtl,

    /// The reap interval was zero
    #[error("Invalid reap interval: must be at least 1 millisecond")]
    ZeroReapInterval,

    /// The request timeout was zero
    #[error("Invalid request timeout: must be at least 1 second")]
    ZeroTimeout,

    /// The base URL could not be used to build API URLs
    #[error("{0}")]
    InvalidBaseUrl(ApiError),
}

/// Pokedex - browse PokeAPI location areas and catch Pokemon
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse PokeAPI location areas and catch Pokemon from a REPL")]
#[command(version)]
pub struct Cli {
    /// Base URL of the PokeAPI v2 service
    #[arg(long, env = "POKEDEX_BASE_URL", default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// How long API responses stay cached, in seconds
    #[arg(long, env = "POKEDEX_CACHE_TTL", default_value_t = 300, value_name = "SECS")]
    pub cache_ttl: u64,

    /// How often expired cache entries are removed, in milliseconds
    ///
    /// Defaults to a fifth of the TTL, capped at 1000.
    #[arg(long, env = "POKEDEX_REAP_INTERVAL", value_name = "MILLIS")]
    pub reap_interval: Option<u64>,

    /// HTTP request timeout, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECS")]
    pub timeout: u64,

    /// Seed for catch rolls, for reproducible sessions
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Where API requests are sent
    pub endpoints: Endpoints,
    /// Cache TTL and reap interval
    pub cache: CacheConfig,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Fixed seed for catch rolls, if any
    pub seed: Option<u64>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            cache: CacheConfig::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            seed: None,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if a duration is zero or the base URL is unusable
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.cache_ttl == 0 {
            return Err(CliError::ZeroTtl);
        }
        if cli.timeout == 0 {
            return Err(CliError::ZeroTimeout);
        }

        let mut cache = CacheConfig::new(Duration::from_secs(cli.cache_ttl));
        match cli.reap_interval {
            Some(0) => return Err(CliError::ZeroReapInterval),
            Some(millis) => cache = cache.with_reap_interval(Duration::from_millis(millis)),
            None => {}
        }

        let endpoints = Endpoints::parse(&cli.base_url).map_err(CliError::InvalidBaseUrl)?;

        Ok(StartupConfig {
            endpoints,
            cache,
            request_timeout: Duration::from_secs(cli.timeout),
            seed: cli.seed,
        })
    }

    /// RNG for catch rolls: seeded when a seed was given, otherwise from entropy
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
