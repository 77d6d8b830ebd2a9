//! Interactive session state
//!
//! A `Session` owns everything the REPL mutates: the pagination cursor, the
//! cache-backed fetcher and the pokedex of caught Pokemon. Only the REPL task
//! touches it; the cache inside the fetcher is the one piece shared with the
//! reaper.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::info;

use crate::api::{ApiError, Endpoints, Fetch, LocationArea, Pokemon};
use crate::cache::Cache;
use crate::cursor::{Cursor, Step};
use crate::fetcher::CachedFetcher;

/// A roll below this value catches the Pokemon
pub const CATCH_THRESHOLD: u32 = 50;

/// A Pokemon in the pokedex
#[derive(Debug, Clone, PartialEq)]
pub struct CaughtPokemon {
    pub pokemon: Pokemon,
    pub caught_at: DateTime<Local>,
}

/// Result of a catch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchOutcome {
    pub name: String,
    pub caught: bool,
}

/// Mutable state of one interactive session
#[derive(Debug)]
pub struct Session<S> {
    fetcher: CachedFetcher<S>,
    endpoints: Endpoints,
    cursor: Cursor,
    pokedex: BTreeMap<String, CaughtPokemon>,
    rng: StdRng,
}

impl<S: Fetch> Session<S> {
    pub fn new(source: S, cache: Cache, endpoints: Endpoints, rng: StdRng) -> Self {
        let cursor = Cursor::new(endpoints.first_page());
        Self {
            fetcher: CachedFetcher::new(source, cache),
            endpoints,
            cursor,
            pokedex: BTreeMap::new(),
            rng,
        }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cache(&self) -> &Cache {
        self.fetcher.cache()
    }

    pub fn fetcher(&self) -> &CachedFetcher<S> {
        &self.fetcher
    }

    /// Moves the cursor one page forward
    pub async fn next_page(&mut self) -> Result<Step, ApiError> {
        self.cursor.advance(&self.fetcher).await
    }

    /// Moves the cursor one page back
    pub async fn previous_page(&mut self) -> Result<Step, ApiError> {
        self.cursor.retreat(&self.fetcher).await
    }

    /// Names of the Pokemon that can be encountered in `area`
    pub async fn explore(&self, area: &str) -> Result<Vec<String>, ApiError> {
        let area: LocationArea = self.fetcher.get(&self.endpoints.location_area(area)).await?;
        Ok(area.pokemon_names())
    }

    /// Throws a pokeball at `name`
    ///
    /// The chance of success falls with the Pokemon's base experience. A
    /// successful catch adds (or replaces) the pokedex entry.
    pub async fn catch(&mut self, name: &str) -> Result<CatchOutcome, ApiError> {
        let pokemon: Pokemon = self.fetcher.get(&self.endpoints.pokemon(name)).await?;
        let caught = roll_catch(&mut self.rng, pokemon.base_experience);
        let outcome = CatchOutcome {
            name: pokemon.name.clone(),
            caught,
        };

        if caught {
            info!(pokemon = %pokemon.name, "Caught");
            self.pokedex.insert(
                pokemon.name.clone(),
                CaughtPokemon {
                    pokemon,
                    caught_at: Local::now(),
                },
            );
        }

        Ok(outcome)
    }

    /// Details for `name`, taken from the pokedex when caught, otherwise fetched
    pub async fn inspect(&self, name: &str) -> Result<Pokemon, ApiError> {
        if let Some(entry) = self.pokedex.get(name) {
            return Ok(entry.pokemon.clone());
        }
        self.fetcher.get(&self.endpoints.pokemon(name)).await
    }

    /// Caught Pokemon in name order
    pub fn pokedex(&self) -> impl Iterator<Item = &CaughtPokemon> {
        self.pokedex.values()
    }

    pub fn has_caught(&self, name: &str) -> bool {
        self.pokedex.contains_key(name)
    }
}

/// Rolls in `0..max(base_experience, 1)`; below `CATCH_THRESHOLD` is a catch
fn roll_catch<R: Rng>(rng: &mut R, base_experience: Option<u32>) -> bool {
    let difficulty = base_experience.unwrap_or(0).max(1);
    rng.gen_range(0..difficulty) < CATCH_THRESHOLD
}
