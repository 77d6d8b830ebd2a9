//! PokeAPI wire types and client
//!
//! This module contains the records decoded from PokeAPI responses, the
//! `Fetch` trait the rest of the crate uses to reach the network, and the
//! reqwest-backed `PokeApiClient`.

pub mod client;
pub mod endpoints;

pub use client::{ApiError, PokeApiClient};
pub use endpoints::{Endpoints, DEFAULT_BASE_URL};

use std::future::Future;

use serde::{Deserialize, Deserializer, Serialize};

/// A source of raw response bodies keyed by URL
///
/// `PokeApiClient` performs real HTTP requests; tests substitute in-memory
/// sources to count and control fetches.
pub trait Fetch {
    /// Performs one GET against `url` and returns the response body
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ApiError>>;
}

/// A `{ name, url }` reference to another API resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of a cursor-paginated collection
///
/// `next` and `previous` are full URLs of the neighbouring pages. JSON `null`,
/// a missing field and an empty string all decode to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Total number of items in the collection
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default, deserialize_with = "page_token")]
    pub next: Option<String>,
    #[serde(default, deserialize_with = "page_token")]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

impl Page {
    /// Names of the items on this page, in the order received
    pub fn names(&self) -> Vec<String> {
        self.results.iter().map(|r| r.name.clone()).collect()
    }
}

fn page_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(token.filter(|t| !t.is_empty()))
}

/// A location area and the Pokemon that can be encountered in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationArea {
    pub name: String,
    #[serde(default)]
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

impl LocationArea {
    /// Names of the Pokemon found in this area
    pub fn pokemon_names(&self) -> Vec<String> {
        self.pokemon_encounters
            .iter()
            .map(|e| e.pokemon.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

/// A Pokemon species record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    /// Experience gained by defeating it; also drives the catch difficulty
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonType {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}
