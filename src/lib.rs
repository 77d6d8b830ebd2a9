//! Pokedex CLI Library
//!
//! An interactive explorer for the PokeAPI location-area catalog. Responses are
//! kept in an expiring in-memory cache, and a pagination cursor drives
//! forward/backward browsing. The modules are exposed for the binary and for
//! integration tests.

pub mod api;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod cursor;
pub mod fetcher;
pub mod repl;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;
