//! Cache module for keeping API responses in memory
//!
//! This module provides an expiring cache keyed by request URL. Each entry is
//! stamped on insertion, and a background reaper task drops entries that have
//! outlived the configured TTL. A miss simply means "fetch again".

mod reaper;
mod store;

pub use store::{default_reap_interval, Cache, CacheConfig, DEFAULT_TTL};
