//! Cache-first fetching of API records
//!
//! Every lookup goes to the cache first. On a miss the body is fetched,
//! decoded, and only then stored under its URL, so the cache never holds a
//! payload that failed to decode when it arrived.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ApiError, Fetch, Page};
use crate::cache::Cache;

/// Fetches records through an expiring cache
#[derive(Debug, Clone)]
pub struct CachedFetcher<S> {
    source: S,
    cache: Cache,
}

impl<S: Fetch> CachedFetcher<S> {
    pub fn new(source: S, cache: Cache) -> Self {
        Self { source, cache }
    }

    /// The cache consulted before every fetch
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// The underlying source used on cache misses
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the record at `url`, fetching and caching it on a miss
    ///
    /// A cached body that fails to decode is reported as `ApiError::Decode`
    /// and left in place; it is neither refetched nor evicted.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        if let Some(body) = self.cache.get(url) {
            debug!(url, "Cache hit");
            return Ok(serde_json::from_slice(&body)?);
        }

        debug!(url, "Cache miss");
        let body = self.source.fetch(url).await?;
        let record = serde_json::from_slice(&body)?;
        self.cache.add(url, body);
        Ok(record)
    }

    /// Returns the collection page identified by `token`
    pub async fn page(&self, token: &str) -> Result<Page, ApiError> {
        self.get(token).await
    }
}
