//! URL construction for PokeAPI resources

use url::Url;

use super::ApiError;

/// Base URL for PokeAPI v2
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/";

/// Builds resource URLs relative to an API base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        }
    }
}

impl Endpoints {
    /// Parses and validates an API base URL
    ///
    /// Only http(s) URLs are accepted. A missing trailing slash is tolerated.
    pub fn parse(base: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{base}: expected an http(s) base URL"
            )));
        }
        Ok(Self { base })
    }

    /// The API base URL
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of the first page of the location-area collection
    pub fn first_page(&self) -> String {
        self.build(&["location-area", ""])
    }

    /// URL of a single location area
    pub fn location_area(&self, name: &str) -> String {
        self.build(&["location-area", name])
    }

    /// URL of a single Pokemon
    pub fn pokemon(&self, name: &str) -> String {
        self.build(&["pokemon", name])
    }

    fn build(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        // parse() rejects cannot-be-a-base URLs, so this always succeeds
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }
}
