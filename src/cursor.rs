//! Pagination cursor for browsing the location-area collection
//!
//! The cursor holds the `next` and `previous` page URLs taken from the last
//! page it loaded. It moves exactly one page per call, and only replaces its
//! tokens after a page has been fetched and decoded successfully.

use tracing::debug;

use crate::api::{ApiError, Fetch, Page};
use crate::fetcher::CachedFetcher;

/// Where the cursor currently sits in the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// No page has been loaded yet
    Unstarted,
    /// Loaded page has no previous page
    FirstPage,
    /// Loaded page has both neighbours
    MiddlePage,
    /// Loaded page has no next page
    LastPage,
}

/// The edge of the collection a move ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    FirstPage,
    LastPage,
}

impl Boundary {
    /// User-facing message for this boundary
    pub fn message(self) -> &'static str {
        match self {
            Boundary::FirstPage => "you're on the first page",
            Boundary::LastPage => "you're on the last page",
        }
    }
}

/// Outcome of a cursor move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A page was loaded; item names in the order the API returned them
    Page(Vec<String>),
    /// Nothing to load in that direction; the cursor is unchanged
    Boundary(Boundary),
}

/// Forward/backward page tokens for a paginated collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    first_page: String,
    next: Option<String>,
    previous: Option<String>,
    started: bool,
}

impl Cursor {
    /// Creates a cursor that starts browsing at `first_page`
    pub fn new(first_page: impl Into<String>) -> Self {
        Self {
            first_page: first_page.into(),
            next: None,
            previous: None,
            started: false,
        }
    }

    /// URL of the following page, if any
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// URL of the preceding page, if any
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn position(&self) -> Position {
        if !self.started {
            return Position::Unstarted;
        }
        match (&self.previous, &self.next) {
            (_, None) => Position::LastPage,
            (None, Some(_)) => Position::FirstPage,
            (Some(_), Some(_)) => Position::MiddlePage,
        }
    }

    /// Loads the next page, or the first page if nothing has been loaded yet
    pub async fn advance<S: Fetch>(
        &mut self,
        fetcher: &CachedFetcher<S>,
    ) -> Result<Step, ApiError> {
        let target = if !self.started {
            self.first_page.clone()
        } else {
            match &self.next {
                Some(next) => next.clone(),
                None => return Ok(Step::Boundary(Boundary::LastPage)),
            }
        };
        self.load(fetcher, &target).await
    }

    /// Loads the previous page
    pub async fn retreat<S: Fetch>(
        &mut self,
        fetcher: &CachedFetcher<S>,
    ) -> Result<Step, ApiError> {
        let target = match &self.previous {
            Some(previous) => previous.clone(),
            None => return Ok(Step::Boundary(Boundary::FirstPage)),
        };
        self.load(fetcher, &target).await
    }

    async fn load<S: Fetch>(
        &mut self,
        fetcher: &CachedFetcher<S>,
        token: &str,
    ) -> Result<Step, ApiError> {
        let page = fetcher.page(token).await?;
        Ok(Step::Page(self.apply(page)))
    }

    /// Takes the neighbour tokens from `page`, overwriting both even when absent
    pub fn apply(&mut self, page: Page) -> Vec<String> {
        let names = page.names();
        self.next = page.next;
        self.previous = page.previous;
        self.started = true;
        debug!(next = ?self.next, previous = ?self.previous, "Cursor moved");
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, CacheConfig};
    use crate::test_support::FakeSource;

    const PAGE_1: &str = "https://pokeapi.co/api/v2/location-area/";
    const PAGE_2: &str = "https://pokeapi.co/api/v2/location-area/?offset=2&limit=2";
    const PAGE_3: &str = "https://pokeapi.co/api/v2/location-area/?offset=4&limit=2";

    fn page_json(next: Option<&str>, previous: Option<&str>, names: &[&str]) -> String {
        let results: Vec<_> = names
            .iter()
            .map(|n| serde_json::json!({ "name": n, "url": format!("https://pokeapi.co/{}", n) }))
            .collect();
        serde_json::json!({ "count": 6, "next": next, "previous": previous, "results": results })
            .to_string()
    }

    fn three_pages() -> FakeSource {
        FakeSource::new()
            .with(PAGE_1, &page_json(Some(PAGE_2), None, &["a", "b"]))
            .with(PAGE_2, &page_json(Some(PAGE_3), Some(PAGE_1), &["c", "d"]))
            .with(PAGE_3, &page_json(None, Some(PAGE_2), &["e", "f"]))
    }

    fn fetcher(source: FakeSource) -> CachedFetcher<FakeSource> {
        CachedFetcher::new(source, Cache::new(CacheConfig::default()))
    }

    fn names(items: &[&str]) -> Step {
        Step::Page(items.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_first_advance_loads_first_page() {
        let fetcher = fetcher(three_pages());
        let mut cursor = Cursor::new(PAGE_1);
        assert_eq!(cursor.position(), Position::Unstarted);

        let step = cursor.advance(&fetcher).await.unwrap();

        assert_eq!(step, names(&["a", "b"]));
        assert_eq!(cursor.next(), Some(PAGE_2));
        assert_eq!(cursor.previous(), None);
        assert_eq!(cursor.position(), Position::FirstPage);
        assert_eq!(fetcher.source().requested(), vec![PAGE_1]);
    }

    #[tokio::test]
    async fn test_advance_walks_to_last_page_then_stops() {
        let fetcher = fetcher(three_pages());
        let mut cursor = Cursor::new(PAGE_1);

        cursor.advance(&fetcher).await.unwrap();
        assert_eq!(cursor.advance(&fetcher).await.unwrap(), names(&["c", "d"]));
        assert_eq!(cursor.position(), Position::MiddlePage);
        assert_eq!(cursor.advance(&fetcher).await.unwrap(), names(&["e", "f"]));
        assert_eq!(cursor.position(), Position::LastPage);

        let before = cursor.clone();
        let step = cursor.advance(&fetcher).await.unwrap();

        assert_eq!(step, Step::Boundary(Boundary::LastPage));
        assert_eq!(cursor, before);
        assert_eq!(fetcher.source().calls(), 3);
    }

    #[tokio::test]
    async fn test_retreat_without_previous_is_boundary_without_fetch() {
        let fetcher = fetcher(three_pages());
        let mut cursor = Cursor::new(PAGE_1);

        let step = cursor.retreat(&fetcher).await.unwrap();

        assert_eq!(step, Step::Boundary(Boundary::FirstPage));
        assert_eq!(fetcher.source().calls(), 0);
        assert_eq!(cursor.position(), Position::Unstarted);
    }

    #[tokio::test]
    async fn test_retreat_from_first_page_is_boundary() {
        let fetcher = fetcher(three_pages());
        let mut cursor = Cursor::new(PAGE_1);
        cursor.advance(&fetcher).await.unwrap();

        let step = cursor.retreat(&fetcher).await.unwrap();

        assert_eq!(step, Step::Boundary(Boundary::FirstPage));
        assert_eq!(fetcher.source().calls(), 1);
    }

    #[tokio::test]
    async fn test_retreat_is_served_from_cache() {
        let fetcher = fetcher(three_pages());
        let mut cursor = Cursor::new(PAGE_1);
        cursor.advance(&fetcher).await.unwrap();
        cursor.advance(&fetcher).await.unwrap();

        let step = cursor.retreat(&fetcher).await.unwrap();

        assert_eq!(step, names(&["a", "b"]));
        assert_eq!(cursor.next(), Some(PAGE_2));
        assert_eq!(cursor.previous(), None);
        assert_eq!(fetcher.source().calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_advance_leaves_tokens_unchanged() {
        let source = FakeSource::new()
            .with(PAGE_1, &page_json(Some(PAGE_2), None, &["a", "b"]));
        let fetcher = fetcher(source);
        let mut cursor = Cursor::new(PAGE_1);
        cursor.advance(&fetcher).await.unwrap();
        let before = cursor.clone();

        let result = cursor.advance(&fetcher).await;

        assert!(result.is_err());
        assert_eq!(cursor, before);
    }

    #[tokio::test]
    async fn test_failed_first_advance_stays_unstarted() {
        let fetcher = fetcher(FakeSource::new().with(PAGE_1, "garbage"));
        let mut cursor = Cursor::new(PAGE_1);

        let result = cursor.advance(&fetcher).await;

        assert!(matches!(result, Err(ApiError::Decode(_))));
        assert_eq!(cursor.position(), Position::Unstarted);
    }

    #[test]
    fn test_apply_overwrites_tokens_with_absent_values() {
        let mut cursor = Cursor::new(PAGE_1);
        cursor.apply(Page {
            count: None,
            next: Some(PAGE_3.to_string()),
            previous: Some(PAGE_1.to_string()),
            results: vec![],
        });

        cursor.apply(Page {
            count: None,
            next: None,
            previous: None,
            results: vec![],
        });

        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.previous(), None);
        assert_eq!(cursor.position(), Position::LastPage);
    }

    #[test]
    fn test_boundary_messages() {
        assert_eq!(Boundary::FirstPage.message(), "you're on the first page");
        assert_eq!(Boundary::LastPage.message(), "you're on the last page");
    }
}
