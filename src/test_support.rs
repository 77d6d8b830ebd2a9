//! In-memory `Fetch` source for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::api::{ApiError, Fetch};

/// Serves canned bodies by URL and records every request
///
/// Unknown URLs answer with HTTP 404.
#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    bodies: HashMap<String, String>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Fetch for FakeSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());

        match self.bodies.get(url) {
            Some(body) => Ok(body.as_bytes().to_vec()),
            None => Err(ApiError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
