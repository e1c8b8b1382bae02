//! In-memory fetcher for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use super::{FetchError, FetchOutcome, Fetcher, normalize_source};

/// Returns canned outcomes keyed by normalized path and records every
/// request. Unknown paths are `NotFound`.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    outcomes: HashMap<String, FetchOutcome>,
    requests: RefCell<Vec<String>>,
    unavailable: bool,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetcher whose every call fails with [`FetchError`].
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, source: &str, outcome: FetchOutcome) -> Self {
        self.outcomes
            .insert(normalize_source(source).into_owned(), outcome);
        self
    }

    pub fn with_text(self, source: &str, text: &str) -> Self {
        self.with(source, FetchOutcome::from_body(text.to_string()))
    }

    /// Normalized paths requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for MemoryFetcher {
    async fn fetch(&self, source: &str) -> Result<FetchOutcome, FetchError> {
        let path = normalize_source(source).into_owned();
        self.requests.borrow_mut().push(path.clone());
        if self.unavailable {
            return Err(FetchError::RootUnavailable(PathBuf::from("memory")));
        }
        Ok(self
            .outcomes
            .get(&path)
            .cloned()
            .unwrap_or(FetchOutcome::NotFound))
    }
}
