//! Sources retrieved over HTTP from a deployed site.

use reqwest::StatusCode;
use url::Url;

use super::{FetchError, FetchOutcome, Fetcher, normalize_source};
use crate::debug;

/// Fetches sources from an origin. Absolute source paths resolve against the
/// origin root, the way a browser resolves them against the page.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base: Url,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let base = Url::parse(base).map_err(|source| FetchError::BaseUrl {
            url: base.to_string(),
            source,
        })?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL of a source.
    pub fn url_for(&self, source: &str) -> Result<Url, url::ParseError> {
        self.base.join(&normalize_source(source))
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, source: &str) -> Result<FetchOutcome, FetchError> {
        let url = match self.url_for(source) {
            Ok(url) => url,
            Err(e) => return Ok(FetchOutcome::NetworkError(e.to_string())),
        };
        debug!("fetch"; "GET {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Ok(FetchOutcome::NetworkError(e.to_string())),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound);
        }
        if !status.is_success() {
            return Ok(FetchOutcome::NetworkError(format!("HTTP {status}")));
        }

        match response.bytes().await {
            Ok(bytes) => Ok(FetchOutcome::from_bytes(&bytes)),
            Err(e) => Ok(FetchOutcome::NetworkError(e.to_string())),
        }
    }
}
