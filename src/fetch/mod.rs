//! Markdown source retrieval.
//!
//! A slot names its source with a logical path such as
//! `_auto_contents/papers.md`. Fetchers normalize that to an absolute path,
//! retrieve it once, and classify the result as a [`FetchOutcome`]:
//!
//! | Result                         | Outcome             |
//! |--------------------------------|---------------------|
//! | non-blank body                 | `Success(text)`     |
//! | empty or whitespace-only body  | `EmptySuccess`      |
//! | HTTP 404 / missing file        | `NotFound`          |
//! | any other failure              | `NetworkError(why)` |
//!
//! A [`FetchError`] is different: it means the fetcher itself is unusable,
//! and stops the whole load.

mod fs;
mod http;
#[cfg(test)]
mod memory;

pub use fs::FsFetcher;
pub use http::HttpFetcher;
#[cfg(test)]
pub use memory::MemoryFetcher;

use std::borrow::Cow;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::SiteConfig;

/// How one retrieval ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(String),
    EmptySuccess,
    NotFound,
    NetworkError(String),
}

impl FetchOutcome {
    /// Classify a successfully retrieved body.
    pub fn from_body(body: String) -> Self {
        if body.trim().is_empty() {
            Self::EmptySuccess
        } else {
            Self::Success(body)
        }
    }

    /// Classify raw bytes, decoding invalid UTF-8 lossily.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_body(String::from_utf8_lossy(bytes).into_owned())
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Short name used in logs and reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "ok",
            Self::EmptySuccess => "empty",
            Self::NotFound => "not found",
            Self::NetworkError(_) => "network error",
        }
    }
}

/// The fetcher cannot retrieve anything at all.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("site root `{0}` is not a readable directory")]
    RootUnavailable(PathBuf),

    #[error("invalid base URL `{url}`")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP client could not be created")]
    Client(#[source] reqwest::Error),
}

/// Make a logical source path absolute by prefixing `/` when missing.
pub fn normalize_source(source: &str) -> Cow<'_, str> {
    if source.starts_with('/') {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(format!("/{source}"))
    }
}

/// Retrieves Markdown sources.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, source: &str) -> Result<FetchOutcome, FetchError>;
}

/// The fetcher chosen by configuration.
#[derive(Debug)]
pub enum AnyFetcher {
    Fs(FsFetcher),
    Http(HttpFetcher),
}

impl AnyFetcher {
    /// HTTP when `site.base_url` is set, otherwise the site root on disk.
    pub fn from_config(config: &SiteConfig) -> Result<Self, FetchError> {
        match &config.site.base_url {
            Some(base) => Ok(Self::Http(HttpFetcher::new(base)?)),
            None => Ok(Self::Fs(FsFetcher::new(&config.root))),
        }
    }

    /// Where sources come from, for log output.
    pub fn describe(&self) -> String {
        match self {
            Self::Fs(fs) => fs.root().display().to_string(),
            Self::Http(http) => http.base().to_string(),
        }
    }
}

impl Fetcher for AnyFetcher {
    async fn fetch(&self, source: &str) -> Result<FetchOutcome, FetchError> {
        match self {
            Self::Fs(fetcher) => fetcher.fetch(source).await,
            Self::Http(fetcher) => fetcher.fetch(source).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_source() {
        assert_eq!(normalize_source("_auto_contents/profile.md"), "/_auto_contents/profile.md");
        assert_eq!(normalize_source("/_contents/news.md"), "/_contents/news.md");
        assert_eq!(normalize_source(""), "/");
        assert!(matches!(normalize_source("/a.md"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_classify_body() {
        assert_eq!(
            FetchOutcome::from_body("# Papers".into()),
            FetchOutcome::Success("# Papers".into())
        );
        assert_eq!(FetchOutcome::from_body(String::new()), FetchOutcome::EmptySuccess);
        assert_eq!(FetchOutcome::from_body(" \n\t\r\n".into()), FetchOutcome::EmptySuccess);
    }

    #[test]
    fn test_classify_bytes_lossy() {
        match FetchOutcome::from_bytes(b"caf\xff") {
            FetchOutcome::Success(text) => assert_eq!(text, "caf\u{FFFD}"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_from_config_picks_backend() {
        let mut config = SiteConfig::default();
        assert!(matches!(AnyFetcher::from_config(&config), Ok(AnyFetcher::Fs(_))));

        config.site.base_url = Some("https://example.org/".into());
        assert!(matches!(AnyFetcher::from_config(&config), Ok(AnyFetcher::Http(_))));

        config.site.base_url = Some("not a url".into());
        assert!(matches!(
            AnyFetcher::from_config(&config),
            Err(FetchError::BaseUrl { .. })
        ));
    }
}
