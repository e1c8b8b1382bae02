//! Sources read from the site root on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use super::{FetchError, FetchOutcome, Fetcher, normalize_source};
use crate::{debug, utils::path::is_contained};

/// Reads sources relative to the site root, like a static file server would.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an absolute source path to a file below the root.
    ///
    /// `None` for paths that would leave the root.
    fn resolve(&self, source: &str) -> Option<PathBuf> {
        let normalized = normalize_source(source);
        let path = normalized
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_start_matches('/');
        let decoded = percent_decode_str(path).decode_utf8().ok()?;
        let relative = Path::new(decoded.as_ref());
        is_contained(relative).then(|| self.root.join(relative))
    }
}

impl Fetcher for FsFetcher {
    async fn fetch(&self, source: &str) -> Result<FetchOutcome, FetchError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(FetchError::RootUnavailable(self.root.clone())),
        }

        let Some(path) = self.resolve(source) else {
            debug!("fetch"; "rejected `{}`: outside the site root", source);
            return Ok(FetchOutcome::NotFound);
        };
        debug!("fetch"; "read {}", path.display());

        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            return Ok(FetchOutcome::NotFound);
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(FetchOutcome::from_bytes(&bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FetchOutcome::NotFound),
            Err(e) => Ok(FetchOutcome::NetworkError(e.to_string())),
        }
    }
}
