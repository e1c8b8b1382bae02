//! File watcher for live reload.
//!
//! Watched files are tracked through their parent directory so that
//! editors which save by rename keep triggering events.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::message::ReloadMessage;
use super::server::ReloadHub;
use crate::utils::plural_s;
use crate::{debug, log};

/// Quiet period before a batch of changes is reported
const DEBOUNCE_MS: u64 = 300;

/// How often the watcher loop checks for shutdown
const SHUTDOWN_POLL: Duration = Duration::from_millis(500);

/// Check if path is a temp/backup file (editor artifacts)
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Paths whose changes trigger a reload.
#[derive(Debug, Default)]
struct WatchScope {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl WatchScope {
    fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f == path) || self.dirs.iter().any(|d| path.starts_with(d))
    }
}

/// Collects changed paths until events stop for `DEBOUNCE_MS`.
#[derive(Debug, Default)]
struct Debouncer {
    changes: BTreeSet<PathBuf>,
    last_event: Option<Instant>,
}

impl Debouncer {
    fn add_event(&mut self, event: &notify::Event, scope: &WatchScope) {
        match event.kind {
            // mtime/atime/chmod noise
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
            _ => return,
        }

        for path in &event.paths {
            if is_temp_file(path) || !scope.contains(path) {
                continue;
            }
            debug!("watch"; "{:?}: {}", event.kind, path.display());
            self.changes.insert(path.clone());
            self.last_event = Some(Instant::now());
        }
    }

    fn is_ready(&self) -> bool {
        self.last_event
            .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
            && !self.changes.is_empty()
    }

    fn take_if_ready(&mut self) -> Option<Vec<PathBuf>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        Some(std::mem::take(&mut self.changes).into_iter().collect())
    }

    /// Precise sleep duration until next possible ready time.
    fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };
        Duration::from_millis(DEBOUNCE_MS)
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}

/// Watches the configured site paths and reports debounced batches.
pub struct SiteWatcher {
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<notify::Result<notify::Event>>,
    scope: WatchScope,
    debouncer: Debouncer,
    root: PathBuf,
}

impl SiteWatcher {
    /// Start watching `paths` (relative to `root`). Missing paths are skipped.
    pub fn new(root: &Path, paths: &[PathBuf]) -> notify::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;

        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let mut scope = WatchScope::default();

        for path in paths {
            let Ok(path) = root.join(path).canonicalize() else {
                debug!("watch"; "skip missing {}", path.display());
                continue;
            };
            if path.is_dir() {
                watcher.watch(&path, RecursiveMode::Recursive)?;
                scope.dirs.push(path);
            } else if let Some(parent) = path.parent() {
                watcher.watch(parent, RecursiveMode::NonRecursive)?;
                scope.files.push(path);
            }
        }

        Ok(Self {
            _watcher: watcher,
            rx,
            scope,
            debouncer: Debouncer::default(),
            root,
        })
    }

    /// Number of watched files and directories.
    pub fn watched_count(&self) -> usize {
        self.scope.files.len() + self.scope.dirs.len()
    }

    /// Wait for the next debounced batch, giving up after `max_wait`.
    pub fn next_batch(&mut self, max_wait: Duration) -> Option<Vec<PathBuf>> {
        let deadline = Instant::now() + max_wait;
        loop {
            if let Some(batch) = self.debouncer.take_if_ready() {
                return Some(batch);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }

            match self.rx.recv_timeout(self.debouncer.sleep_duration().min(deadline - now)) {
                Ok(Ok(event)) => self.debouncer.add_event(&event, &self.scope),
                Ok(Err(e)) => log!("watch"; "notify error: {}", e),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Broadcast a reload for every batch until shutdown.
    pub fn run(mut self, hub: ReloadHub) {
        debug!("watch"; "watching {} path{}", self.watched_count(), plural_s(self.watched_count()));

        while !crate::core::is_shutdown() {
            let Some(batch) = self.next_batch(SHUTDOWN_POLL) else {
                continue;
            };
            let reason = batch
                .iter()
                .map(|p| p.strip_prefix(&self.root).unwrap_or(p).display().to_string())
                .collect::<Vec<_>>()
                .join(", ");

            log!("watch"; "changed: {}", reason);
            let sent = hub.broadcast(&ReloadMessage::reload(reason));
            debug!("reload"; "notified {} client{}", sent, plural_s(sent));
        }
    }
}
