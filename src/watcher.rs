/*!
 * Watch mode: static watch set, change filtering and debounced batches
 */

use std::collections::BTreeSet;
use std::mem;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use glob_match::glob_match;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as _};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::classifier::PathClassifier;
use crate::error::{DumpDocError, Result};
use crate::scanner::ScanOptions;

/// Default quiet period before a batch is delivered
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Watch mode configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    /// Directory names excluded from the watch set, in addition to the static set
    pub ignore_dirs: Vec<String>,
    /// Extensions or file-name globs that trigger regeneration; `None` means any
    pub filter: Option<Vec<String>>,
    /// Quiet period; every qualifying event restarts it
    pub debounce: Duration,
    /// File names written by the tool itself, never triggering
    pub output_names: Vec<String>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            ignore_dirs: Vec::new(),
            filter: None,
            debounce: DEFAULT_DEBOUNCE,
            output_names: Vec::new(),
        }
    }
}

/// Decides whether a changed path should trigger regeneration
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    filter: Option<Vec<String>>,
    output_names: Vec<String>,
}

impl ChangeFilter {
    pub fn new(options: &WatchOptions) -> Self {
        Self {
            filter: options.filter.as_ref().map(|entries| {
                entries
                    .iter()
                    .map(|entry| entry.trim().trim_start_matches('.').to_lowercase())
                    .filter(|entry| !entry.is_empty())
                    .collect()
            }),
            output_names: options.output_names.clone(),
        }
    }

    /// Hidden files and the tool's own output never trigger
    pub fn should_trigger(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return false,
        };

        if name.starts_with('.') || self.output_names.iter().any(|output| *output == name) {
            return false;
        }

        match &self.filter {
            Some(entries) => {
                let extension = path
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase())
                    .unwrap_or_default();
                let lower_name = name.to_lowercase();
                entries.iter().any(|entry| {
                    (!extension.is_empty() && *entry == extension)
                        || glob_match(entry, &lower_name)
                })
            }
            None => true,
        }
    }
}

/// Directories to watch: `root` and every eligible directory beneath it
///
/// Evaluated once; directories created later are not added.
pub fn watchable_directories(root: &Path, ignore_dirs: &[String]) -> Vec<PathBuf> {
    let classifier = PathClassifier::new(&ScanOptions {
        extra_ignore_dirs: ignore_dirs.to_vec(),
        ..ScanOptions::default()
    });

    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || (entry.file_type().is_dir()
                    && classifier.is_directory_eligible(&entry.file_name().to_string_lossy()))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                debug!("Not watching {:?}: {}", e.path(), e);
                None
            }
        })
        .collect()
}

/// Collect paths from `events` and deliver them in batches
///
/// Each received path restarts the `delay` deadline. When the deadline
/// passes, the accumulated set is handed to `on_batch` once, sorted and
/// deduplicated, and cleared. Returns when `stop` receives a message or
/// either channel disconnects; pending paths are dropped.
pub fn run_debounce<F>(events: Receiver<PathBuf>, stop: Receiver<()>, delay: Duration, mut on_batch: F)
where
    F: FnMut(Vec<PathBuf>),
{
    let mut pending: BTreeSet<PathBuf> = BTreeSet::new();
    let mut deadline: Option<Instant> = None;

    loop {
        let timer = match deadline {
            Some(at) => crossbeam_channel::at(at),
            None => crossbeam_channel::never::<Instant>(),
        };

        select! {
            recv(events) -> message => match message {
                Ok(path) => {
                    pending.insert(path);
                    deadline = Some(Instant::now() + delay);
                }
                Err(_) => break,
            },
            recv(stop) -> _ => break,
            recv(timer) -> _ => {
                deadline = None;
                if !pending.is_empty() {
                    on_batch(mem::take(&mut pending).into_iter().collect());
                }
            },
        }
    }

    if !pending.is_empty() {
        debug!("Dropping {} pending changes on shutdown", pending.len());
    }
}

/// Live state of a started watcher
struct Running {
    watcher: RecommendedWatcher,
    stop_tx: Sender<()>,
    worker: JoinHandle<()>,
    watched: Vec<PathBuf>,
}

/// File system watcher that re-runs a callback on debounced changes
///
/// `idle -> running -> idle`; `start` while running and `stop` while idle
/// are no-ops.
#[derive(Default)]
pub struct Watcher {
    running: Option<Running>,
}

impl Watcher {
    /// Create an idle watcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `root`, calling `on_change` with each batch of changed paths
    ///
    /// Directories that cannot be watched are skipped.
    pub fn start<F>(&mut self, root: &Path, on_change: F, options: WatchOptions) -> Result<()>
    where
        F: FnMut(Vec<PathBuf>) + Send + 'static,
    {
        if self.running.is_some() {
            return Ok(());
        }

        let (event_tx, event_rx) = unbounded::<PathBuf>();
        let (stop_tx, stop_rx) = unbounded::<()>();
        let filter = ChangeFilter::new(&options);

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => {
                    for path in event.paths {
                        if filter.should_trigger(&path) {
                            let _ = event_tx.send(path);
                        }
                    }
                }
                Err(e) => warn!("Watch error: {}", e),
            }
        })
        .map_err(|e| DumpDocError::Watch(e.to_string()))?;

        let mut watched = Vec::new();
        for dir in watchable_directories(root, &options.ignore_dirs) {
            match watcher.watch(&dir, RecursiveMode::NonRecursive) {
                Ok(()) => watched.push(dir),
                Err(e) => debug!("Cannot watch {}: {}", dir.display(), e),
            }
        }

        let delay = options.debounce;
        let worker = thread::Builder::new()
            .name("dumpdoc-debounce".to_string())
            .spawn(move || run_debounce(event_rx, stop_rx, delay, on_change))?;

        info!(
            "Watching {} directories under {}",
            watched.len(),
            root.display()
        );

        self.running = Some(Running {
            watcher,
            stop_tx,
            worker,
            watched,
        });

        Ok(())
    }

    /// Detach all observers and end the debounce worker; pending changes are dropped
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        drop(running.watcher);
        let _ = running.stop_tx.send(());
        if running.worker.join().is_err() {
            warn!("Debounce worker panicked");
        }
        info!("Stopped watching {} directories", running.watched.len());
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Directories currently observed
    pub fn watched_dirs(&self) -> &[PathBuf] {
        match &self.running {
            Some(running) => &running.watched,
            None => &[],
        }
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.stop();
    }
}
