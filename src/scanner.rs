/*!
 * Directory and file scanning functionality
 */

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::classifier::PathClassifier;
use crate::reader::{read_content, DEFAULT_MAX_FILE_SIZE};
use crate::types::{FileRecord, ScanOutcome, ScanWarning};
use crate::utils::normalize_relative_path;

/// Options for one scan; immutable for the duration of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Files larger than this are replaced by a placeholder
    pub max_file_size: u64,
    /// Allow-list replacing the default extension set
    pub include_extensions: Option<Vec<String>>,
    /// Glob patterns matched against file names and relative paths
    pub exclude_patterns: Vec<String>,
    /// Deepest directory level whose files are listed; root children are depth 0
    pub max_depth: Option<usize>,
    /// Directory names ignored in addition to the static set
    pub extra_ignore_dirs: Vec<String>,
    /// File names ignored in addition to the static set
    pub extra_ignore_files: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            include_extensions: None,
            exclude_patterns: Vec::new(),
            max_depth: None,
            extra_ignore_dirs: Vec::new(),
            extra_ignore_files: Vec::new(),
        }
    }
}

/// Scanner for directory contents
pub struct Scanner {
    /// Scan options
    options: ScanOptions,
    /// Eligibility rules derived from the options
    classifier: PathClassifier,
    /// Progress indicator
    pub progress: Arc<ProgressBar>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(options: ScanOptions, progress: Arc<ProgressBar>) -> Self {
        let classifier = PathClassifier::new(&options);
        Self {
            options,
            classifier,
            progress,
        }
    }

    /// Scan options in use
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Walk `root` depth-first in name order and collect eligible files
    ///
    /// Only a root that cannot be listed is an error. Everything below it
    /// that fails is reported through `ScanOutcome::warnings`.
    pub fn scan(&self, root: &Path) -> io::Result<ScanOutcome> {
        let root = fs::canonicalize(root)?;
        fs::read_dir(&root)?;

        let mut outcome = ScanOutcome::default();

        // walkdir counts the root's children as depth 1
        let max_depth = self
            .options
            .max_depth
            .map_or(usize::MAX, |depth| depth.saturating_add(1));

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.should_descend(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    outcome.warnings.push(walk_warning(&e));
                    continue;
                }
            };

            if entry.path_is_symlink() {
                outcome
                    .warnings
                    .push(ScanWarning::SymlinkSkipped(entry.path().to_path_buf()));
                continue;
            }

            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = match entry.path().strip_prefix(&root) {
                Ok(relative) => normalize_relative_path(relative),
                Err(e) => {
                    outcome.warnings.push(ScanWarning::EntryFailed {
                        path: entry.path().to_path_buf(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if !self.classifier.is_file_eligible(&relative_path) {
                continue;
            }

            let record = self.process_file(&entry, relative_path, &mut outcome.warnings);
            outcome.files.push(record);
        }

        debug!(
            "Scanned {}: {} files, {} warnings",
            root.display(),
            outcome.files.len(),
            outcome.warnings.len()
        );

        Ok(outcome)
    }

    /// Directories are pruned by name; everything else is decided per entry
    fn should_descend(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return true;
        }
        self.classifier
            .is_directory_eligible(&entry.file_name().to_string_lossy())
    }

    /// Read one eligible file into a record
    fn process_file(
        &self,
        entry: &DirEntry,
        relative_path: String,
        warnings: &mut Vec<ScanWarning>,
    ) -> FileRecord {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        self.progress.inc(1);
        self.progress.set_message(format!("Current file: {}", relative_path));

        let content = read_content(path, self.options.max_file_size);

        let size_bytes = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warnings.push(ScanWarning::SizeUnavailable {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
                0
            }
        };

        FileRecord {
            absolute_path: path.to_path_buf(),
            extension: path
                .extension()
                .map(|ext| ext.to_string_lossy().to_string())
                .unwrap_or_default(),
            relative_path,
            name,
            size_bytes,
            content,
            transform: None,
            last_commit: None,
        }
    }
}

/// Convert a walk error into the warning it represents
fn walk_warning(error: &walkdir::Error) -> ScanWarning {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let message = error
        .io_error()
        .map_or_else(|| error.to_string(), |e| e.to_string());

    if path.is_dir() {
        ScanWarning::DirectoryUnreadable {
            path,
            error: message,
        }
    } else {
        ScanWarning::EntryFailed {
            path,
            error: message,
        }
    }
}

/// Scan `root` with a hidden progress indicator
pub fn scan(root: &Path, options: ScanOptions) -> io::Result<ScanOutcome> {
    Scanner::new(options, Arc::new(ProgressBar::hidden())).scan(root)
}
