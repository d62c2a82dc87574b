/*!
 * DumpDoc - Generate a single document describing a project's source tree
 *
 * This library scans a project directory, filters and reads its files,
 * optionally redacts and truncates their content, and renders the result
 * as Markdown, JSON or HTML. A debounced watcher regenerates the document
 * when files change.
 */

pub mod classifier;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod scanner;
pub mod stats;
pub mod transform;
pub mod types;
pub mod utils;
pub mod watcher;
pub mod writer;


// Re-export main components for easier access
pub use classifier::PathClassifier;
pub use config::Config;
pub use error::{DumpDocError, Result};
pub use pipeline::{collect, generate};
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use scanner::{ScanOptions, Scanner};
pub use transform::TransformOptions;
pub use types::{Content, FileRecord, ScanOutcome, ScanWarning};
pub use utils::format_file_size;
pub use watcher::{WatchOptions, Watcher};
pub use writer::{Document, DocumentWriter, OutputFormat};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
