/*!
 * One generation: scan, transform, enrich, render and write
 */

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::git::{self, GitInfo};
use crate::report::{FileReportInfo, ScanReport};
use crate::scanner::Scanner;
use crate::stats::ProjectStats;
use crate::transform;
use crate::types::{FileRecord, ScanWarning};
use crate::writer::{Document, DocumentWriter};

/// Records and metadata ready to be rendered
#[derive(Debug, Clone)]
pub struct Collected {
    /// Display name of the scanned root
    pub root_name: String,
    /// Transformed and enriched records, in traversal order
    pub files: Vec<FileRecord>,
    /// Warnings raised while scanning
    pub warnings: Vec<ScanWarning>,
    /// Statistics, when requested
    pub stats: Option<ProjectStats>,
    /// Repository information, when requested and available
    pub git: Option<GitInfo>,
}

/// Scan the target directory and apply every requested stage
pub fn collect(config: &Config, progress: Arc<ProgressBar>) -> Result<Collected> {
    let scanner = Scanner::new(config.scan_options(), progress);
    let outcome = scanner.scan(&config.target_dir)?;

    for warning in &outcome.warnings {
        warn!("{}", warning);
    }

    let mut files = outcome.files;
    let transform_options = config.transform_options();
    if transform_options.is_enabled() {
        for record in files.iter_mut() {
            transform::apply(record, &transform_options);
        }
    }

    let git = if config.git {
        git::enrich(&mut files, &config.target_dir);
        git::repo_info(&config.target_dir)
    } else {
        None
    };

    let stats = config.stats.then(|| ProjectStats::collect(&files));

    Ok(Collected {
        root_name: root_name(&config.target_dir),
        files,
        warnings: outcome.warnings,
        stats,
        git,
    })
}

/// Run a full generation and write the output file
pub fn generate(config: &Config, progress: Arc<ProgressBar>) -> Result<ScanReport> {
    let start = Instant::now();
    let collected = collect(config, progress)?;

    let document = Document::new(collected.root_name.clone(), &collected.files)
        .with_stats(collected.stats.as_ref())
        .with_git(collected.git.as_ref());
    DocumentWriter::new(config.format).write(&config.output_file, &document)?;

    debug!(
        "Wrote {} files to {}",
        collected.files.len(),
        config.output_file.display()
    );

    Ok(ScanReport {
        output_file: config.output_file.display().to_string(),
        duration: start.elapsed(),
        files_processed: collected.files.len(),
        total_lines: collected.files.iter().map(FileRecord::line_count).sum(),
        total_bytes: collected.files.iter().map(|record| record.size_bytes).sum(),
        warnings: collected.warnings.len(),
        placeholders: collected
            .files
            .iter()
            .filter(|record| record.content.is_placeholder())
            .count(),
        file_details: collected.files.iter().map(FileReportInfo::from).collect(),
    })
}

/// Directory name used as the document title
fn root_name(target_dir: &Path) -> String {
    fs::canonicalize(target_dir)
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| target_dir.display().to_string())
}
