/*!
 * Core types and data structures for the DumpDoc application
 */

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::utils::bytes_to_mb;

/// Why a file's content could not be materialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum UnreadableReason {
    /// Read permission denied
    PermissionDenied,
    /// File vanished between listing and read
    NotFound,
    /// Path refers to a directory
    IsDirectory,
    /// Path exceeds platform length limits
    PathTooLong,
    /// Any other I/O failure, with the underlying error text
    Other(String),
}

/// Content of a scanned file
///
/// Only `Text` carries real file content. The other variants stand in for
/// content that could not or should not be materialized; downstream stages
/// switch on the variant instead of inspecting the rendered string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Decoded file text, verbatim
    Text(String),
    /// File exceeded the size ceiling; holds the real size in bytes
    TooLarge(u64),
    /// File could not be read
    Unreadable(UnreadableReason),
    /// Content was classified as binary
    Binary,
}

impl Content {
    /// Returns the text if this is real content
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    /// True for every variant other than `Text`
    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Content::Text(_))
    }

    /// Short discriminant name used by renderers
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Text(_) => "text",
            Content::TooLarge(_) => "too_large",
            Content::Unreadable(_) => "unreadable",
            Content::Binary => "binary",
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Text(text) => f.write_str(text),
            Content::TooLarge(size) => {
                write!(f, "[File too large to display: {:.2} MB]", bytes_to_mb(*size))
            }
            Content::Binary => f.write_str("[Binary file - content not displayed]"),
            Content::Unreadable(reason) => match reason {
                UnreadableReason::PermissionDenied => {
                    f.write_str("[Permission denied: unable to read file]")
                }
                UnreadableReason::NotFound => {
                    f.write_str("[File not found: it may have been removed during the scan]")
                }
                UnreadableReason::IsDirectory => {
                    f.write_str("[Path is a directory, not a file]")
                }
                UnreadableReason::PathTooLong => f.write_str("[File path too long to read]"),
                UnreadableReason::Other(message) => write!(f, "[Error reading file: {}]", message),
            },
        }
    }
}

/// Findings of the transformation stage for one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformMetadata {
    /// Redaction ran
    pub redacted: bool,
    /// Content was cut down to head and tail
    pub truncated: bool,
    /// Content was classified as binary
    pub binary: bool,
    /// Line count before truncation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_lines: Option<usize>,
    /// Lines kept after truncation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shown_lines: Option<usize>,
    /// Lines dropped by truncation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omitted_lines: Option<usize>,
}

/// Latest commit touching a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    /// Abbreviated commit id
    pub id: String,
    /// Author name
    pub author: String,
    /// Commit time, RFC 3339
    pub date: String,
    /// First line of the message
    pub summary: String,
}

/// One scanned file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path, unique per scan
    pub absolute_path: PathBuf,
    /// Root-relative path with `/` separators
    pub relative_path: String,
    /// File name
    pub name: String,
    /// Extension as found on disk, without the dot
    pub extension: String,
    /// Size reported by the filesystem at read time
    pub size_bytes: u64,
    /// File content or placeholder
    pub content: Content,
    /// Set only when transformation was requested
    pub transform: Option<TransformMetadata>,
    /// Set only when version-control enrichment was requested
    pub last_commit: Option<CommitSummary>,
}

impl FileRecord {
    /// Lower-cased extension used for matching
    pub fn extension_lower(&self) -> String {
        self.extension.to_lowercase()
    }

    /// Number of lines of real content; placeholders count as zero
    pub fn line_count(&self) -> usize {
        self.content.as_text().map_or(0, |text| text.lines().count())
    }
}

/// Non-fatal condition encountered while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// Symbolic link skipped without following it
    SymlinkSkipped(PathBuf),
    /// Directory could not be listed; its subtree is missing from results
    DirectoryUnreadable { path: PathBuf, error: String },
    /// Entry vanished or failed between listing and inspection
    EntryFailed { path: PathBuf, error: String },
    /// File size could not be read; the file was kept with size 0
    SizeUnavailable { path: PathBuf, error: String },
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanWarning::SymlinkSkipped(path) => {
                write!(f, "Skipping symbolic link: {}", path.display())
            }
            ScanWarning::DirectoryUnreadable { path, error } => {
                write!(f, "Cannot read directory {}: {}", path.display(), error)
            }
            ScanWarning::EntryFailed { path, error } => {
                write!(f, "Error processing {}: {}", path.display(), error)
            }
            ScanWarning::SizeUnavailable { path, error } => {
                write!(f, "Cannot read size of {}: {}", path.display(), error)
            }
        }
    }
}

/// Result of one scan
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Records in traversal order
    pub files: Vec<FileRecord>,
    /// Warnings in the order they were encountered
    pub warnings: Vec<ScanWarning>,
}
