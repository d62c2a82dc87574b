/*!
 * Rendering scanned files into an output document
 */

mod html;
mod json;
mod markdown;
mod tree;

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::Result;
use crate::git::GitInfo;
use crate::stats::ProjectStats;
use crate::types::FileRecord;

pub use html::render_html;
pub use json::render_json;
pub use markdown::render_markdown;
pub use tree::{build_tree, render_tree, TreeEntry};

/// Output document format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown document
    #[default]
    #[value(alias = "md")]
    Markdown,
    /// JSON document
    Json,
    /// Standalone HTML page
    Html,
}

impl OutputFormat {
    /// Output file name used when none is configured
    pub fn default_file_name(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "PROJECT_CONTEXT.md",
            OutputFormat::Json => "PROJECT_CONTEXT.json",
            OutputFormat::Html => "PROJECT_CONTEXT.html",
        }
    }

    /// Default output names of every format
    pub fn all_default_file_names() -> Vec<String> {
        [OutputFormat::Markdown, OutputFormat::Json, OutputFormat::Html]
            .iter()
            .map(|format| format.default_file_name().to_string())
            .collect()
    }
}

/// Everything a renderer needs
#[derive(Debug, Clone)]
pub struct Document<'a> {
    /// Display name of the scanned root
    pub root_name: String,
    /// Records in traversal order
    pub files: &'a [FileRecord],
    /// Statistics, when requested
    pub stats: Option<&'a ProjectStats>,
    /// Repository information, when requested and available
    pub git: Option<&'a GitInfo>,
    /// Generation time
    pub generated_at: DateTime<Local>,
}

impl<'a> Document<'a> {
    pub fn new(root_name: impl Into<String>, files: &'a [FileRecord]) -> Self {
        Self {
            root_name: root_name.into(),
            files,
            stats: None,
            git: None,
            generated_at: Local::now(),
        }
    }

    pub fn with_stats(mut self, stats: Option<&'a ProjectStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_git(mut self, git: Option<&'a GitInfo>) -> Self {
        self.git = git;
        self
    }
}

/// Writer for output documents
pub struct DocumentWriter {
    format: OutputFormat,
}

impl DocumentWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render the document as a string in the configured format
    pub fn render(&self, document: &Document<'_>) -> Result<String> {
        match self.format {
            OutputFormat::Markdown => Ok(render_markdown(document)),
            OutputFormat::Json => render_json(document),
            OutputFormat::Html => render_html(document),
        }
    }

    /// Render and write the document to `path`
    pub fn write(&self, path: &Path, document: &Document<'_>) -> Result<()> {
        let rendered = self.render(document)?;
        fs::write(path, rendered)?;
        Ok(())
    }
}

/// Code fence language hint for an extension
pub(crate) fn fence_language(extension: &str) -> String {
    let extension = extension.to_lowercase();
    let language = match extension.as_str() {
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "rb" => "ruby",
        "rs" => "rust",
        "kt" => "kotlin",
        "cs" => "csharp",
        "h" => "c",
        "hpp" => "cpp",
        "sh" | "bash" => "bash",
        "yml" => "yaml",
        "md" => "markdown",
        "txt" => "text",
        other => other,
    };
    language.to_string()
}
