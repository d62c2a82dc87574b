/*!
 * JSON renderer
 */

use serde::Serialize;

use super::{build_tree, Document, TreeEntry};
use crate::error::Result;
use crate::git::GitInfo;
use crate::stats::ProjectStats;
use crate::types::{CommitSummary, FileRecord, TransformMetadata};

#[derive(Serialize)]
struct JsonDocument<'a> {
    generated_at: String,
    root: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    git: Option<&'a GitInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a ProjectStats>,
    tree: Vec<TreeEntry>,
    files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: &'a str,
    name: &'a str,
    extension: &'a str,
    size: u64,
    content_kind: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    transform: Option<&'a TransformMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_commit: Option<&'a CommitSummary>,
}

impl<'a> From<&'a FileRecord> for JsonFile<'a> {
    fn from(record: &'a FileRecord) -> Self {
        Self {
            path: &record.relative_path,
            name: &record.name,
            extension: &record.extension,
            size: record.size_bytes,
            content_kind: record.content.kind(),
            content: record.content.to_string(),
            transform: record.transform.as_ref(),
            last_commit: record.last_commit.as_ref(),
        }
    }
}

/// Render the document as pretty-printed JSON
pub fn render_json(document: &Document<'_>) -> Result<String> {
    let json = JsonDocument {
        generated_at: document.generated_at.to_rfc3339(),
        root: &document.root_name,
        git: document.git,
        stats: document.stats,
        tree: build_tree(document.files),
        files: document.files.iter().map(JsonFile::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
