/*!
 * Language statistics over scanned files
 */

use std::collections::HashMap;

use serde::Serialize;

use crate::types::FileRecord;
use crate::utils::language_for_extension;

/// Totals for one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanguageStats {
    /// Language name
    pub language: String,
    /// Number of files
    pub files: usize,
    /// Lines of real content
    pub lines: usize,
    /// Bytes on disk
    pub bytes: u64,
}

/// Totals for a whole scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub total_files: usize,
    pub total_lines: usize,
    pub total_bytes: u64,
    /// Sorted by file count descending, then name
    pub languages: Vec<LanguageStats>,
}

impl ProjectStats {
    /// Aggregate statistics; placeholder content contributes no lines
    pub fn collect(records: &[FileRecord]) -> Self {
        let mut by_language: HashMap<String, LanguageStats> = HashMap::new();
        let mut stats = ProjectStats::default();

        for record in records {
            let lines = record.line_count();
            stats.total_files += 1;
            stats.total_lines += lines;
            stats.total_bytes += record.size_bytes;

            let language = language_name(&record.extension);
            let entry = by_language
                .entry(language.clone())
                .or_insert_with(|| LanguageStats {
                    language,
                    ..LanguageStats::default()
                });
            entry.files += 1;
            entry.lines += lines;
            entry.bytes += record.size_bytes;
        }

        stats.languages = by_language.into_values().collect();
        stats.languages.sort_by(|a, b| {
            b.files
                .cmp(&a.files)
                .then_with(|| a.language.cmp(&b.language))
        });
        stats
    }
}

fn language_name(extension: &str) -> String {
    match language_for_extension(extension) {
        Some(language) => language.to_string(),
        None if !extension.is_empty() => extension.to_uppercase(),
        None => "Other".to_string(),
    }
}
