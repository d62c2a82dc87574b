/*!
 * Markdown renderer
 */

use std::fmt::Write as _;

use super::{build_tree, fence_language, render_tree, Document};
use crate::types::FileRecord;
use crate::utils::format_file_size;

/// Render the document as Markdown
pub fn render_markdown(document: &Document<'_>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Project Context: {}\n", document.root_name);
    let _ = writeln!(
        out,
        "Generated: {}\n",
        document.generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(git) = document.git {
        out.push_str("## Git Information\n\n");
        let _ = writeln!(out, "- **Branch:** {}", git.branch);
        let _ = writeln!(out, "- **Commit:** {} ({})", git.short_commit, git.summary);
        let _ = writeln!(out, "- **Author:** {}", git.author);
        let _ = writeln!(out, "- **Date:** {}", git.date);
        if let Some(remote) = &git.remote {
            let _ = writeln!(out, "- **Remote:** {}", remote);
        }
        out.push('\n');
    }

    out.push_str("## Directory Structure\n\n```\n");
    out.push_str(&render_tree(&document.root_name, &build_tree(document.files)));
    out.push_str("```\n\n");

    out.push_str("## Files\n\n");
    for record in document.files {
        let _ = writeln!(
            out,
            "- `{}` ({})",
            record.relative_path,
            format_file_size(record.size_bytes)
        );
    }
    out.push('\n');

    if let Some(stats) = document.stats {
        out.push_str("## Statistics\n\n");
        let _ = writeln!(
            out,
            "{} files, {} lines, {}\n",
            stats.total_files,
            stats.total_lines,
            format_file_size(stats.total_bytes)
        );
        out.push_str("| Language | Files | Lines | Size |\n");
        out.push_str("|----------|------:|------:|-----:|\n");
        for language in &stats.languages {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                language.language,
                language.files,
                language.lines,
                format_file_size(language.bytes)
            );
        }
        out.push('\n');
    }

    out.push_str("## File Contents\n");
    for record in document.files {
        out.push('\n');
        write_file_section(record, &mut out);
    }

    out
}

fn write_file_section(record: &FileRecord, out: &mut String) {
    let _ = writeln!(out, "### {}\n", record.relative_path);

    if let Some(commit) = &record.last_commit {
        let _ = writeln!(
            out,
            "> Last commit: {} by {} on {}: {}\n",
            commit.id, commit.author, commit.date, commit.summary
        );
    }

    if let Some(transform) = &record.transform {
        if transform.truncated {
            let _ = writeln!(
                out,
                "> Truncated: showing {} of {} lines ({} omitted)\n",
                transform.shown_lines.unwrap_or_default(),
                transform.total_lines.unwrap_or_default(),
                transform.omitted_lines.unwrap_or_default()
            );
        }
        if transform.redacted {
            out.push_str("> Sensitive values redacted\n\n");
        }
    }

    match record.content.as_text() {
        Some(text) => {
            let fence = fence_for(text);
            let _ = writeln!(out, "{}{}", fence, fence_language(&record.extension));
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
            let _ = writeln!(out, "{}", fence);
        }
        None => {
            let _ = writeln!(out, "{}", record.content);
        }
    }
}

/// A backtick fence longer than any backtick run in `text`
fn fence_for(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for ch in text.chars() {
        if ch == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}
