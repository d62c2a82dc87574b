/*!
 * HTML renderer built on quick-xml events
 */

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{build_tree, fence_language, render_tree, Document};
use crate::error::Result;
use crate::git::GitInfo;
use crate::stats::ProjectStats;
use crate::types::FileRecord;
use crate::utils::format_file_size;

const STYLE: &str = "body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; color: #222; }
pre { background: #f6f8fa; padding: 1rem; overflow-x: auto; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ddd; padding: 0.25rem 0.75rem; text-align: left; }
.meta, .generated { color: #666; font-size: 0.9rem; }
.placeholder { font-style: italic; color: #a33; }";

/// Render the document as a standalone HTML page
pub fn render_html(document: &Document<'_>) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    writer.write_event(Event::Start(
        BytesStart::new("html").with_attributes([("lang", "en")]),
    ))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    writer.write_event(Event::Empty(
        BytesStart::new("meta").with_attributes([("charset", "utf-8")]),
    ))?;
    write_text_element(&mut writer, "title", &format!("Project Context: {}", document.root_name))?;
    write_text_element(&mut writer, "style", STYLE)?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    writer.write_event(Event::Start(BytesStart::new("body")))?;
    write_text_element(&mut writer, "h1", &format!("Project Context: {}", document.root_name))?;
    write_element_with_class(
        &mut writer,
        "p",
        "generated",
        &format!("Generated: {}", document.generated_at.format("%Y-%m-%d %H:%M:%S")),
    )?;

    if let Some(git) = document.git {
        write_git(&mut writer, git)?;
    }

    start_section(&mut writer, "tree", "Directory Structure")?;
    write_text_element(
        &mut writer,
        "pre",
        &render_tree(&document.root_name, &build_tree(document.files)),
    )?;
    writer.write_event(Event::End(BytesEnd::new("section")))?;

    if let Some(stats) = document.stats {
        write_stats(&mut writer, stats)?;
    }

    start_section(&mut writer, "files", "File Contents")?;
    for record in document.files {
        write_file(&mut writer, record)?;
    }
    writer.write_event(Event::End(BytesEnd::new("section")))?;

    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_element_with_class<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    class: &str,
    text: &str,
) -> Result<()> {
    writer.write_event(Event::Start(
        BytesStart::new(tag).with_attributes([("class", class)]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn start_section<W: Write>(writer: &mut Writer<W>, id: &str, title: &str) -> Result<()> {
    writer.write_event(Event::Start(
        BytesStart::new("section").with_attributes([("id", id)]),
    ))?;
    write_text_element(writer, "h2", title)
}

fn write_git<W: Write>(writer: &mut Writer<W>, git: &GitInfo) -> Result<()> {
    start_section(writer, "git", "Git Information")?;
    writer.write_event(Event::Start(BytesStart::new("dl")))?;

    let commit = format!("{} ({})", git.short_commit, git.summary);
    let mut rows = vec![
        ("Branch", git.branch.as_str()),
        ("Commit", commit.as_str()),
        ("Author", git.author.as_str()),
        ("Date", git.date.as_str()),
    ];
    if let Some(remote) = &git.remote {
        rows.push(("Remote", remote.as_str()));
    }
    for (term, value) in rows {
        write_text_element(writer, "dt", term)?;
        write_text_element(writer, "dd", value)?;
    }

    writer.write_event(Event::End(BytesEnd::new("dl")))?;
    writer.write_event(Event::End(BytesEnd::new("section")))?;
    Ok(())
}

fn write_stats<W: Write>(writer: &mut Writer<W>, stats: &ProjectStats) -> Result<()> {
    start_section(writer, "stats", "Statistics")?;
    write_text_element(
        writer,
        "p",
        &format!(
            "{} files, {} lines, {}",
            stats.total_files,
            stats.total_lines,
            format_file_size(stats.total_bytes)
        ),
    )?;

    writer.write_event(Event::Start(BytesStart::new("table")))?;
    writer.write_event(Event::Start(BytesStart::new("tr")))?;
    for heading in ["Language", "Files", "Lines", "Size"] {
        write_text_element(writer, "th", heading)?;
    }
    writer.write_event(Event::End(BytesEnd::new("tr")))?;

    for language in &stats.languages {
        writer.write_event(Event::Start(BytesStart::new("tr")))?;
        write_text_element(writer, "td", &language.language)?;
        write_text_element(writer, "td", &language.files.to_string())?;
        write_text_element(writer, "td", &language.lines.to_string())?;
        write_text_element(writer, "td", &format_file_size(language.bytes))?;
        writer.write_event(Event::End(BytesEnd::new("tr")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("table")))?;
    writer.write_event(Event::End(BytesEnd::new("section")))?;
    Ok(())
}

fn write_file<W: Write>(writer: &mut Writer<W>, record: &FileRecord) -> Result<()> {
    writer.write_event(Event::Start(
        BytesStart::new("article").with_attributes([("class", "file")]),
    ))?;
    write_text_element(writer, "h3", &record.relative_path)?;

    let mut meta = format_file_size(record.size_bytes);
    if let Some(transform) = &record.transform {
        if transform.truncated {
            meta.push_str(&format!(
                " · truncated, {} of {} lines shown",
                transform.shown_lines.unwrap_or_default(),
                transform.total_lines.unwrap_or_default()
            ));
        }
        if transform.redacted {
            meta.push_str(" · redacted");
        }
    }
    if let Some(commit) = &record.last_commit {
        meta.push_str(&format!(" · last commit {} by {}", commit.id, commit.author));
    }
    write_element_with_class(writer, "p", "meta", &meta)?;

    match record.content.as_text() {
        Some(text) => {
            let class = format!("language-{}", fence_language(&record.extension));
            writer.write_event(Event::Start(BytesStart::new("pre")))?;
            write_element_with_class(writer, "code", &class, text)?;
            writer.write_event(Event::End(BytesEnd::new("pre")))?;
        }
        None => {
            write_element_with_class(writer, "p", "placeholder", &record.content.to_string())?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("article")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Content, UnreadableReason};

    fn record(path: &str, content: Content) -> FileRecord {
        FileRecord {
            absolute_path: format!("/p/{}", path).into(),
            relative_path: path.to_string(),
            name: path.to_string(),
            extension: "js".to_string(),
            size_bytes: 20,
            content,
            transform: None,
            last_commit: None,
        }
    }

    #[test]
    fn test_html_escapes_content() {
        let files = vec![
            record("a.js", Content::Text("if (a < b && c > d) {}".into())),
            record("b.js", Content::Unreadable(UnreadableReason::PermissionDenied)),
        ];
        let html = render_html(&Document::new("demo", &files)).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Project Context: demo</title>"));
        assert!(html.contains("if (a &lt; b &amp;&amp; c &gt; d) {}"));
        assert!(html.contains(r#"<code class="language-javascript">"#));
        assert!(html.contains(r#"<p class="placeholder">[Permission denied: unable to read file]</p>"#));
        assert!(html.ends_with("</html>"));
    }
}
