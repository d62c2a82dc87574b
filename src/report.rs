/*!
 * Reporting functionality for DumpDoc
 *
 * Prints a summary of a generation using the tabled library.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::FileRecord;
use crate::utils::format_file_size;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Root-relative path
    pub path: String,
    /// Number of lines of real content
    pub lines: usize,
    /// Size on disk
    pub bytes: u64,
}

impl From<&FileRecord> for FileReportInfo {
    fn from(record: &FileRecord) -> Self {
        Self {
            path: record.relative_path.clone(),
            lines: record.line_count(),
            bytes: record.size_bytes,
        }
    }
}

/// Statistics for one generation
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to scan and write
    pub duration: Duration,
    /// Number of files included
    pub files_processed: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Total size on disk
    pub total_bytes: u64,
    /// Warnings raised while scanning
    pub warnings: usize,
    /// Files whose content was replaced by a placeholder
    pub placeholders: usize,
    /// Details for each file
    pub file_details: Vec<FileReportInfo>,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for generation results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths, cutting at a separator where possible
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut kept = Vec::new();
        let mut len = 3;
        for part in path.rsplit('/') {
            let part_len = part.chars().count() + 1;
            if len + part_len > max_len {
                break;
            }
            kept.push(part);
            len += part_len;
        }

        if kept.is_empty() {
            let tail: String = path.chars().rev().take(max_len - 3).collect();
            return format!("...{}", tail.chars().rev().collect::<String>());
        }

        kept.reverse();
        format!(".../{}", kept.join("/"))
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files".to_string(),
                value: self.format_number(report.files_processed),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(report.total_lines),
            },
            SummaryRow {
                key: "📦 Total Size".to_string(),
                value: format_file_size(report.total_bytes),
            },
            SummaryRow {
                key: "🚫 Content Omitted".to_string(),
                value: self.format_number(report.placeholders),
            },
            SummaryRow {
                key: "⚠️ Warnings".to_string(),
                value: self.format_number(report.warnings),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        // Largest first
        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.path.cmp(&b.path)));

        let files_to_show = if files.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|info| FileRow {
                path: self.format_path(&info.path, 60),
                lines: self.format_number(info.lines),
                size: format_file_size(info.bytes),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &ScanReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_table = self.create_files_table(report);

        let summary_title = "✅  GENERATION COMPLETE";
        let files_title = if report.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES"
        } else {
            "📋  INCLUDED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}
