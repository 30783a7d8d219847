/*!
 * Run summary for ctxdump
 *
 * Printed after a report has been written to a file, using the tabled library
 * for table rendering.
 */

use std::path::Path;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::renderer::RenderSummary;

/// Everything shown in the run summary
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Where the report went
    pub output: String,
    /// Wall time of the render
    pub duration: Duration,
    /// Name of the tokenizer used for token counts
    pub tokenizer: Option<String>,
    /// Per-root totals
    pub summary: RenderSummary,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for render results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
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

    fn create_roots_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct RootRow {
            #[tabled(rename = "Root")]
            root: String,

            #[tabled(rename = "Files")]
            files: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Tokens")]
            tokens: String,
        }

        let rows: Vec<RootRow> = report
            .summary
            .roots
            .iter()
            .map(|root| RootRow {
                root: format_path(&root.root, 60),
                files: format_number(root.files),
                lines: root.lines.map(format_number).unwrap_or_else(|| "-".to_string()),
                tokens: root.tokens.map(format_number).unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        styled(Table::new(rows))
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let summary = &report.summary;
        let mut rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files".to_string(),
                value: format_number(summary.total_files()),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: format_number(summary.total_lines()),
            },
        ];

        if let Some(tokens) = summary.total_tokens() {
            let counter = report.tokenizer.as_deref().unwrap_or("estimate");
            rows.push(SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!("{} tokens ({})", format_number(tokens), counter),
            });
        }

        if !summary.failed_roots.is_empty() {
            let failed: Vec<String> = summary
                .failed_roots
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            rows.push(SummaryRow {
                key: "⚠️ Skipped Roots".to_string(),
                value: failed.join(", "),
            });
        }

        styled(Table::new(rows))
    }

    fn generate_console_report(&self, report: &ScanReport) -> String {
        let roots_table = self.create_roots_table(report);
        let summary_table = self.create_summary_table(report);

        format!(
            "📋  RENDERED ROOTS\n{}\n\n✅  REPORT COMPLETE\n{}",
            roots_table, summary_table
        )
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}

/// Format a number with human-readable units
pub fn format_number(num: u64) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Keep the trailing segments of `path` that fit in `max_len` characters
fn format_path(path: &Path, max_len: usize) -> String {
    let display = path.display().to_string();
    if display.chars().count() <= max_len {
        return display;
    }

    let mut segments = Vec::new();
    let mut current_len = 3;
    for part in display.rsplit(['/', '\\']) {
        let part_len = part.chars().count() + 1;
        if current_len + part_len > max_len {
            break;
        }
        segments.push(part);
        current_len += part_len;
    }

    if segments.is_empty() {
        let len = display.chars().count();
        let tail: String = display.chars().skip(len + 3 - max_len).collect();
        return format!("...{}", tail);
    }

    segments.reverse();
    format!(".../{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RootSummary;
    use std::path::PathBuf;

    fn sample_report() -> ScanReport {
        ScanReport {
            output: "report.md".to_string(),
            duration: Duration::from_millis(12),
            tokenizer: Some("gpt-4o".to_string()),
            summary: RenderSummary {
                roots: vec![
                    RootSummary {
                        root: PathBuf::from("/work/app"),
                        files: 3,
                        lines: Some(6000),
                        tokens: None,
                    },
                    RootSummary {
                        root: PathBuf::from("/work/lib"),
                        files: 2,
                        lines: None,
                        tokens: Some(1500),
                    },
                ],
                failed_roots: vec![PathBuf::from("/work/missing")],
            },
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.5K");
        assert_eq!(format_number(2_000_000), "2.0M");
    }

    #[test]
    fn test_format_path_keeps_tail() {
        let short = Path::new("/work/app");
        assert_eq!(format_path(short, 60), "/work/app");

        let long = Path::new("/very/long/prefix/that/keeps/going/src/module/file.rs");
        let formatted = format_path(long, 24);
        assert!(formatted.starts_with("..."));
        assert!(formatted.ends_with("module/file.rs"));
        assert!(formatted.chars().count() <= 24);
    }

    #[test]
    fn test_console_report() {
        let output = Reporter::new(ReportFormat::ConsoleTable).generate_report(&sample_report());

        assert!(output.contains("RENDERED ROOTS"));
        assert!(output.contains("/work/app"));
        assert!(output.contains("6.0K"));
        assert!(output.contains("1.5K tokens (gpt-4o)"));
        assert!(output.contains("/work/missing"));
        assert!(output.contains("report.md"));
    }
}
