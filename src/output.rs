use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::scan::{ScanReport, ScanStatus};
use crate::types::{Category, Finding, ReportMode, Result};

/// Report rendering formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Serializable audit of one scanned file
#[derive(Debug, Serialize)]
pub struct AuditReport<'a> {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,
    pub mode: ReportMode,
    pub rows_scanned: u64,
    pub status: &'a ScanStatus,
    pub columns: Vec<ColumnReport<'a>>,
}

/// Evidence surfaced for one column under the report mode
#[derive(Debug, Serialize)]
pub struct ColumnReport<'a> {
    pub column: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub evidence: BTreeMap<Category, &'a [Finding]>,
    #[serde(skip_serializing_if = "no_names")]
    pub names: &'a BTreeSet<String>,
}

fn no_names(names: &&BTreeSet<String>) -> bool {
    names.is_empty()
}

impl<'a> AuditReport<'a> {
    pub fn new(
        file_name: impl Into<String>,
        file_hash: Option<String>,
        mode: ReportMode,
        report: &'a ScanReport,
    ) -> Self {
        let columns = report
            .findings
            .iter()
            .map(|col| ColumnReport {
                column: &col.column,
                evidence: Category::EVIDENCE
                    .iter()
                    .map(|&category| (category, col.evidence(category, mode)))
                    .filter(|(_, found)| !found.is_empty())
                    .collect(),
                names: col.names(),
            })
            .collect();

        Self {
            file_name: file_name.into(),
            file_hash,
            mode,
            rows_scanned: report.rows_scanned,
            status: &report.status,
            columns,
        }
    }
}

/// Render the human-readable audit, one line per reported finding
pub fn render_text(report: &ScanReport, mode: ReportMode) -> String {
    let mut out = String::new();

    for col in report.findings.iter() {
        for category in Category::EVIDENCE {
            for finding in col.evidence(category, mode) {
                let _ = match mode {
                    ReportMode::FirstMatch => writeln!(
                        out,
                        "Column \"{}\" may contain a {} first found in row {} in value {}",
                        col.column,
                        category.label(),
                        finding.row,
                        finding.value
                    ),
                    ReportMode::AllMatches => writeln!(
                        out,
                        "Column \"{}\" may contain a {} in row {} in value {}",
                        col.column,
                        category.label(),
                        finding.row,
                        finding.value
                    ),
                };
            }
        }

        if !col.names().is_empty() {
            let names: Vec<&str> = col.names().iter().map(String::as_str).collect();
            let _ = writeln!(
                out,
                "Column \"{}\" may contain the names: {}",
                col.column,
                names.join(", ")
            );
        }
    }

    if let ScanStatus::Incomplete { row, reason } = &report.status {
        let _ = writeln!(out, "Scan incomplete: stopped at row {}: {}", row, reason);
    }

    out
}

/// Write audit to JSON file
pub fn write_json_file(audit: &AuditReport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, audit)?;
    Ok(())
}

/// Write audit to JSON string
pub fn to_json_string(audit: &AuditReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(audit)?)
}

/// Write rendered text to a file
pub fn write_text_file(text: &str, path: &Path) -> Result<()> {
    std::fs::write(path, text)?;
    Ok(())
}

/// Write rendered output to stdout
pub fn write_stdout(content: &str) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write!(handle, "{}", content)?;
    if !content.is_empty() && !content.ends_with('\n') {
        writeln!(handle)?;
    }
    Ok(())
}
