use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::corpus::NameCorpus;
use crate::detectors::DetectorSet;
use crate::findings::ScanFindings;
use crate::readers::RowSource;
use crate::types::{CellValue, Result, ScanOptions};

/// Whether the row source was read to the end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScanStatus {
    Complete,
    /// The row source failed before `row` could be read; findings cover
    /// rows before it only
    Incomplete { row: u64, reason: String },
}

/// Outcome of one scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub findings: ScanFindings,
    pub rows_scanned: u64,
    pub status: ScanStatus,
}

impl ScanReport {
    pub fn is_complete(&self) -> bool {
        self.status == ScanStatus::Complete
    }
}

/// Applies every detector to every selected cell of a row source
pub struct Scanner<'a> {
    detectors: DetectorSet<'a>,
    options: ScanOptions,
}

impl<'a> Scanner<'a> {
    pub fn new(corpus: &'a NameCorpus, options: ScanOptions) -> Self {
        let reference_date = options
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive());

        Self {
            detectors: DetectorSet::new(corpus, reference_date),
            options,
        }
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.detectors.reference_date()
    }

    /// Consume `source` once, in order, collecting findings per column.
    ///
    /// A failing row source ends the scan; the findings gathered so far are
    /// returned with an incomplete status.
    pub fn scan(&self, source: &mut dyn RowSource) -> ScanReport {
        let (columns, positions) =
            resolve_columns(source.headers(), self.options.columns.as_deref());

        let mut findings = ScanFindings::new(columns);
        debug!(
            columns = findings.len(),
            reference_date = %self.reference_date(),
            "starting scan"
        );
        let mut rows_scanned: u64 = 0;
        let mut status = ScanStatus::Complete;
        let null = CellValue::Null;

        while let Some(next) = source.next_row() {
            let row = rows_scanned;
            let record = match next {
                Ok(record) => record,
                Err(e) => {
                    warn!(row, error = %e, "row source failed, reporting partial findings");
                    status = ScanStatus::Incomplete {
                        row,
                        reason: e.to_string(),
                    };
                    break;
                }
            };

            if self.options.progress_every > 0 && row % self.options.progress_every == 0 {
                info!("Analysed {} rows", row);
            }

            for (column, position) in findings.iter_mut().zip(&positions) {
                let value = position.map_or(&null, |idx| record.get_index(idx));
                let matches = self.detectors.detect(value);
                if matches.is_empty() {
                    continue;
                }

                for category in matches.categories() {
                    column.record(category, row, value);
                }
                column.record_names(matches.names);
            }

            rows_scanned += 1;
        }

        info!(
            rows = rows_scanned,
            flagged_columns = findings.iter().filter(|c| c.has_findings()).count(),
            complete = status == ScanStatus::Complete,
            "scan finished"
        );

        ScanReport {
            findings,
            rows_scanned,
            status,
        }
    }
}

/// Pair each column to scan with its header position.
///
/// A repeated header name is scanned once per occurrence; a selected name
/// missing from the header is scanned as null.
fn resolve_columns(
    headers: &[String],
    selected: Option<&[String]>,
) -> (Vec<String>, Vec<Option<usize>>) {
    let Some(selected) = selected else {
        return headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), Some(idx)))
            .unzip();
    };

    selected
        .iter()
        .flat_map(|column| {
            let matches: Vec<usize> = headers
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == column)
                .map(|(idx, _)| idx)
                .collect();

            if matches.is_empty() {
                warn!(column = %column, "selected column not in header, scanning as empty");
                vec![(column.clone(), None)]
            } else {
                if matches.len() > 1 {
                    warn!(
                        column = %column,
                        copies = matches.len(),
                        "column name repeated in header, scanning every copy"
                    );
                }
                matches
                    .into_iter()
                    .map(|idx| (column.clone(), Some(idx)))
                    .collect()
            }
        })
        .unzip()
}

/// Compute SHA-256 hash of a file (streaming to handle large files)
pub fn file_sha256(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}
