use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::{CellValue, Category, Finding, ReportMode};

/// Accumulated evidence for a single column.
///
/// Findings are appended in row order and never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnFindings {
    pub column: String,
    system_number: Vec<Finding>,
    postcode: Vec<Finding>,
    national_id: Vec<Finding>,
    date_of_birth: Vec<Finding>,
    names: BTreeSet<String>,
}

impl ColumnFindings {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ..Self::default()
        }
    }

    /// Append a finding; rows must arrive in increasing order
    pub fn record(&mut self, category: Category, row: u64, value: &CellValue) {
        let Some(findings) = self.findings_mut(category) else {
            return;
        };
        debug_assert!(
            findings.last().map_or(true, |last| last.row < row),
            "findings for {} out of row order",
            category
        );
        findings.push(Finding {
            row,
            value: value.clone(),
        });
    }

    /// Merge matched name tokens into the column's name set
    pub fn record_names<I: IntoIterator<Item = String>>(&mut self, names: I) {
        self.names.extend(names);
    }

    /// Evidence for a category: the earliest finding only, or all of them
    pub fn evidence(&self, category: Category, mode: ReportMode) -> &[Finding] {
        let all = self.findings(category);
        match mode {
            ReportMode::FirstMatch => &all[..all.len().min(1)],
            ReportMode::AllMatches => all,
        }
    }

    #[allow(dead_code)]
    pub fn first(&self, category: Category) -> Option<&Finding> {
        self.findings(category).first()
    }

    pub fn findings(&self, category: Category) -> &[Finding] {
        match category {
            Category::SystemNumber => &self.system_number,
            Category::Postcode => &self.postcode,
            Category::NationalId => &self.national_id,
            Category::DateOfBirth => &self.date_of_birth,
            Category::Name => &[],
        }
    }

    fn findings_mut(&mut self, category: Category) -> Option<&mut Vec<Finding>> {
        match category {
            Category::SystemNumber => Some(&mut self.system_number),
            Category::Postcode => Some(&mut self.postcode),
            Category::NationalId => Some(&mut self.national_id),
            Category::DateOfBirth => Some(&mut self.date_of_birth),
            Category::Name => None,
        }
    }

    /// Distinct matched name tokens, sorted
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn has_findings(&self) -> bool {
        !self.names.is_empty() || Category::EVIDENCE.iter().any(|c| !self.findings(*c).is_empty())
    }
}

/// Findings for every scanned column, in column selection order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScanFindings {
    columns: Vec<ColumnFindings>,
}

impl ScanFindings {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(ColumnFindings::new).collect(),
        }
    }

    #[allow(dead_code)]
    pub fn get(&self, column: &str) -> Option<&ColumnFindings> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnFindings> {
        self.columns.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ColumnFindings> {
        self.columns.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<ColumnFindings> for ScanFindings {
    fn from_iter<I: IntoIterator<Item = ColumnFindings>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
