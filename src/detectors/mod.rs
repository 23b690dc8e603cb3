pub mod birth_date;
pub mod names;
pub mod nhs_number;
pub mod value_patterns;

use std::collections::BTreeSet;

use chrono::NaiveDate;

pub use birth_date::{contains_birth_date, BirthDateWindow};
pub use names::matching_names;
pub use nhs_number::contains_nhs_number;
pub use value_patterns::{contains_postcode, contains_system_number};

use crate::corpus::NameCorpus;
use crate::types::{CellValue, Category};

/// Everything the detectors found in a single cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellMatches {
    pub system_number: bool,
    pub postcode: bool,
    pub national_id: bool,
    pub date_of_birth: bool,
    pub names: BTreeSet<String>,
}

impl CellMatches {
    /// Evidence-bearing categories that matched, in report order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::EVIDENCE
            .into_iter()
            .filter(move |c| self.matched(*c))
    }

    pub fn matched(&self, category: Category) -> bool {
        match category {
            Category::SystemNumber => self.system_number,
            Category::Postcode => self.postcode,
            Category::NationalId => self.national_id,
            Category::DateOfBirth => self.date_of_birth,
            Category::Name => !self.names.is_empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.system_number || self.postcode || self.national_id || self.date_of_birth)
            && self.names.is_empty()
    }
}

/// The five detectors bound to a name corpus and a reference date
#[derive(Debug, Clone, Copy)]
pub struct DetectorSet<'a> {
    corpus: &'a NameCorpus,
    window: BirthDateWindow,
}

impl<'a> DetectorSet<'a> {
    pub fn new(corpus: &'a NameCorpus, reference_date: NaiveDate) -> Self {
        Self {
            corpus,
            window: BirthDateWindow::new(reference_date),
        }
    }

    /// Run every detector against one cell
    pub fn detect(&self, value: &CellValue) -> CellMatches {
        CellMatches {
            system_number: contains_system_number(value),
            postcode: contains_postcode(value),
            national_id: contains_nhs_number(value),
            date_of_birth: contains_birth_date(value, &self.window),
            names: matching_names(value, self.corpus),
        }
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.window.reference()
    }
}
