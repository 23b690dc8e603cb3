use std::collections::VecDeque;
use std::sync::Arc;

use crate::types::{CellValue, Result};

use super::{Record, RowSource};

/// Rows held in memory, for datasets built in-process
#[allow(dead_code)]
#[derive(Debug)]
pub struct MemorySource {
    headers: Arc<[String]>,
    rows: VecDeque<Result<Vec<CellValue>>>,
}

#[allow(dead_code)]
impl MemorySource {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: VecDeque::new(),
        }
    }

    /// Append a row of values in header order
    pub fn with_row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.rows
            .push_back(Ok(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Append a transport failure at this position
    pub fn with_error(mut self, error: crate::error::Error) -> Self {
        self.rows.push_back(Err(error));
        self
    }

    /// Rows not yet consumed
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for MemorySource {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn next_row(&mut self) -> Option<Result<Record>> {
        let row = self.rows.pop_front()?;
        Some(row.map(|values| Record::new(Arc::clone(&self.headers), values)))
    }
}
