use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::types::Result;

/// Lowercase name tokens that the name detector matches against.
///
/// Built once before a scan and only ever read afterwards.
#[derive(Debug, Clone, Default)]
pub struct NameCorpus {
    names: HashSet<String>,
}

impl NameCorpus {
    /// Build a corpus from arbitrary names, normalising each one
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .filter_map(|n| {
                let n = n.as_ref().trim();
                if n.is_empty() {
                    None
                } else {
                    Some(n.to_lowercase())
                }
            })
            .collect();
        Self { names }
    }

    /// Load a newline-delimited name list
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line?);
        }

        let corpus = Self::from_names(lines);
        if corpus.is_empty() {
            return Err(Error::Corpus(format!(
                "no names found in {}",
                path.display()
            )));
        }

        debug!(path = %path.display(), names = corpus.len(), "loaded name corpus");
        Ok(corpus)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.names.contains(token)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
