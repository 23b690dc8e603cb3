use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::corpus::NameCorpus;
use crate::types::CellValue;

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());

/// Whole tokens of a string cell that appear in the name corpus.
///
/// The value is lowercased and digits count as separators, so `Smith3`
/// yields the token `smith`.
pub fn matching_names(value: &CellValue, corpus: &NameCorpus) -> BTreeSet<String> {
    let Some(text) = value.as_text() else {
        return BTreeSet::new();
    };

    let lowered = text.to_lowercase();
    let spaced = DIGIT.replace_all(&lowered, " ");

    NON_WORD
        .split(&spaced)
        .filter(|token| !token.is_empty() && corpus.contains(token))
        .map(str::to_string)
        .collect()
}
