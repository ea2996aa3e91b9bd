//! Page text normalization and whole-word tokenization.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Word-boundary runs of word characters; punctuation separates tokens.
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

/// Visible page text, lowercased and whitespace-collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText(String);

impl PageText {
    /// Normalize raw visible text.
    pub fn new(raw: &str) -> Self {
        Self(
            raw.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Distinct whole-word tokens of the text.
    pub fn tokens(&self) -> HashSet<&str> {
        WORD.find_iter(&self.0).map(|m| m.as_str()).collect()
    }
}
