//! In-memory thesaurus.
//!
//! Useful for tests and for small deployments that ship a hand-curated JSON
//! thesaurus instead of a full WordNet database:
//!
//! ```json
//! { "bakery": [["bakery", "bakeshop", "bakehouse"]], "sales": [["sales"], ["sale"]] }
//! ```

use std::collections::HashMap;
use std::path::Path;

use crate::error::LexiconError;

use super::{LexicalProvider, Sense, normalize_lookup};

/// Sense table held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticLexicon {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl StaticLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add senses for `word`. Each inner slice is one sense's lemma forms.
    pub fn with_senses(mut self, word: &str, senses: &[&[&str]]) -> Self {
        let entry = self.entries.entry(normalize_lookup(word)).or_default();
        entry.extend(
            senses
                .iter()
                .map(|lemmas| lemmas.iter().map(|l| l.to_string()).collect::<Vec<_>>()),
        );
        self
    }

    /// Load a JSON thesaurus: an object mapping words to lists of senses.
    pub fn from_json_file(path: &Path) -> Result<Self, LexiconError> {
        if !path.exists() {
            return Err(LexiconError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, LexiconError> {
        let parsed: HashMap<String, Vec<Vec<String>>> = serde_json::from_str(raw)?;
        let mut entries: HashMap<String, Vec<Vec<String>>> = HashMap::new();
        for (word, senses) in parsed {
            entries
                .entry(normalize_lookup(&word))
                .or_default()
                .extend(senses);
        }
        Ok(Self { entries })
    }

    /// Number of distinct words with at least one sense.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LexicalProvider for StaticLexicon {
    fn name(&self) -> &str {
        "static"
    }

    fn senses(&self, word: &str) -> Result<Vec<Sense>, LexiconError> {
        let key = normalize_lookup(word);
        let Some(senses) = self.entries.get(&key) else {
            return Ok(Vec::new());
        };
        Ok(senses
            .iter()
            .enumerate()
            .map(|(i, lemmas)| Sense::new(format!("{key}.{}", i + 1), lemmas.clone()))
            .collect())
    }
}
