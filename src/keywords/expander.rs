//! Keyword expander: seed terms to candidate keywords via synonym lookup.

use std::sync::Arc;

use crate::lexicon::LexicalProvider;

use super::CandidateKeywords;

/// Expands seed terms into every lemma form of every sense they belong to.
#[derive(Clone)]
pub struct KeywordExpander {
    lexicon: Arc<dyn LexicalProvider>,
}

impl KeywordExpander {
    pub fn new(lexicon: Arc<dyn LexicalProvider>) -> Self {
        Self { lexicon }
    }

    /// Union of the lowercased lemma forms of all senses of all seeds.
    ///
    /// Seeds the dictionary does not know contribute nothing. A dictionary
    /// read failure is logged and treated the same way. Multi-word lemma
    /// forms are kept whole.
    pub fn expand<I, S>(&self, seeds: I) -> CandidateKeywords
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut candidates = CandidateKeywords::new();

        for seed in seeds {
            let seed = seed.as_ref().trim();
            if seed.is_empty() {
                continue;
            }
            match self.lexicon.senses(seed) {
                Ok(senses) => {
                    let before = candidates.len();
                    for sense in senses {
                        candidates.extend(sense.lemmas.iter().map(|lemma| lemma.to_lowercase()));
                    }
                    tracing::debug!(
                        seed,
                        added = candidates.len() - before,
                        "Expanded seed term"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        seed,
                        provider = self.lexicon.name(),
                        "Synonym lookup failed, skipping seed: {}",
                        e
                    );
                }
            }
        }

        candidates
    }
}
