//! Keyword derivation: synonym expansion of seed terms, then filtering
//! against the text of the user's website.

pub mod expander;
pub mod filter;
pub mod text;

pub use expander::KeywordExpander;
pub use filter::{RelevanceFilter, is_fetchable_url, relevant_keywords};
pub use text::PageText;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::fetch::PageFetcher;
use crate::lexicon::LexicalProvider;

/// Deduplicated lowercase candidate keywords. Ordered so that output built
/// from it is deterministic.
pub type CandidateKeywords = BTreeSet<String>;

/// Expander and filter wired together.
#[derive(Clone)]
pub struct KeywordPipeline {
    pub expander: KeywordExpander,
    pub filter: RelevanceFilter,
}

impl KeywordPipeline {
    pub fn new(lexicon: Arc<dyn LexicalProvider>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            expander: KeywordExpander::new(lexicon),
            filter: RelevanceFilter::new(fetcher),
        }
    }

    /// Expand `seeds`, then keep the candidates found on the page at `url`.
    pub async fn relevant_keywords<I, S>(&self, seeds: I, url: Option<&str>) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidates = self.expander.expand(seeds);
        self.filter.filter_by_url(&candidates, url).await
    }
}
