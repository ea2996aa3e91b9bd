//! Lexical dictionary providers.
//!
//! A provider answers one question: which senses does a word belong to, and
//! which lemma forms does each sense carry. Words the dictionary does not
//! know yield an empty list, never an error.

pub mod memory;
pub mod wordnet;

pub use memory::StaticLexicon;
pub use wordnet::WordNetLexicon;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::LexiconConfig;
use crate::error::LexiconError;

/// Part of speech a sense belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 4] = [Self::Noun, Self::Verb, Self::Adjective, Self::Adverb];

    /// File suffix used by the WordNet database (`index.noun`, `noun.exc`, ...).
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adj",
            Self::Adverb => "adv",
        }
    }
}

impl std::fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// One meaning of a word and its synonymous lemma forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    /// Provider-specific identifier, e.g. `noun:02919890` for WordNet.
    pub id: String,
    pub pos: Option<PartOfSpeech>,
    /// Lemma forms exactly as the provider spells them.
    pub lemmas: Vec<String>,
}

impl Sense {
    pub fn new(id: impl Into<String>, lemmas: Vec<String>) -> Self {
        Self {
            id: id.into(),
            pos: None,
            lemmas,
        }
    }

    pub fn with_pos(mut self, pos: PartOfSpeech) -> Self {
        self.pos = Some(pos);
        self
    }
}

/// Source of senses and synonyms for the keyword expander.
pub trait LexicalProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Every sense `word` belongs to. Unknown words return `Ok(vec![])`.
    fn senses(&self, word: &str) -> Result<Vec<Sense>, LexiconError>;

    /// All lemma forms across every sense of `word`, in sense order.
    fn synonyms_of(&self, word: &str) -> Result<Vec<String>, LexiconError> {
        Ok(self
            .senses(word)?
            .into_iter()
            .flat_map(|sense| sense.lemmas)
            .collect())
    }
}

/// Lookup key shared by providers: lowercase, inner whitespace joined by `_`.
pub fn normalize_lookup(word: &str) -> String {
    word.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Open the configured provider: WordNet if a database directory is set,
/// else the JSON thesaurus, else an empty table that expands nothing.
pub fn from_config(config: &LexiconConfig) -> Result<Arc<dyn LexicalProvider>, LexiconError> {
    if let Some(dir) = &config.wordnet_dir {
        let lexicon = WordNetLexicon::open(dir)?;
        tracing::info!(dir = %dir.display(), "Using WordNet dictionary");
        return Ok(Arc::new(lexicon));
    }

    if let Some(path) = &config.thesaurus_path {
        let lexicon = StaticLexicon::from_json_file(path)?;
        tracing::info!(path = %path.display(), words = lexicon.len(), "Using JSON thesaurus");
        return Ok(Arc::new(lexicon));
    }

    tracing::warn!("No dictionary configured (set WORDNET_DIR or KEYWORD_BOT_THESAURUS); keyword expansion will be empty");
    Ok(Arc::new(StaticLexicon::new()))
}
