//! Princeton WordNet database reader.
//!
//! Reads the plain-text database shipped as `dict/` with WordNet 3.x:
//! `index.{noun,verb,adj,adv}` are loaded into memory at startup, synset
//! lines are read on demand from `data.*` by the byte offset the index
//! points at, and the optional `*.exc` exception lists feed morphology.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::LexiconError;

use super::{LexicalProvider, PartOfSpeech, Sense, normalize_lookup};

/// Suffix detachment rules, tried in order, per part of speech.
fn substitutions(pos: PartOfSpeech) -> &'static [(&'static str, &'static str)] {
    match pos {
        PartOfSpeech::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("ves", "f"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        PartOfSpeech::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        PartOfSpeech::Adjective => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        PartOfSpeech::Adverb => &[],
    }
}

/// Apply every matching suffix rule to each form, deduplicated.
fn detach_suffixes(forms: &[String], pos: PartOfSpeech) -> Vec<String> {
    let mut seen = HashSet::new();
    forms
        .iter()
        .flat_map(|form| {
            substitutions(pos).iter().filter_map(move |(old, new)| {
                form.strip_suffix(old)
                    .filter(|stem| !stem.is_empty())
                    .map(|stem| format!("{stem}{new}"))
            })
        })
        .filter(|reduced| seen.insert(reduced.clone()))
        .collect()
}

/// Index and exception data for one part of speech.
#[derive(Debug, Default)]
struct PosIndex {
    /// lemma -> synset byte offsets into the data file.
    offsets: HashMap<String, Vec<u64>>,
    /// inflected form -> base forms.
    exceptions: HashMap<String, Vec<String>>,
    data_path: PathBuf,
}

/// WordNet-backed lexical provider.
#[derive(Debug)]
pub struct WordNetLexicon {
    dir: PathBuf,
    indexes: HashMap<PartOfSpeech, PosIndex>,
}

impl WordNetLexicon {
    /// Load the index files from a WordNet `dict/` directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let dir = dir.as_ref().to_path_buf();
        let mut indexes = HashMap::new();

        for pos in PartOfSpeech::ALL {
            let index_path = dir.join(format!("index.{}", pos.file_suffix()));
            let data_path = dir.join(format!("data.{}", pos.file_suffix()));
            for path in [&index_path, &data_path] {
                if !path.exists() {
                    return Err(LexiconError::MissingFile { path: path.clone() });
                }
            }

            let offsets = load_index(&index_path)?;
            let exc_path = dir.join(format!("{}.exc", pos.file_suffix()));
            let exceptions = if exc_path.exists() {
                load_exceptions(&exc_path)?
            } else {
                HashMap::new()
            };

            tracing::debug!(
                pos = %pos,
                lemmas = offsets.len(),
                exceptions = exceptions.len(),
                "Loaded WordNet index"
            );

            indexes.insert(
                pos,
                PosIndex {
                    offsets,
                    exceptions,
                    data_path,
                },
            );
        }

        tracing::info!(dir = %dir.display(), "WordNet lexicon ready");
        Ok(Self { dir, indexes })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Base forms of `form` that exist in the index for `pos`.
    ///
    /// An exception-list entry answers directly. Otherwise the surface form
    /// and its one-rule reductions are tried first; while none of them is
    /// indexed the suffix rules are applied again to the reductions, so
    /// `sellings` reaches `sell` through `selling`.
    fn morphy(&self, form: &str, pos: PartOfSpeech) -> Vec<String> {
        let Some(index) = self.indexes.get(&pos) else {
            return Vec::new();
        };

        let indexed = |forms: &[String]| -> Vec<String> {
            let mut seen = HashSet::new();
            forms
                .iter()
                .filter(|f| index.offsets.contains_key(f.as_str()))
                .filter(|f| seen.insert(f.as_str()))
                .cloned()
                .collect()
        };

        if let Some(bases) = index.exceptions.get(form) {
            let mut forms = vec![form.to_string()];
            forms.extend(bases.iter().cloned());
            return indexed(&forms);
        }

        let mut reduced = detach_suffixes(&[form.to_string()], pos);
        let mut forms = vec![form.to_string()];
        forms.extend(reduced.iter().cloned());
        let found = indexed(&forms);
        if !found.is_empty() {
            return found;
        }

        // Every rule shortens the form or cannot re-apply, so this ends.
        while !reduced.is_empty() {
            reduced = detach_suffixes(&reduced, pos);
            let found = indexed(&reduced);
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    fn read_synset(&self, pos: PartOfSpeech, offset: u64) -> Result<Sense, LexiconError> {
        let index = self
            .indexes
            .get(&pos)
            .ok_or_else(|| LexiconError::MissingFile {
                path: self.dir.join(format!("data.{}", pos.file_suffix())),
            })?;

        let mut file = File::open(&index.data_path)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut line = String::new();
        BufReader::new(file).read_line(&mut line)?;

        let file_name = format!("data.{}", pos.file_suffix());
        let lemmas = parse_data_line(&line, offset).map_err(|reason| LexiconError::Malformed {
            file: file_name,
            line: 0,
            reason: format!("synset at offset {offset}: {reason}"),
        })?;

        Ok(Sense::new(format!("{pos}:{offset:08}"), lemmas).with_pos(pos))
    }
}

impl LexicalProvider for WordNetLexicon {
    fn name(&self) -> &str {
        "wordnet"
    }

    fn senses(&self, word: &str) -> Result<Vec<Sense>, LexiconError> {
        let form = normalize_lookup(word);
        if form.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut senses = Vec::new();
        for pos in PartOfSpeech::ALL {
            for base in self.morphy(&form, pos) {
                let offsets = self.indexes[&pos]
                    .offsets
                    .get(&base)
                    .cloned()
                    .unwrap_or_default();
                for offset in offsets {
                    if !seen.insert((pos, offset)) {
                        continue;
                    }
                    senses.push(self.read_synset(pos, offset)?);
                }
            }
        }
        Ok(senses)
    }
}

/// Parse an `index.*` file into lemma -> synset offsets.
///
/// Line layout: `lemma pos synset_cnt p_cnt [ptr...] sense_cnt tagsense_cnt offset...`.
/// License header lines start with a space and are skipped.
fn load_index(path: &Path) -> Result<HashMap<String, Vec<u64>>, LexiconError> {
    let file_name = file_label(path);
    let reader = BufReader::new(File::open(path)?);
    let mut offsets = HashMap::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with(' ') || line.trim().is_empty() {
            continue;
        }
        let (lemma, synsets) =
            parse_index_line(&line).map_err(|reason| LexiconError::Malformed {
                file: file_name.clone(),
                line: i + 1,
                reason,
            })?;
        offsets.insert(lemma, synsets);
    }
    Ok(offsets)
}

fn parse_index_line(line: &str) -> Result<(String, Vec<u64>), String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 6 {
        return Err(format!("expected at least 6 fields, found {}", fields.len()));
    }
    let synset_cnt: usize = fields[2]
        .parse()
        .map_err(|_| format!("bad synset_cnt {:?}", fields[2]))?;
    let p_cnt: usize = fields[3]
        .parse()
        .map_err(|_| format!("bad p_cnt {:?}", fields[3]))?;
    let start = 6 + p_cnt;
    if synset_cnt == 0 || fields.len() < start + synset_cnt {
        return Err(format!("synset_cnt {synset_cnt} does not fit the line"));
    }
    let offsets = fields[start..start + synset_cnt]
        .iter()
        .map(|f| f.parse::<u64>().map_err(|_| format!("bad offset {f:?}")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((fields[0].to_lowercase(), offsets))
}

/// Parse a `*.exc` file: `inflected base [base...]` per line.
fn load_exceptions(path: &Path) -> Result<HashMap<String, Vec<String>>, LexiconError> {
    let reader = BufReader::new(File::open(path)?);
    let mut exceptions = HashMap::new();
    for line in reader.lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        let Some(inflected) = fields.next() else {
            continue;
        };
        let bases: Vec<String> = fields.map(str::to_string).collect();
        if !bases.is_empty() {
            exceptions.insert(inflected.to_lowercase(), bases);
        }
    }
    Ok(exceptions)
}

/// Extract the lemma forms from a `data.*` synset line.
///
/// Line layout: `offset lex_filenum ss_type w_cnt word lex_id [word lex_id...] p_cnt ... | gloss`,
/// with `w_cnt` and `lex_id` in hex.
fn parse_data_line(line: &str, expected_offset: u64) -> Result<Vec<String>, String> {
    let body = line.split('|').next().unwrap_or_default();
    let fields: Vec<&str> = body.split_whitespace().collect();
    if fields.len() < 6 {
        return Err(format!("expected at least 6 fields, found {}", fields.len()));
    }

    let offset: u64 = fields[0]
        .parse()
        .map_err(|_| format!("bad offset {:?}", fields[0]))?;
    if offset != expected_offset {
        return Err(format!("line starts with offset {offset}"));
    }

    let w_cnt = usize::from_str_radix(fields[3], 16)
        .map_err(|_| format!("bad w_cnt {:?}", fields[3]))?;
    if fields.len() < 4 + w_cnt * 2 {
        return Err(format!("w_cnt {w_cnt} does not fit the line"));
    }

    Ok(fields[4..4 + w_cnt * 2]
        .iter()
        .step_by(2)
        .map(|word| strip_adjective_marker(word).to_string())
        .collect())
}

/// Drop syntactic markers such as `(a)`, `(p)` and `(ip)` from adjective lemmas.
fn strip_adjective_marker(word: &str) -> &str {
    match word.find('(') {
        Some(idx) if word.ends_with(')') && idx > 0 => &word[..idx],
        _ => word,
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
