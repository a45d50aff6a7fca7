use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashMap;

use super::{Template, TemplateCorpus, TemplateEntry};
use crate::error::{Result, SearchError};
use crate::lexicon::Lexicon;

/// Random access into a [`TemplateCorpus`].
///
/// The selector never owns randomness; every draw takes the caller's rng so
/// runs are reproducible from a single seed.
#[derive(Debug, Clone, Copy)]
pub struct TemplateSelector<'c> {
    corpus: &'c TemplateCorpus,
}

impl<'c> TemplateSelector<'c> {
    pub fn new(corpus: &'c TemplateCorpus) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &'c TemplateCorpus {
        self.corpus
    }

    /// Uniform choice among templates ending in `tag` with exactly `length`
    /// slots.
    pub fn sample_by_end_tag_and_length<R: Rng + ?Sized>(
        &self,
        tag: &str,
        length: usize,
        rng: &mut R,
    ) -> Result<Template> {
        self.corpus
            .by_end(tag, length)
            .and_then(|templates| templates.choose(rng))
            .cloned()
            .ok_or_else(|| SearchError::NoTemplateFound {
                key: format!("({tag}, {length})"),
            })
    }

    /// Template for a line ending in `last_word` with `syllables` in total.
    ///
    /// The template length is the syllable budget left after the last word,
    /// which assumes mostly single-syllable words in front of it.
    pub fn sample_for_line<R: Rng + ?Sized>(
        &self,
        lexicon: &Lexicon,
        last_word: &str,
        syllables: usize,
        rng: &mut R,
    ) -> Result<Template> {
        let tag = lexicon
            .primary_tag(last_word)
            .ok_or_else(|| SearchError::NoTemplateFound {
                key: format!("untagged word '{last_word}'"),
            })?;
        let last_syllables =
            lexicon
                .syllables(last_word)
                .ok_or_else(|| SearchError::NoTemplateFound {
                    key: format!("word '{last_word}' without meter"),
                })?;
        let length = syllables.checked_sub(last_syllables).ok_or_else(|| {
            SearchError::NoTemplateFound {
                key: format!("({tag}, {syllables} - {last_syllables})"),
            }
        })?;
        self.sample_by_end_tag_and_length(tag, length, rng)
    }

    /// Up to `k` distinct entries from the bucket for `tag`.
    pub fn sample_k<R: Rng + ?Sized>(
        buckets: &HashMap<String, Vec<TemplateEntry>>,
        tag: &str,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<TemplateEntry>> {
        let bucket = buckets
            .get(tag)
            .ok_or_else(|| SearchError::NoTemplateFound {
                key: format!("bucket '{tag}'"),
            })?;
        Ok(bucket.choose_multiple(rng, k).cloned().collect())
    }

    /// Up to `k` paired fourth/fifth-line templates for the tag-pair `key`,
    /// already split into their two lines.
    pub fn sample_pairs<R: Rng + ?Sized>(
        &self,
        key: &str,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<(TemplateEntry, TemplateEntry)>> {
        let pairs = self
            .corpus
            .last_two_lines(key)
            .ok_or_else(|| SearchError::NoTemplateFound {
                key: format!("pair '{key}'"),
            })?;
        pairs
            .choose_multiple(rng, k)
            .map(super::PairedTemplate::split)
            .collect()
    }

    /// Draw from the transition corpus, picking a bucket with probability
    /// proportional to its size and then a template uniformly inside it.
    pub fn sample_weighted<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Template> {
        let mut keys: Vec<&String> = self
            .corpus
            .transitions()
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(key, _)| key)
            .collect();
        keys.sort();

        let total: usize = keys
            .iter()
            .map(|key| self.corpus.transitions()[key.as_str()].len())
            .sum();
        if total == 0 {
            return Err(SearchError::NoTemplateFound {
                key: "transition corpus".into(),
            });
        }

        // Uniform over all entries is the same as size-weighted bucket choice.
        let mut index = rng.random_range(0..total);
        for key in keys {
            let entries = &self.corpus.transitions()[key.as_str()];
            if index < entries.len() {
                return Ok(entries[index].template.clone());
            }
            index -= entries.len();
        }
        Err(SearchError::NoTemplateFound {
            key: "transition corpus".into(),
        })
    }
}
