use std::collections::HashSet;
use std::fmt;

use super::embeddings::EmbeddingSpace;
use super::lexical::{LexicalNetwork, definition_words};
use super::rhyme::{RhymeService, RhymeSet, lookup_rhymes};
use crate::error::{Result, SearchError};
use crate::lexicon::{Lexicon, PROPER_NOUN, Stemmer};

/// Five line-ending words. The seed is the second; lines 1, 2 and 5 rhyme,
/// as do lines 3 and 4. No two words share a stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorylineChain {
    words: [String; 5],
}

impl StorylineChain {
    pub fn new(words: [String; 5]) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[String; 5] {
        &self.words
    }

    /// Ending word of line `index` (0-based).
    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn seed(&self) -> &str {
        &self.words[1]
    }
}

impl fmt::Display for StorylineChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.join(", "))
    }
}

/// Discovers a storyline from a seed word using rhymes, dictionary glosses
/// and embedding similarity.
pub struct StorylineChainFinder<'a> {
    lexicon: &'a Lexicon,
    rhymes: &'a dyn RhymeService,
    network: &'a dyn LexicalNetwork,
    embeddings: &'a dyn EmbeddingSpace,
    stemmer: &'a dyn Stemmer,
}

impl<'a> StorylineChainFinder<'a> {
    pub fn new(
        lexicon: &'a Lexicon,
        rhymes: &'a dyn RhymeService,
        network: &'a dyn LexicalNetwork,
        embeddings: &'a dyn EmbeddingSpace,
        stemmer: &'a dyn Stemmer,
    ) -> Self {
        Self {
            lexicon,
            rhymes,
            network,
            embeddings,
            stemmer,
        }
    }

    /// Build the chain around `seed`.
    ///
    /// Every position is attempted before failing, so the error lists all the
    /// words that could not be resolved.
    pub async fn find(&self, seed: &str) -> Result<StorylineChain> {
        let seed = seed.trim().to_lowercase();
        let mut seen = HashSet::from([self.stemmer.stem(&seed)]);
        let seed_rhymes = lookup_rhymes(self.rhymes, &seed).await?;

        let w1 = self.first_unseen(&seed_rhymes, &mut seen, |word| {
            self.lexicon
                .words_with_tag(PROPER_NOUN)
                .is_some_and(|names| names.contains(word))
        });
        let w5 = self.first_unseen(&seed_rhymes, &mut seen, |_| true);

        let w4 = match &w5 {
            Some(w5) => self.link_word(&seed, w5, &mut seen),
            None => None,
        };
        let w3 = match &w4 {
            Some(w4) => self.closest_rhyme(w4, &mut seen).await?,
            None => None,
        };

        match (w1, w3, w4, w5) {
            (Some(w1), Some(w3), Some(w4), Some(w5)) => {
                let chain = StorylineChain::new([w1, seed, w3, w4, w5]);
                tracing::info!(storyline = %chain, "storyline found");
                Ok(chain)
            }
            (w1, w3, w4, w5) => {
                let unresolved: Vec<&'static str> = [
                    ("w1", w1.is_none()),
                    ("w3", w3.is_none()),
                    ("w4", w4.is_none()),
                    ("w5", w5.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                tracing::debug!(seed = %seed, ?unresolved, "storyline unresolved");
                Err(SearchError::NoStorylineFound { seed, unresolved })
            }
        }
    }

    /// First rhyme, in service order, that is known, passes `accept` and has
    /// an unused stem. Its stem is marked used.
    fn first_unseen(
        &self,
        rhymes: &RhymeSet,
        seen: &mut HashSet<String>,
        accept: impl Fn(&str) -> bool,
    ) -> Option<String> {
        let word = rhymes.iter().find(|word| {
            self.lexicon.contains(word)
                && accept(word)
                && !seen.contains(&self.stemmer.stem(word))
        })?;
        seen.insert(self.stemmer.stem(word));
        Some(word.to_string())
    }

    /// Definition word closest to both `w2` and `w5`.
    fn link_word(&self, w2: &str, w5: &str, seen: &mut HashSet<String>) -> Option<String> {
        let mut pool = definition_words(self.network, w2);
        pool.extend(definition_words(self.network, w5));

        let mut best: Option<(f32, String)> = None;
        for word in pool {
            if word == w2 || word == w5 || seen.contains(&self.stemmer.stem(&word)) {
                continue;
            }
            let (Some(a), Some(b)) = (
                self.embeddings.similarity(w2, &word),
                self.embeddings.similarity(w5, &word),
            ) else {
                continue;
            };
            let sim = a + b;
            if sim > best.as_ref().map_or(f32::NEG_INFINITY, |(s, _)| *s) {
                best = Some((sim, word));
            }
        }

        let (_, word) = best?;
        seen.insert(self.stemmer.stem(&word));
        Some(word)
    }

    /// Known rhyme of `w4` most similar to it.
    async fn closest_rhyme(&self, w4: &str, seen: &mut HashSet<String>) -> Result<Option<String>> {
        let rhymes = lookup_rhymes(self.rhymes, w4).await?;

        let mut best: Option<(f32, &str)> = None;
        for word in rhymes.iter() {
            if !self.lexicon.contains(word) || seen.contains(&self.stemmer.stem(word)) {
                continue;
            }
            let Some(sim) = self.embeddings.similarity(word, w4) else {
                continue;
            };
            if sim > best.map_or(f32::NEG_INFINITY, |(s, _)| s) {
                best = Some((sim, word));
            }
        }

        Ok(best.map(|(_, word)| {
            seen.insert(self.stemmer.stem(word));
            word.to_string()
        }))
    }
}
