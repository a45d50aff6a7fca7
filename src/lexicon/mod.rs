pub mod cmudict;
pub mod loader;
pub mod stem;
pub mod stop_words;

pub use cmudict::parse_cmudict;
pub use loader::{TagDictionaryFile, load_lexicon, load_tag_dictionary};
pub use stem::{Stemmer, SuffixStemmer};
pub use stop_words::{is_stop_word, stop_words};

use std::collections::{BTreeSet, HashMap};

/// Tag carried by a comma slot.
pub const COMMA: &str = ",";
/// Tag carried by a full-stop slot.
pub const PERIOD: &str = ".";
/// Tag of proper nouns; the storyline's first word is drawn from it.
pub const PROPER_NOUN: &str = "NNP";

/// Punctuation slots take no syllables.
pub fn is_punctuation(tag: &str) -> bool {
    tag == COMMA || tag == PERIOD
}

/// Immutable dictionary context shared by every search component.
///
/// Holds the tag index (tag -> words), the per-word tag lists (primary tag
/// first), the stress-pattern table, and the allowed syllable counts per tag
/// derived from the other two.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    tag_index: HashMap<String, BTreeSet<String>>,
    word_tags: HashMap<String, Vec<String>>,
    meters: HashMap<String, Vec<String>>,
    tag_syllables: HashMap<String, BTreeSet<usize>>,
}

impl Lexicon {
    pub fn new(
        mut tag_index: HashMap<String, BTreeSet<String>>,
        mut word_tags: HashMap<String, Vec<String>>,
        mut meters: HashMap<String, Vec<String>>,
    ) -> Self {
        for punct in [COMMA, PERIOD] {
            meters.insert(punct.to_string(), vec![String::new()]);
            word_tags
                .entry(punct.to_string())
                .or_insert_with(|| vec![punct.to_string()]);
            tag_index
                .entry(punct.to_string())
                .or_default()
                .insert(punct.to_string());
        }
        let tag_syllables = derive_tag_syllables(&tag_index, &meters);
        Self {
            tag_index,
            word_tags,
            meters,
            tag_syllables,
        }
    }

    pub fn builder() -> LexiconBuilder {
        LexiconBuilder::default()
    }

    /// Ordered tag list of `word`, empty when unknown.
    pub fn tags_of(&self, word: &str) -> &[String] {
        self.word_tags.get(word).map_or(&[], Vec::as_slice)
    }

    pub fn primary_tag(&self, word: &str) -> Option<&str> {
        self.tags_of(word).first().map(String::as_str)
    }

    pub fn has_tag(&self, word: &str, tag: &str) -> bool {
        self.tags_of(word).iter().any(|t| t == tag)
    }

    /// Whether `word` is part of the tagged vocabulary.
    pub fn contains(&self, word: &str) -> bool {
        self.word_tags.contains_key(word)
    }

    pub fn words_with_tag(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.tag_index.get(tag)
    }

    pub fn syllable_patterns(&self, word: &str) -> &[String] {
        self.meters.get(word).map_or(&[], Vec::as_slice)
    }

    /// Syllable count of the primary pronunciation.
    pub fn syllables(&self, word: &str) -> Option<usize> {
        self.syllable_patterns(word).first().map(String::len)
    }

    /// Total syllables of a word sequence; `None` if any word lacks a meter.
    pub fn syllables_of_words<S: AsRef<str>>(&self, words: &[S]) -> Option<usize> {
        words
            .iter()
            .map(|w| self.syllables(w.as_ref()))
            .sum::<Option<usize>>()
    }

    pub fn allowed_syllables(&self, tag: &str) -> Option<&BTreeSet<usize>> {
        self.tag_syllables.get(tag)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.word_tags.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tag_index.len()
    }
}

fn derive_tag_syllables(
    tag_index: &HashMap<String, BTreeSet<String>>,
    meters: &HashMap<String, Vec<String>>,
) -> HashMap<String, BTreeSet<usize>> {
    let mut table: HashMap<String, BTreeSet<usize>> = HashMap::with_capacity(tag_index.len() + 2);
    for (tag, words) in tag_index {
        let counts = table.entry(tag.clone()).or_default();
        for word in words {
            if let Some(pattern) = meters.get(word).and_then(|p| p.first()) {
                counts.insert(pattern.len());
            }
        }
    }
    for punct in [COMMA, PERIOD] {
        table.entry(punct.to_string()).or_default().insert(0);
    }
    table
}

// ── Builder ──────────────────────────────────────────────────

/// Incremental construction of a [`Lexicon`], used by the loaders and tests.
#[derive(Debug, Default)]
pub struct LexiconBuilder {
    tag_index: HashMap<String, BTreeSet<String>>,
    word_tags: HashMap<String, Vec<String>>,
    meters: HashMap<String, Vec<String>>,
}

impl LexiconBuilder {
    /// Register `word` with its tags (primary first) and stress patterns.
    pub fn word(mut self, word: &str, tags: &[&str], patterns: &[&str]) -> Self {
        self.add_word(word, tags.iter().copied(), patterns.iter().copied());
        self
    }

    pub fn add_word<'a>(
        &mut self,
        word: &str,
        tags: impl IntoIterator<Item = &'a str>,
        patterns: impl IntoIterator<Item = &'a str>,
    ) {
        let entry = self.word_tags.entry(word.to_string()).or_default();
        for tag in tags {
            if !entry.iter().any(|t| t == tag) {
                entry.push(tag.to_string());
            }
            self.tag_index
                .entry(tag.to_string())
                .or_default()
                .insert(word.to_string());
        }
        let meter = self.meters.entry(word.to_string()).or_default();
        for pattern in patterns {
            if !meter.iter().any(|p| p == pattern) {
                meter.push(pattern.to_string());
            }
        }
    }

    /// Attach stress patterns without tagging the word.
    pub fn meters(mut self, meters: HashMap<String, Vec<String>>) -> Self {
        for (word, patterns) in meters {
            let entry = self.meters.entry(word).or_default();
            for pattern in patterns {
                if !entry.contains(&pattern) {
                    entry.push(pattern);
                }
            }
        }
        self
    }

    pub fn build(mut self) -> Lexicon {
        self.meters.retain(|_, patterns| !patterns.is_empty());
        Lexicon::new(self.tag_index, self.word_tags, self.meters)
    }
}
