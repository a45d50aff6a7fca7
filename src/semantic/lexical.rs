use anyhow::Context;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use crate::lexicon::is_stop_word;

/// Dictionary-style glosses for a word (one string per sense).
pub trait LexicalNetwork: Send + Sync {
    fn definitions(&self, word: &str) -> Vec<String>;
}

/// Content words of every gloss of `word`: punctuation stripped, lower-cased,
/// stop words removed. Sorted so downstream iteration is deterministic.
pub fn definition_words<N: LexicalNetwork + ?Sized>(network: &N, word: &str) -> BTreeSet<String> {
    network
        .definitions(word)
        .iter()
        .flat_map(|gloss| {
            strip_punctuation(gloss)
                .to_lowercase()
                .split_whitespace()
                .filter(|w| !is_stop_word(w))
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}

/// Glosses held in memory, loaded from a `{"word": ["gloss", ..]}` file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLexicalNetwork {
    glosses: HashMap<String, Vec<String>>,
}

impl InMemoryLexicalNetwork {
    pub fn new(glosses: HashMap<String, Vec<String>>) -> Self {
        Self { glosses }
    }

    pub fn len(&self) -> usize {
        self.glosses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glosses.is_empty()
    }
}

impl LexicalNetwork for InMemoryLexicalNetwork {
    fn definitions(&self, word: &str) -> Vec<String> {
        self.glosses.get(word).cloned().unwrap_or_default()
    }
}

pub fn load_definitions(path: &Path) -> anyhow::Result<InMemoryLexicalNetwork> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read definitions {}", path.display()))?;
    let glosses: HashMap<String, Vec<String>> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse definitions {}", path.display()))?;
    tracing::info!(words = glosses.len(), "definitions loaded");
    Ok(InMemoryLexicalNetwork::new(glosses))
}
