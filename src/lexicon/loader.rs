use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use super::{Lexicon, parse_cmudict};

/// On-disk tag dictionary: both directions of the word/tag relation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagDictionaryFile {
    #[serde(default)]
    pub pos_to_words: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub words_to_pos: HashMap<String, Vec<String>>,
}

pub fn load_tag_dictionary(path: &Path) -> Result<TagDictionaryFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tag dictionary {}", path.display()))?;
    let dictionary: TagDictionaryFile = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse tag dictionary {}", path.display()))?;
    Ok(dictionary)
}

/// Build the shared [`Lexicon`] from a tag dictionary and a CMU dictionary.
pub fn load_lexicon(tags_path: &Path, cmudict_path: &Path) -> Result<Lexicon> {
    let dictionary = load_tag_dictionary(tags_path)?;
    let cmudict = fs::read_to_string(cmudict_path)
        .with_context(|| format!("Failed to read CMU dictionary {}", cmudict_path.display()))?;
    let meters = parse_cmudict(&cmudict);

    let lexicon = lexicon_from_parts(dictionary, meters);
    tracing::info!(
        words = lexicon.vocabulary_size(),
        tags = lexicon.tag_count(),
        "lexicon loaded"
    );
    Ok(lexicon)
}

pub(crate) fn lexicon_from_parts(
    dictionary: TagDictionaryFile,
    meters: HashMap<String, Vec<String>>,
) -> Lexicon {
    let mut tag_index: HashMap<String, BTreeSet<String>> = dictionary
        .pos_to_words
        .into_iter()
        .map(|(tag, words)| (tag, words.into_iter().collect()))
        .collect();

    // Keep both directions consistent even when the file only lists one.
    for (word, tags) in &dictionary.words_to_pos {
        for tag in tags {
            tag_index
                .entry(tag.clone())
                .or_default()
                .insert(word.clone());
        }
    }

    Lexicon::new(tag_index, dictionary.words_to_pos, meters)
}
