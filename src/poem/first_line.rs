use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{Result, SearchError};
use crate::lexicon::Lexicon;
use crate::semantic::RhymeSet;

/// Category used for city names in [`FirstLineResources::templates`].
pub const CITY_CATEGORY: &str = "city";

/// Word sequences that introduce a limerick's subject, keyed by the kind of
/// name that ends the line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirstLineResources {
    /// Name -> category (e.g. `"female"`, `"male"`).
    #[serde(default)]
    pub names: HashMap<String, String>,
    #[serde(default)]
    pub cities: BTreeSet<String>,
    /// Category -> openings such as `["there", "once", "was", "a", "girl", "named"]`.
    #[serde(default)]
    pub templates: HashMap<String, Vec<Vec<String>>>,
}

pub fn load_first_line_resources(path: &Path) -> anyhow::Result<FirstLineResources> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read first-line resources {}", path.display()))?;
    let resources: FirstLineResources = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse first-line resources {}", path.display()))?;
    tracing::info!(
        names = resources.names.len(),
        cities = resources.cities.len(),
        "first-line resources loaded"
    );
    Ok(resources)
}

/// Builds opening lines that end in a name or city rhyming with a word.
#[derive(Debug, Clone, Copy)]
pub struct FirstLineBuilder<'a> {
    lexicon: &'a Lexicon,
    resources: &'a FirstLineResources,
}

impl<'a> FirstLineBuilder<'a> {
    pub fn new(lexicon: &'a Lexicon, resources: &'a FirstLineResources) -> Self {
        Self { lexicon, resources }
    }

    /// Every opening + rhyming name whose syllables total `syllables`.
    ///
    /// Names come before cities, each in rhyme order. Openings with a word
    /// outside the meter table are skipped.
    pub fn candidates(
        &self,
        rhyme_word: &str,
        rhymes: &RhymeSet,
        syllables: usize,
    ) -> Result<Vec<Vec<String>>> {
        let names = rhymes.iter().filter_map(|word| {
            self.resources
                .names
                .get(word)
                .map(|category| (word, category.as_str()))
        });
        let cities = rhymes
            .iter()
            .filter(|word| self.resources.cities.contains(*word))
            .map(|word| (word, CITY_CATEGORY));

        let mut lines = Vec::new();
        for (name, category) in names.chain(cities) {
            let Some(name_syllables) = self.lexicon.syllables(name) else {
                continue;
            };
            let Some(openings) = self.resources.templates.get(category) else {
                continue;
            };
            for opening in openings {
                let fits = self
                    .lexicon
                    .syllables_of_words(opening)
                    .is_some_and(|n| n + name_syllables == syllables);
                if fits {
                    let mut line = opening.clone();
                    line.push(name.to_string());
                    lines.push(line);
                }
            }
        }

        if lines.is_empty() {
            return Err(SearchError::no_line(
                rhyme_word,
                format!("no opening line fits {syllables} syllables"),
            ));
        }
        Ok(lines)
    }
}
