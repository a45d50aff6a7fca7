pub mod selector;

pub use selector::TemplateSelector;

use anyhow::{Context, Result as AnyResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Result, SearchError};
use crate::lexicon::is_punctuation;

/// Longest template the meter planner will be asked to enumerate.
pub const MAX_TEMPLATE_LEN: usize = 15;

/// Ordered grammatical tags describing one line; the last tag belongs to the
/// fixed line-ending word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Template {
    tags: Vec<String>,
}

impl Template {
    pub fn new(tags: Vec<String>) -> Result<Self> {
        if tags.is_empty() {
            return Err(SearchError::InvalidTemplate("template is empty".into()));
        }
        if tags.len() > MAX_TEMPLATE_LEN {
            return Err(SearchError::InvalidTemplate(format!(
                "{} tags exceeds the limit of {MAX_TEMPLATE_LEN}",
                tags.len()
            )));
        }
        Ok(Self { tags })
    }

    pub fn from_tags(tags: &[&str]) -> Result<Self> {
        Self::new(tags.iter().map(ToString::to_string).collect())
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tag(&self, index: usize) -> Option<&str> {
        self.tags.get(index).map(String::as_str)
    }

    pub fn last_tag(&self) -> &str {
        self.tags.last().map_or("", String::as_str)
    }

    /// Slots that carry words rather than punctuation.
    pub fn word_slots(&self) -> usize {
        self.tags.iter().filter(|t| !is_punctuation(t)).count()
    }

}

impl TryFrom<Vec<String>> for Template {
    type Error = SearchError;

    fn try_from(tags: Vec<String>) -> Result<Self> {
        Self::new(tags)
    }
}

impl From<Template> for Vec<String> {
    fn from(template: Template) -> Self {
        template.tags
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tags.join(" "))
    }
}

/// A corpus template together with the line it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub template: Template,
    pub example: Vec<String>,
}

impl TemplateEntry {
    pub fn new(template: Template) -> Self {
        Self {
            template,
            example: Vec::new(),
        }
    }
}

/// A two-line template (fourth + fifth line) with the index of the last tag
/// belonging to the first line.
///
/// The combined tags are kept raw: the length limit applies to each half
/// once split, not to the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedTemplate {
    tags: Vec<String>,
    example: Vec<String>,
    split: usize,
}

impl PairedTemplate {
    /// Fails when `split` leaves either line empty.
    pub fn new(tags: Vec<String>, example: Vec<String>, split: usize) -> Result<Self> {
        if split + 1 >= tags.len() {
            return Err(SearchError::InvalidTemplate(format!(
                "split index {split} out of range for {} paired tags",
                tags.len()
            )));
        }
        Ok(Self {
            tags,
            example,
            split,
        })
    }

    pub fn from_tags(tags: &[&str], split: usize) -> Result<Self> {
        Self::new(tags.iter().map(ToString::to_string).collect(), Vec::new(), split)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn split_index(&self) -> usize {
        self.split
    }

    /// Fourth and fifth line entries; each half must be a valid template.
    pub fn split(&self) -> Result<(TemplateEntry, TemplateEntry)> {
        let first = Template::new(self.tags[..=self.split].to_vec())?;
        let second = Template::new(self.tags[self.split + 1..].to_vec())?;
        let cut = (self.split + 1).min(self.example.len());
        Ok((
            TemplateEntry {
                template: first,
                example: self.example[..cut].to_vec(),
            },
            TemplateEntry {
                template: second,
                example: self.example[cut..].to_vec(),
            },
        ))
    }
}

/// Which line-position bucket a template set serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePosition {
    Second,
    Third,
}

// ── Corpus ───────────────────────────────────────────────────

/// Read-only template corpus.
///
/// Templates are indexed by `(end tag, length)` for single-line sampling,
/// bucketed by ending tag for the second and third lines, and keyed by
/// `"TAG4-TAG5"` for paired fourth/fifth lines.
#[derive(Debug, Clone, Default)]
pub struct TemplateCorpus {
    transitions: HashMap<String, Vec<TemplateEntry>>,
    by_end: HashMap<(String, usize), Vec<Template>>,
    second_line: HashMap<String, Vec<TemplateEntry>>,
    third_line: HashMap<String, Vec<TemplateEntry>>,
    last_two_lines: HashMap<String, Vec<PairedTemplate>>,
}

impl TemplateCorpus {
    /// Build from the tag-pair transition corpus; every template is also
    /// indexed by its ending tag and length.
    pub fn new(transitions: HashMap<String, Vec<TemplateEntry>>) -> Self {
        let mut by_end: HashMap<(String, usize), Vec<Template>> = HashMap::new();
        for entries in transitions.values() {
            for entry in entries {
                let template = &entry.template;
                by_end
                    .entry((template.last_tag().to_string(), template.len()))
                    .or_default()
                    .push(template.clone());
            }
        }
        Self {
            transitions,
            by_end,
            ..Self::default()
        }
    }

    pub fn from_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let entries = templates.into_iter().map(TemplateEntry::new).collect();
        Self::new(HashMap::from([(String::new(), entries)]))
    }

    pub fn with_line_buckets(
        mut self,
        position: LinePosition,
        buckets: HashMap<String, Vec<TemplateEntry>>,
    ) -> Self {
        match position {
            LinePosition::Second => self.second_line = buckets,
            LinePosition::Third => self.third_line = buckets,
        }
        self
    }

    pub fn with_last_two_lines(mut self, pairs: HashMap<String, Vec<PairedTemplate>>) -> Self {
        self.last_two_lines = pairs;
        self
    }

    pub fn by_end(&self, tag: &str, length: usize) -> Option<&[Template]> {
        self.by_end
            .get(&(tag.to_string(), length))
            .map(Vec::as_slice)
    }

    pub fn transitions(&self) -> &HashMap<String, Vec<TemplateEntry>> {
        &self.transitions
    }

    pub fn line_buckets(&self, position: LinePosition) -> &HashMap<String, Vec<TemplateEntry>> {
        match position {
            LinePosition::Second => &self.second_line,
            LinePosition::Third => &self.third_line,
        }
    }

    pub fn last_two_lines(&self, key: &str) -> Option<&[PairedTemplate]> {
        self.last_two_lines.get(key).map(Vec::as_slice)
    }

    pub fn template_count(&self) -> usize {
        self.by_end.values().map(Vec::len).sum()
    }
}

// ── Loading ──────────────────────────────────────────────────

type RawEntry = (Vec<String>, Vec<String>);
type RawPair = (Vec<String>, Vec<String>, usize);

/// On-disk corpus layout: every bucket maps a key to `[tags, example]`
/// entries; paired entries carry a third split-index element.
#[derive(Debug, Default, Deserialize)]
pub struct TemplateCorpusFile {
    #[serde(default)]
    pub templates: HashMap<String, Vec<RawEntry>>,
    #[serde(default)]
    pub second_line: HashMap<String, Vec<RawEntry>>,
    #[serde(default)]
    pub third_line: HashMap<String, Vec<RawEntry>>,
    #[serde(default)]
    pub last_two_lines: HashMap<String, Vec<RawPair>>,
}

impl TemplateCorpusFile {
    pub fn into_corpus(self) -> TemplateCorpus {
        let mut skipped = 0_usize;
        let mut entries = |raw: HashMap<String, Vec<RawEntry>>| {
            raw.into_iter()
                .map(|(key, list)| {
                    let valid = list
                        .into_iter()
                        .filter_map(|(tags, example)| match Template::new(tags) {
                            Ok(template) => Some(TemplateEntry { template, example }),
                            Err(_) => {
                                skipped += 1;
                                None
                            }
                        })
                        .collect();
                    (key, valid)
                })
                .collect::<HashMap<_, Vec<_>>>()
        };

        let transitions = entries(self.templates);
        let second = entries(self.second_line);
        let third = entries(self.third_line);

        let pairs = self
            .last_two_lines
            .into_iter()
            .map(|(key, list)| {
                let valid = list
                    .into_iter()
                    .filter_map(|(tags, example, split)| {
                        match PairedTemplate::new(tags, example, split) {
                            Ok(pair) => Some(pair),
                            Err(_) => {
                                skipped += 1;
                                None
                            }
                        }
                    })
                    .collect();
                (key, valid)
            })
            .collect();

        if skipped > 0 {
            tracing::debug!(skipped, "dropped malformed or overlong templates");
        }

        TemplateCorpus::new(transitions)
            .with_line_buckets(LinePosition::Second, second)
            .with_line_buckets(LinePosition::Third, third)
            .with_last_two_lines(pairs)
    }
}

pub fn load_template_corpus(path: &Path) -> AnyResult<TemplateCorpus> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template corpus {}", path.display()))?;
    let file: TemplateCorpusFile = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse template corpus {}", path.display()))?;
    let corpus = file.into_corpus();
    tracing::info!(templates = corpus.template_count(), "template corpus loaded");
    Ok(corpus)
}
