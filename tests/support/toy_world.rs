use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use limericks::error::{Result, SearchError};
use limericks::lexicon::Lexicon;
use limericks::oracle::{BackwardOracle, ForwardOracle, PromptGenerator};
use limericks::poem::{AssemblySettings, FirstLineResources};
use limericks::search::SearchOptions;
use limericks::semantic::{InMemoryLexicalNetwork, StaticRhymes, StorylineChain, WordVectors};
use limericks::template::{LinePosition, PairedTemplate, Template, TemplateCorpus, TemplateEntry};

/// Syllables of lines 1, 2 and 5 in the toy world; lines 3 and 4 get 3.
pub const FULL_LINE: usize = 6;
#[allow(dead_code)]
pub const SHORT_LINE: usize = 3;

pub const VOCABULARY: &[&str] = &[
    "the", "a", "happy", "big", "cat", "dog", "saw", "ate", "moon", "june", "spoon", "tune",
    "light", "night", "bright", "sky", "there", "was", "girl", "named",
];

/// `(word, tag, stress pattern)` for every vocabulary word, in vocabulary order.
pub const ENTRIES: &[(&str, &str, &str)] = &[
    ("the", "DT", "0"),
    ("a", "DT", "0"),
    ("happy", "JJ", "10"),
    ("big", "JJ", "1"),
    ("cat", "NN", "1"),
    ("dog", "NN", "1"),
    ("saw", "VBD", "1"),
    ("ate", "VBD", "1"),
    ("moon", "NN", "1"),
    ("june", "NNP", "1"),
    ("spoon", "NN", "1"),
    ("tune", "NN", "1"),
    ("light", "NN", "1"),
    ("night", "NN", "1"),
    ("bright", "JJ", "1"),
    ("sky", "NN", "1"),
    ("there", "EX", "1"),
    ("was", "VBD", "1"),
    ("girl", "NN", "1"),
    ("named", "VBN", "1"),
];

pub fn lexicon() -> Lexicon {
    ENTRIES
        .iter()
        .fold(Lexicon::builder(), |builder, &(word, tag, stress)| {
            builder.word(word, &[tag], &[stress])
        })
        .build()
}

pub fn template(tags: &str) -> Template {
    let tags: Vec<&str> = tags.split_whitespace().collect();
    Template::from_tags(&tags).unwrap()
}

/// Fourth and fifth line tags joined, split after index `split`.
pub fn paired(tags: &str, split: usize) -> PairedTemplate {
    let tags: Vec<&str> = tags.split_whitespace().collect();
    PairedTemplate::from_tags(&tags, split).unwrap()
}

fn entries(tags: &[&str]) -> Vec<TemplateEntry> {
    tags.iter().map(|t| TemplateEntry::new(template(t))).collect()
}

pub fn corpus() -> TemplateCorpus {
    TemplateCorpus::from_templates([
        template("DT JJ NN VBD NN"),
        template("DT JJ NN VBD NNP"),
        template("JJ NN"),
    ])
    .with_line_buckets(
        LinePosition::Second,
        HashMap::from([("NN".to_string(), entries(&["DT JJ NN VBD NN"]))]),
    )
    .with_line_buckets(
        LinePosition::Third,
        HashMap::from([("NN".to_string(), entries(&["JJ NN"]))]),
    )
    .with_last_two_lines(HashMap::from([(
        "NN-NN".to_string(),
        vec![paired("JJ NN DT JJ NN VBD NN", 1)],
    )]))
}

pub fn rhymes() -> StaticRhymes {
    StaticRhymes::new(HashMap::from([
        (
            "moon".to_string(),
            ["june", "spoon", "tune"].map(String::from).to_vec(),
        ),
        ("night".to_string(), ["light", "bright"].map(String::from).to_vec()),
    ]))
}

pub fn network() -> InMemoryLexicalNetwork {
    InMemoryLexicalNetwork::new(HashMap::from([
        (
            "moon".to_string(),
            vec!["The satellite that shines at night in the sky.".to_string()],
        ),
        ("spoon".to_string(), vec!["A utensil for eating.".to_string()]),
    ]))
}

pub fn vectors() -> WordVectors {
    let mut vectors = WordVectors::new(2);
    for (word, v) in [
        ("moon", [1.0, 0.2]),
        ("spoon", [0.9, 0.4]),
        ("night", [1.0, 0.3]),
        ("sky", [0.2, 1.0]),
        ("light", [0.95, 0.35]),
        ("bright", [0.1, 1.0]),
        ("utensil", [0.0, 1.0]),
    ] {
        vectors.insert(word, v.to_vec()).unwrap();
    }
    vectors
}

#[allow(dead_code)]
pub fn first_lines() -> FirstLineResources {
    FirstLineResources {
        names: HashMap::from([("june".to_string(), "female".to_string())]),
        cities: BTreeSet::new(),
        templates: HashMap::from([(
            "female".to_string(),
            vec![["there", "was", "a", "girl", "named"].map(String::from).to_vec()],
        )]),
    }
}

pub fn expected_storyline() -> StorylineChain {
    StorylineChain::new(["june", "moon", "light", "night", "spoon"].map(String::from))
}

#[allow(dead_code)]
pub fn settings() -> AssemblySettings {
    AssemblySettings {
        first_line_syllables: FULL_LINE,
        rand_templates: 2,
        search: SearchOptions::with_width(5),
        search_space: 10,
        prompt_length: 20,
        ..AssemblySettings::default()
    }
}

/// Backward scorer that prefers earlier vocabulary entries. The state counts
/// the steps taken since the initial state.
pub struct RankedOracle {
    vocab: Vec<String>,
}

impl RankedOracle {
    pub fn new() -> Self {
        Self {
            vocab: VOCABULARY.iter().map(ToString::to_string).collect(),
        }
    }
}

impl BackwardOracle for RankedOracle {
    type State = usize;

    fn vocabulary(&self) -> &[String] {
        &self.vocab
    }

    fn initial_state(&self) -> usize {
        0
    }

    fn step(&self, state: &usize, _sequence: &[String]) -> Result<(Vec<f32>, usize)> {
        #[allow(clippy::cast_precision_loss)]
        let dist = (0..self.vocab.len())
            .map(|i| 1.0 / (i as f32 + 2.0))
            .collect();
        Ok((dist, state + 1))
    }
}

/// Backward scorer whose every call fails.
#[allow(dead_code)]
pub struct BrokenOracle {
    vocab: Vec<String>,
}

#[allow(dead_code)]
impl BrokenOracle {
    pub fn new() -> Self {
        Self {
            vocab: VOCABULARY.iter().map(ToString::to_string).collect(),
        }
    }
}

impl BackwardOracle for BrokenOracle {
    type State = ();

    fn vocabulary(&self) -> &[String] {
        &self.vocab
    }

    fn initial_state(&self) {}

    fn step(&self, _state: &(), _sequence: &[String]) -> Result<(Vec<f32>, ())> {
        Err(SearchError::Oracle("model offline".into()))
    }
}

/// Word-level forward scorer: token `i` is `VOCABULARY[i]`, earlier tokens
/// are likelier.
#[allow(dead_code)]
pub struct WordOracle;

impl ForwardOracle for WordOracle {
    fn vocab_size(&self) -> usize {
        VOCABULARY.len()
    }

    fn encode(&self, text: &str) -> Vec<u32> {
        text.split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter_map(|word| VOCABULARY.iter().position(|v| *v == word))
            .filter_map(|index| u32::try_from(index).ok())
            .collect()
    }

    fn decode(&self, token: u32) -> String {
        usize::try_from(token)
            .ok()
            .and_then(|index| VOCABULARY.get(index))
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    fn score(&self, prefixes: &[Vec<u32>]) -> Result<Vec<Vec<f32>>> {
        #[allow(clippy::cast_precision_loss)]
        let dist: Vec<f32> = (0..VOCABULARY.len())
            .map(|i| 1.0 / (i as f32 + 2.0))
            .collect();
        Ok(prefixes.iter().map(|_| dist.clone()).collect())
    }
}

/// Returns a fixed passage and records the seeds it was asked for.
#[allow(dead_code)]
pub struct CannedPrompts {
    pub text: String,
    pub seeds: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl CannedPrompts {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            seeds: Mutex::new(Vec::new()),
        }
    }
}

impl PromptGenerator for CannedPrompts {
    fn generate(&self, seed_word: &str, _length: usize) -> Result<String> {
        self.seeds.lock().unwrap().push(seed_word.to_string());
        Ok(self.text.clone())
    }
}

#[allow(dead_code)]
pub fn line_syllables(lexicon: &Lexicon, words: &[String]) -> usize {
    lexicon.syllables_of_words(words).unwrap()
}

/// Backward scorer giving every word probability 0.5. The state is the list of
/// sequences stepped over so far, and every `step` call is logged.
#[allow(dead_code)]
pub struct RecordingOracle {
    vocab: Vec<String>,
    pub steps: Mutex<Vec<(Vec<String>, Vec<String>)>>,
}

#[allow(dead_code)]
impl RecordingOracle {
    pub const PROBABILITY: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            vocab: VOCABULARY.iter().map(ToString::to_string).collect(),
            steps: Mutex::new(Vec::new()),
        }
    }
}

impl BackwardOracle for RecordingOracle {
    type State = Vec<String>;

    fn vocabulary(&self) -> &[String] {
        &self.vocab
    }

    fn initial_state(&self) -> Vec<String> {
        Vec::new()
    }

    fn step(&self, state: &Vec<String>, sequence: &[String]) -> Result<(Vec<f32>, Vec<String>)> {
        self.steps
            .lock()
            .unwrap()
            .push((state.clone(), sequence.to_vec()));
        let mut next = state.clone();
        next.push(sequence.join(" "));
        Ok((vec![Self::PROBABILITY; self.vocab.len()], next))
    }
}
