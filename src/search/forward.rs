use super::beam::{Scored, SearchBeam};
use crate::error::{Result, SearchError};
use crate::lexicon::Lexicon;
use crate::oracle::{ForwardOracle, decode_word};
use crate::semantic::RhymeSet;
use crate::template::Template;

pub const DEFAULT_SEARCH_SPACE: usize = 100;

/// What the forward search continues from.
#[derive(Debug, Clone, Copy)]
pub enum ForwardContext<'c> {
    /// Plain text; each whitespace-separated word contributes its first token.
    Words(&'c str),
    /// A prefix that is already encoded, such as a running prompt.
    Encoded(&'c [u32]),
}

/// Completed line: only what this search generated.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardLine {
    pub words: Vec<String>,
    pub tokens: Vec<u32>,
    pub log_prob: f64,
}

impl ForwardLine {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    pub fn last_word(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }
}

#[derive(Debug, Clone)]
struct Partial {
    words: Vec<String>,
    context: Vec<u32>,
    log_prob: f64,
}

impl Scored for Partial {
    fn score(&self) -> f64 {
        self.log_prob
    }
}

/// Left-to-right template-constrained search under a [`ForwardOracle`].
pub struct ForwardConstrainedSearcher<'a, O: ForwardOracle> {
    lexicon: &'a Lexicon,
    oracle: &'a O,
}

impl<'a, O: ForwardOracle> ForwardConstrainedSearcher<'a, O> {
    pub fn new(lexicon: &'a Lexicon, oracle: &'a O) -> Self {
        Self { lexicon, oracle }
    }

    /// Highest-probability line following `template` after `context`.
    ///
    /// With a non-empty `rhyme_set` the final word must belong to it. At most
    /// `search_space` partial lines (minimum 1) survive each slot.
    pub fn search(
        &self,
        context: ForwardContext<'_>,
        template: &Template,
        rhyme_set: Option<&RhymeSet>,
        search_space: usize,
    ) -> Result<ForwardLine> {
        let prefix = match context {
            ForwardContext::Words(text) => self.encode_words(text),
            ForwardContext::Encoded(tokens) => tokens.to_vec(),
        };
        let start = prefix.len();
        let rhyme_set = rhyme_set.filter(|set| !set.is_empty());
        let vocabulary: Vec<String> = (0..self.oracle.vocab_size())
            .filter_map(|index| u32::try_from(index).ok())
            .map(|token| decode_word(self.oracle, token))
            .collect();

        let mut frontier = SearchBeam::with_entries(
            search_space.max(1),
            [Partial {
                words: Vec::new(),
                context: prefix,
                log_prob: 0.0,
            }],
        );

        for (slot, tag) in template.tags().iter().enumerate() {
            let is_final = slot + 1 == template.len();
            let admissible: Vec<usize> = vocabulary
                .iter()
                .enumerate()
                .filter(|(_, word)| {
                    self.lexicon.has_tag(word, tag)
                        && (!is_final || rhyme_set.is_none_or(|set| set.contains(word)))
                })
                .map(|(index, _)| index)
                .collect();

            let batch: Vec<Vec<u32>> = frontier.iter().map(|p| p.context.clone()).collect();
            let distributions = self.oracle.score(&batch)?;
            if distributions.len() != batch.len() {
                return Err(SearchError::Oracle(format!(
                    "scored {} prefixes, expected {}",
                    distributions.len(),
                    batch.len()
                )));
            }

            let mut expanded = Vec::new();
            for (partial, distribution) in frontier.iter().zip(&distributions) {
                for &index in &admissible {
                    let Some(&p) = distribution.get(index) else {
                        continue;
                    };
                    let Ok(token) = u32::try_from(index) else {
                        continue;
                    };
                    if p <= 0.0 {
                        continue;
                    }
                    let mut words = partial.words.clone();
                    words.push(vocabulary[index].clone());
                    let mut context = partial.context.clone();
                    context.push(token);
                    expanded.push(Partial {
                        words,
                        context,
                        log_prob: partial.log_prob + f64::from(p).ln(),
                    });
                }
            }

            frontier.refill(expanded);
            tracing::trace!(slot, %tag, frontier = frontier.len(), "forward expansion");
            if frontier.is_empty() {
                let reason = if is_final && rhyme_set.is_some() {
                    format!("no rhyming word fits final slot {slot} ({tag})")
                } else {
                    format!("no vocabulary word fits slot {slot} ({tag})")
                };
                return Err(SearchError::no_line(template.last_tag(), reason));
            }
        }

        let best = frontier
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::no_line(template.last_tag(), "empty template"))?;
        Ok(ForwardLine {
            words: best.words,
            tokens: best.context[start..].to_vec(),
            log_prob: best.log_prob,
        })
    }

    fn encode_words(&self, text: &str) -> Vec<u32> {
        text.to_lowercase()
            .split_whitespace()
            .filter_map(|word| self.oracle.encode(word).first().copied())
            .collect()
    }
}
