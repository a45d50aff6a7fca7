use std::collections::HashSet;

use super::beam::{Candidate, SearchBeam};
use crate::error::{Result, SearchError};
use crate::lexicon::Lexicon;
use crate::meter::SyllablePlan;
use crate::oracle::BackwardOracle;
use crate::template::Template;

pub const DEFAULT_BEAM_WIDTH: usize = 20;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Beam capacity after every expansion.
    pub width: usize,
    /// Words never admitted into any slot.
    pub excluded: HashSet<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_BEAM_WIDTH,
            excluded: HashSet::new(),
        }
    }
}

impl SearchOptions {
    pub fn with_width(width: usize) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }
}

/// Beam search that grows a line right-to-left from its fixed last word.
pub struct BackwardLineSearcher<'a, O: BackwardOracle> {
    lexicon: &'a Lexicon,
    oracle: &'a O,
    options: SearchOptions,
}

impl<'a, O: BackwardOracle> BackwardLineSearcher<'a, O> {
    pub fn new(lexicon: &'a Lexicon, oracle: &'a O, options: SearchOptions) -> Self {
        Self {
            lexicon,
            oracle,
            options,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Fill every slot of `template` before `last_word`.
    ///
    /// `start` resumes from an earlier oracle state and score (conditioning on
    /// a later line); otherwise the search starts at the initial state with
    /// score 0. Survivors come back sorted by descending score.
    pub fn search(
        &self,
        template: &Template,
        plan: &SyllablePlan,
        last_word: &str,
        start: Option<(O::State, f64)>,
    ) -> Result<Vec<Candidate<O::State>>> {
        if plan.len() != template.len() {
            return Err(SearchError::InvalidTemplate(format!(
                "plan {plan} does not cover template [{template}]"
            )));
        }

        let admissible = self.admissible_per_slot(template, plan);
        let (state, score) = start.unwrap_or_else(|| (self.oracle.initial_state(), 0.0));
        let mut beam = SearchBeam::with_entries(
            self.options.width,
            [Candidate {
                words: vec![last_word.to_string()],
                score,
                state,
                template: template.clone(),
            }],
        );

        for slot in (0..template.len() - 1).rev() {
            let tag = &template.tags()[slot];
            let choices = &admissible[slot];
            if choices.is_empty() {
                return Err(SearchError::no_line(
                    last_word,
                    format!("no vocabulary word fits slot {slot} ({tag})"),
                ));
            }

            let mut expanded = Vec::with_capacity(beam.len() * choices.len());
            for candidate in beam.iter() {
                let (distribution, next_state) =
                    self.oracle.step(&candidate.state, &candidate.words)?;
                for &index in choices {
                    let Some(&p) = distribution.get(index) else {
                        continue;
                    };
                    if p <= 0.0 {
                        continue;
                    }
                    let mut words = Vec::with_capacity(candidate.words.len() + 1);
                    words.push(self.oracle.vocabulary()[index].clone());
                    words.extend(candidate.words.iter().cloned());
                    expanded.push(Candidate {
                        words,
                        score: candidate.score + f64::from(p).ln(),
                        state: next_state.clone(),
                        template: template.clone(),
                    });
                }
            }

            beam.refill(expanded);
            tracing::trace!(slot, %tag, beam = beam.len(), "backward expansion");
            if beam.is_empty() {
                return Err(SearchError::no_line(
                    last_word,
                    format!("beam emptied at slot {slot} ({tag})"),
                ));
            }
        }

        Ok(beam.into_vec())
    }

    /// Vocabulary indices allowed in each slot; the last slot is left empty.
    fn admissible_per_slot(&self, template: &Template, plan: &SyllablePlan) -> Vec<Vec<usize>> {
        let vocabulary = self.oracle.vocabulary();
        template
            .tags()
            .iter()
            .enumerate()
            .map(|(slot, tag)| {
                if slot + 1 == template.len() {
                    return Vec::new();
                }
                let wanted = plan.get(slot);
                vocabulary
                    .iter()
                    .enumerate()
                    .filter(|(_, word)| {
                        self.lexicon.has_tag(word, tag)
                            && self.lexicon.syllables(word) == wanted
                            && !self.options.excluded.contains(word.as_str())
                    })
                    .map(|(index, _)| index)
                    .collect()
            })
            .collect()
    }
}
