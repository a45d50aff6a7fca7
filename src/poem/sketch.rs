use rand::Rng;
use std::fmt;

use super::PoemLine;
use super::assembler::{PoemAssembler, Strategy};
use crate::error::{Result, SearchError};
use crate::meter::{MeterPlanner, SyllablePlan};
use crate::semantic::StorylineChain;
use crate::template::{LinePosition, Template, TemplateSelector};

/// Template and syllable plan one line would be searched with.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSketch {
    pub last_word: String,
    pub syllables: usize,
    pub template: Template,
    /// `None` for forward lines; their meter is left to the search.
    pub plan: Option<SyllablePlan>,
}

/// Oracle-free outline of a poem under one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct PoemSketch {
    pub strategy: Strategy,
    pub storyline: StorylineChain,
    /// Name-based opening line; independent poems search line 1 instead.
    pub opening: Option<PoemLine>,
    pub lines: Vec<LineSketch>,
}

impl fmt::Display for PoemSketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "strategy   {}", self.strategy)?;
        writeln!(f, "storyline  {}", self.storyline.words().join(" "))?;
        if let Some(opening) = &self.opening {
            writeln!(f, "line 1     {}", opening.text())?;
        }
        let first = usize::from(self.opening.is_some()) + 1;
        for (line, number) in self.lines.iter().zip(first..) {
            match &line.plan {
                Some(plan) => writeln!(
                    f,
                    "line {number}     [{}] {plan} -> {}",
                    line.template, line.last_word
                )?,
                None => writeln!(f, "line {number}     [{}] -> {}", line.template, line.last_word)?,
            }
        }
        Ok(())
    }
}

impl PoemAssembler<'_> {
    /// Storyline, opening line and one template per searched line, drawn
    /// the way `strategy` draws them, with no oracle involved.
    ///
    /// Unlike a real run, the first template whose meter fails aborts the
    /// sketch instead of being skipped.
    pub async fn sketch<R: Rng + ?Sized>(
        &self,
        strategy: Strategy,
        seed: &str,
        rng: &mut R,
    ) -> Result<PoemSketch> {
        let storyline = self.storyline(seed).await?;
        let lexicon = self.resources.lexicon;
        let corpus = self.resources.corpus;
        let selector = TemplateSelector::new(corpus);
        let words = storyline.words();

        let opening = match strategy {
            Strategy::Independent => None,
            Strategy::Conditioned | Strategy::Forward => {
                Some(self.first_line(storyline.seed(), rng).await?)
            }
        };
        let first_searched = usize::from(opening.is_some());

        let mut templates = Vec::with_capacity(5);
        match strategy {
            Strategy::Independent => {
                for (index, word) in words.iter().enumerate() {
                    let syllables = self.settings().line_syllables(index);
                    templates.push(selector.sample_for_line(lexicon, word, syllables, rng)?);
                }
            }
            Strategy::Conditioned => {
                for (position, word) in [
                    (LinePosition::Second, &words[1]),
                    (LinePosition::Third, &words[2]),
                ] {
                    let tag = lexicon.primary_tag(word).unwrap_or_default();
                    let entry =
                        TemplateSelector::sample_k(corpus.line_buckets(position), tag, 1, rng)?
                            .into_iter()
                            .next()
                            .ok_or_else(|| SearchError::NoTemplateFound {
                                key: format!("bucket '{tag}'"),
                            })?;
                    templates.push(entry.template);
                }
                let key = format!(
                    "{}-{}",
                    lexicon.primary_tag(&words[3]).unwrap_or_default(),
                    lexicon.primary_tag(&words[4]).unwrap_or_default()
                );
                let (fourth, fifth) = selector
                    .sample_pairs(&key, 1, rng)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| SearchError::NoTemplateFound {
                        key: format!("pair '{key}'"),
                    })?;
                templates.push(fourth.template);
                templates.push(fifth.template);
            }
            Strategy::Forward => {
                for _ in 0..4 {
                    templates.push(selector.sample_weighted(rng)?);
                }
            }
        }

        let planner = MeterPlanner::new(lexicon);
        let mut lines = Vec::with_capacity(templates.len());
        for (template, index) in templates.into_iter().zip(first_searched..) {
            let word = &words[index];
            let syllables = self.settings().line_syllables(index);
            let plan = match strategy {
                Strategy::Forward => None,
                Strategy::Independent | Strategy::Conditioned => {
                    let last_syllables = lexicon
                        .syllables(word)
                        .ok_or_else(|| SearchError::no_line(word, "word has no meter"))?;
                    Some(planner.assign(syllables, &template, last_syllables, rng)?)
                }
            };
            tracing::debug!(line = index + 1, %template, "line sketched");
            lines.push(LineSketch {
                last_word: word.clone(),
                syllables,
                template,
                plan,
            });
        }

        Ok(PoemSketch {
            strategy,
            storyline,
            opening,
            lines,
        })
    }
}
