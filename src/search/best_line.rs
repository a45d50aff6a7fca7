use rand::Rng;
use std::collections::HashMap;

use super::backward::BackwardLineSearcher;
use super::beam::Candidate;
use crate::error::{Result, SearchError};
use crate::lexicon::Lexicon;
use crate::meter::MeterPlanner;
use crate::oracle::BackwardOracle;
use crate::template::{Template, TemplateEntry, TemplateSelector};

pub const DEFAULT_RAND_TEMPLATES: usize = 5;

/// Where the selector gets its candidate templates.
#[derive(Debug, Clone, Copy)]
pub enum TemplateSource<'t> {
    /// Every listed template is tried, in order.
    Explicit(&'t [TemplateEntry]),
    /// A random draw from the bucket of the last word's primary tag.
    Bucket(&'t HashMap<String, Vec<TemplateEntry>>),
}

/// Best line produced by one template.
#[derive(Debug, Clone)]
pub struct RankedLine<S> {
    pub words: Vec<String>,
    /// Top candidate's cumulative score divided by the line length.
    pub normalized_score: f64,
    pub template: Template,
    pub example: Vec<String>,
    pub candidate: Candidate<S>,
}

impl<S> RankedLine<S> {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct RankedLines<S> {
    /// Non-increasing by normalized score; never empty.
    pub lines: Vec<RankedLine<S>>,
    /// Templates that produced no line.
    pub skipped: usize,
}

impl<S> RankedLines<S> {
    pub fn best(&self) -> &RankedLine<S> {
        &self.lines[0]
    }

    pub fn into_best(mut self) -> RankedLine<S> {
        self.lines.swap_remove(0)
    }
}

/// Runs backward search over several templates and ranks the results.
pub struct BestLineSelector<'a, O: BackwardOracle> {
    lexicon: &'a Lexicon,
    searcher: BackwardLineSearcher<'a, O>,
    rand_templates: usize,
}

impl<'a, O: BackwardOracle> BestLineSelector<'a, O> {
    pub fn new(
        lexicon: &'a Lexicon,
        searcher: BackwardLineSearcher<'a, O>,
        rand_templates: usize,
    ) -> Self {
        Self {
            lexicon,
            searcher,
            rand_templates,
        }
    }

    pub fn searcher(&self) -> &BackwardLineSearcher<'a, O> {
        &self.searcher
    }

    /// Rank one line per usable template ending in `last_word`.
    ///
    /// A template whose meter or search fails is skipped and counted.
    pub fn select<R: Rng + ?Sized>(
        &self,
        last_word: &str,
        syllables: usize,
        source: TemplateSource<'_>,
        start: Option<(O::State, f64)>,
        rng: &mut R,
    ) -> Result<RankedLines<O::State>> {
        let last_syllables = self
            .lexicon
            .syllables(last_word)
            .ok_or_else(|| SearchError::no_line(last_word, "word has no meter"))?;

        let templates = match source {
            TemplateSource::Explicit(entries) => entries.to_vec(),
            TemplateSource::Bucket(buckets) => {
                let tag = self.lexicon.primary_tag(last_word).ok_or_else(|| {
                    SearchError::NoTemplateFound {
                        key: format!("untagged word '{last_word}'"),
                    }
                })?;
                TemplateSelector::sample_k(buckets, tag, self.rand_templates, rng)?
            }
        };

        let planner = MeterPlanner::new(self.lexicon);
        let mut lines = Vec::with_capacity(templates.len());
        let mut skipped = 0;

        for entry in templates {
            let attempt = planner
                .assign(syllables, &entry.template, last_syllables, rng)
                .and_then(|plan| {
                    self.searcher
                        .search(&entry.template, &plan, last_word, start.clone())
                });
            match attempt {
                Ok(candidates) => {
                    let Some(top) = candidates.into_iter().next() else {
                        skipped += 1;
                        continue;
                    };
                    #[allow(clippy::cast_precision_loss)]
                    let normalized_score = top.score / top.words.len() as f64;
                    lines.push(RankedLine {
                        words: top.words.clone(),
                        normalized_score,
                        template: entry.template,
                        example: entry.example,
                        candidate: top,
                    });
                }
                Err(error) => {
                    skipped += 1;
                    tracing::debug!(
                        word = last_word,
                        template = %entry.template,
                        %error,
                        "template skipped"
                    );
                }
            }
        }

        if lines.is_empty() {
            tracing::warn!(word = last_word, skipped, "every template failed");
            return Err(SearchError::no_line(
                last_word,
                format!("all {skipped} templates failed"),
            ));
        }

        lines.sort_by(|a, b| b.normalized_score.total_cmp(&a.normalized_score));
        if skipped > 0 {
            tracing::debug!(word = last_word, kept = lines.len(), skipped, "lines ranked");
        }
        Ok(RankedLines { lines, skipped })
    }
}
