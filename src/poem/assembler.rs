use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::first_line::{FirstLineBuilder, FirstLineResources};
use super::{Poem, PoemLine};
use crate::error::{Result, SearchError};
use crate::lexicon::{Lexicon, Stemmer};
use crate::meter::MeterPlanner;
use crate::oracle::{BackwardOracle, ForwardOracle, PromptGenerator, trim_to_last_sentence};
use crate::search::{
    BackwardLineSearcher, BestLineSelector, DEFAULT_RAND_TEMPLATES, DEFAULT_SEARCH_SPACE,
    ForwardConstrainedSearcher, ForwardContext, RankedLine, SearchOptions, TemplateSource,
};
use crate::semantic::{
    EmbeddingSpace, LexicalNetwork, RhymeService, RhymeSet, StorylineChain, StorylineChainFinder,
    lookup_rhymes,
};
use crate::template::{LinePosition, Template, TemplateCorpus, TemplateSelector};

/// Syllables of lines 3 and 4 relative to the other three lines.
const SHORT_LINE_OFFSET: usize = 3;

/// Forward search budget per line, as a share of `search_space`; later
/// prompts are longer.
pub const DEFAULT_BUDGET_SCHEDULE: [f64; 4] = [1.0, 1.0, 0.5, 0.25];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Independent,
    Conditioned,
    Forward,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Independent => "independent",
            Self::Conditioned => "conditioned",
            Self::Forward => "forward",
        })
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" => Ok(Self::Independent),
            "conditioned" => Ok(Self::Conditioned),
            "forward" => Ok(Self::Forward),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssemblySettings {
    /// Syllables of lines 1, 2 and 5.
    pub first_line_syllables: usize,
    pub rand_templates: usize,
    pub search: SearchOptions,
    pub search_space: usize,
    pub budget_schedule: [f64; 4],
    /// Length of the generated text that seeds the forward prompt.
    pub prompt_length: usize,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            first_line_syllables: 9,
            rand_templates: DEFAULT_RAND_TEMPLATES,
            search: SearchOptions::default(),
            search_space: DEFAULT_SEARCH_SPACE,
            budget_schedule: DEFAULT_BUDGET_SCHEDULE,
            prompt_length: 100,
        }
    }
}

impl AssemblySettings {
    fn short_line_syllables(&self) -> usize {
        self.first_line_syllables.saturating_sub(SHORT_LINE_OFFSET)
    }

    /// Syllables for line `index` (0-based).
    pub(super) fn line_syllables(&self, index: usize) -> usize {
        if matches!(index, 2 | 3) {
            self.short_line_syllables()
        } else {
            self.first_line_syllables
        }
    }

    fn line_budget(&self, index: usize) -> usize {
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let budget = (self.search_space as f64 * self.budget_schedule[index]) as usize;
        budget.max(1)
    }
}

/// Shared read-only inputs of every strategy.
#[derive(Clone, Copy)]
pub struct PoemResources<'a> {
    pub lexicon: &'a Lexicon,
    pub corpus: &'a TemplateCorpus,
    pub rhymes: &'a dyn RhymeService,
    pub network: &'a dyn LexicalNetwork,
    pub embeddings: &'a dyn EmbeddingSpace,
    pub stemmer: &'a dyn Stemmer,
    pub first_lines: &'a FirstLineResources,
}

/// How the forward strategy chooses its rhymes.
#[derive(Debug, Clone, Copy)]
pub enum RhymePlan<'r> {
    /// Lines 1, 2, 5 rhyme with `a`; lines 3, 4 with `b`.
    Words { a: &'r str, b: &'r str },
    /// Lines 2 to 5 end in the storyline's words.
    Storyline(&'r StorylineChain),
}

/// Composes storyline discovery and line search into whole poems.
///
/// Any exhausted alternative aborts the poem; partial poems are never
/// returned.
pub struct PoemAssembler<'a> {
    pub(super) resources: PoemResources<'a>,
    settings: AssemblySettings,
}

impl<'a> PoemAssembler<'a> {
    pub fn new(resources: PoemResources<'a>, settings: AssemblySettings) -> Self {
        Self {
            resources,
            settings,
        }
    }

    pub fn settings(&self) -> &AssemblySettings {
        &self.settings
    }

    pub async fn storyline(&self, seed: &str) -> Result<StorylineChain> {
        let r = &self.resources;
        StorylineChainFinder::new(r.lexicon, r.rhymes, r.network, r.embeddings, r.stemmer)
            .find(seed)
            .await
    }

    /// Every storyline word ends a line searched on its own.
    pub async fn independent<O, R>(&self, oracle: &O, seed: &str, rng: &mut R) -> Result<Poem>
    where
        O: BackwardOracle,
        R: Rng + ?Sized,
    {
        let storyline = self.storyline(seed).await?;
        let lexicon = self.resources.lexicon;
        let selector = TemplateSelector::new(self.resources.corpus);
        let planner = MeterPlanner::new(lexicon);
        let searcher = BackwardLineSearcher::new(lexicon, oracle, self.settings.search.clone());

        let mut lines = Vec::with_capacity(5);
        for (index, word) in storyline.words().iter().enumerate() {
            let syllables = self.settings.line_syllables(index);
            let last_syllables = lexicon
                .syllables(word)
                .ok_or_else(|| SearchError::no_line(word, "word has no meter"))?;
            let template = selector.sample_for_line(lexicon, word, syllables, rng)?;
            let plan = planner.assign(syllables, &template, last_syllables, rng)?;
            let top = searcher
                .search(&template, &plan, word, None)?
                .into_iter()
                .next()
                .ok_or_else(|| SearchError::no_line(word, "search returned nothing"))?;
            #[allow(clippy::cast_precision_loss)]
            let score = top.score / top.words.len() as f64;
            tracing::debug!(line = index + 1, %template, score, "line generated");
            lines.push(PoemLine {
                words: top.words,
                score: Some(score),
                template: Some(template),
            });
        }

        Ok(Poem {
            lines,
            storyline: Some(storyline),
        })
    }

    /// Position-specific templates, with line 4 conditioned on line 5.
    pub async fn conditioned<O, R>(&self, oracle: &O, seed: &str, rng: &mut R) -> Result<Poem>
    where
        O: BackwardOracle,
        R: Rng + ?Sized,
    {
        let storyline = self.storyline(seed).await?;
        let lexicon = self.resources.lexicon;
        let corpus = self.resources.corpus;
        let [_, w2, w3, w4, w5] = storyline.words();
        let full = self.settings.first_line_syllables;
        let short = self.settings.short_line_syllables();

        let first = self.first_line(storyline.seed(), rng).await?;

        let searcher = BackwardLineSearcher::new(lexicon, oracle, self.settings.search.clone());
        let best = BestLineSelector::new(lexicon, searcher, self.settings.rand_templates);

        let second = best
            .select(
                w2,
                full,
                TemplateSource::Bucket(corpus.line_buckets(LinePosition::Second)),
                None,
                rng,
            )?
            .into_best();
        let third = best
            .select(
                w3,
                short,
                TemplateSource::Bucket(corpus.line_buckets(LinePosition::Third)),
                None,
                rng,
            )?
            .into_best();

        let key = format!(
            "{}-{}",
            lexicon.primary_tag(w4).unwrap_or_default(),
            lexicon.primary_tag(w5).unwrap_or_default()
        );
        let pairs = TemplateSelector::new(corpus).sample_pairs(&key, self.settings.rand_templates, rng)?;

        let mut chosen: Option<(RankedLine<O::State>, RankedLine<O::State>)> = None;
        let mut skipped = 0;
        for (fourth_entry, fifth_entry) in &pairs {
            let fifth = match best.select(
                w5,
                full,
                TemplateSource::Explicit(std::slice::from_ref(fifth_entry)),
                None,
                rng,
            ) {
                Ok(ranked) => ranked.into_best(),
                Err(error) => {
                    skipped += 1;
                    tracing::debug!(template = %fifth_entry.template, %error, "fifth line skipped");
                    continue;
                }
            };

            let (_, state) = oracle.step(&fifth.candidate.state, &fifth.words)?;
            let fourth = match best.select(
                w4,
                short,
                TemplateSource::Explicit(std::slice::from_ref(fourth_entry)),
                Some((state, fifth.candidate.score)),
                rng,
            ) {
                Ok(ranked) => ranked.into_best(),
                Err(error) => {
                    skipped += 1;
                    tracing::debug!(template = %fourth_entry.template, %error, "fourth line skipped");
                    continue;
                }
            };

            let improves = chosen
                .as_ref()
                .is_none_or(|(_, current)| fifth.normalized_score > current.normalized_score);
            if improves {
                chosen = Some((fourth, fifth));
            }
        }

        let Some((fourth, fifth)) = chosen else {
            tracing::warn!(key = %key, skipped, "every paired template failed");
            return Err(SearchError::no_line(
                w5,
                format!("all {skipped} paired templates for {key} failed"),
            ));
        };
        if skipped > 0 {
            tracing::debug!(key = %key, skipped, "paired templates skipped");
        }

        let lines = vec![
            first,
            ranked_to_line(second),
            ranked_to_line(third),
            ranked_to_line(fourth),
            ranked_to_line(fifth),
        ];
        Ok(Poem {
            lines,
            storyline: Some(storyline),
        })
    }

    /// Four forward searches continuing a generated prompt and a rhyming
    /// opening line.
    ///
    /// With no `templates`, four are drawn from the transition corpus.
    pub async fn forward<F, P, R>(
        &self,
        oracle: &F,
        prompts: &P,
        plan: RhymePlan<'_>,
        templates: &[Template],
        rng: &mut R,
    ) -> Result<Poem>
    where
        F: ForwardOracle,
        P: PromptGenerator + ?Sized,
        R: Rng + ?Sized,
    {
        let drawn;
        let templates = if templates.is_empty() {
            let selector = TemplateSelector::new(self.resources.corpus);
            drawn = (0..4)
                .map(|_| selector.sample_weighted(&mut *rng))
                .collect::<Result<Vec<_>>>()?;
            drawn.as_slice()
        } else if templates.len() < 4 {
            return Err(SearchError::InvalidTemplate(format!(
                "forward strategy needs 4 templates, got {}",
                templates.len()
            )));
        } else {
            templates
        };

        let (opening_word, mut groups) = match plan {
            RhymePlan::Words { a, b } => {
                let mut group_a = lookup_rhymes(self.resources.rhymes, a).await?;
                group_a.insert(a);
                let mut group_b = lookup_rhymes(self.resources.rhymes, b).await?;
                group_b.insert(b);
                (a, ForwardRhymes::Shared([group_a, group_b]))
            }
            RhymePlan::Storyline(chain) => {
                let [_, rest @ ..] = chain.words();
                let sets = rest.clone().map(|word| RhymeSet::from_words([word]));
                (chain.seed(), ForwardRhymes::PerLine(sets))
            }
        };

        let first = self.first_line(opening_word, rng).await?;
        if let (ForwardRhymes::Shared([group_a, _]), Some(last)) = (&mut groups, first.words.last())
        {
            group_a.remove(last);
        }

        let generated = prompts.generate(opening_word, self.settings.prompt_length)?;
        let mut prompt = oracle.encode(trim_to_last_sentence(&generated));
        prompt.extend(oracle.encode(&first.text()));

        let searcher = ForwardConstrainedSearcher::new(self.resources.lexicon, oracle);
        let mut lines = vec![first];
        for (index, template) in templates.iter().take(4).enumerate() {
            let rhyme_set: &RhymeSet = groups.for_line(index);
            let line = searcher.search(
                ForwardContext::Encoded(&prompt),
                template,
                Some(rhyme_set),
                self.settings.line_budget(index),
            )?;
            tracing::debug!(line = index + 2, %template, log_prob = line.log_prob, "line generated");

            prompt.extend_from_slice(&line.tokens);
            if let Some(last) = line.last_word() {
                groups.for_line(index).remove(last);
            }
            lines.push(PoemLine {
                words: line.words,
                score: Some(line.log_prob),
                template: Some(template.clone()),
            });
        }

        Ok(Poem {
            lines,
            storyline: match plan {
                RhymePlan::Storyline(chain) => Some(chain.clone()),
                RhymePlan::Words { .. } => None,
            },
        })
    }

    /// Random opening line ending in a name or city that rhymes with `word`.
    pub(super) async fn first_line<R: Rng + ?Sized>(&self, word: &str, rng: &mut R) -> Result<PoemLine> {
        let rhymes = lookup_rhymes(self.resources.rhymes, word).await?;
        let builder = FirstLineBuilder::new(self.resources.lexicon, self.resources.first_lines);
        let candidates =
            builder.candidates(word, &rhymes, self.settings.first_line_syllables)?;
        let words = candidates
            .choose(rng)
            .cloned()
            .ok_or_else(|| SearchError::no_line(word, "no opening line"))?;
        Ok(PoemLine {
            words,
            score: None,
            template: None,
        })
    }
}

fn ranked_to_line<S>(ranked: RankedLine<S>) -> PoemLine {
    PoemLine {
        words: ranked.words,
        score: Some(ranked.normalized_score),
        template: Some(ranked.template),
    }
}

/// Rhyme constraints of the four forward-searched lines.
enum ForwardRhymes {
    /// Groups A and B, used in the order A, B, B, A.
    Shared([RhymeSet; 2]),
    /// One singleton set per line.
    PerLine([RhymeSet; 4]),
}

impl ForwardRhymes {
    fn for_line(&mut self, index: usize) -> &mut RhymeSet {
        match self {
            Self::Shared(groups) => {
                if matches!(index, 0 | 3) {
                    &mut groups[0]
                } else {
                    &mut groups[1]
                }
            }
            Self::PerLine(sets) => &mut sets[index],
        }
    }
}
