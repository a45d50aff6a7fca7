//! Syllable planning: distribute a line's syllable budget over the slots of a
//! grammatical template.

use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

use crate::error::{Result, SearchError};
use crate::lexicon::{Lexicon, is_punctuation};
use crate::template::Template;

/// Planned syllable count per template slot; punctuation slots are 0 and the
/// final slot is the fixed last word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllablePlan(Vec<usize>);

impl SyllablePlan {
    /// Plan with caller-chosen counts, unchecked against any template.
    pub fn from_counts(counts: Vec<usize>) -> Self {
        Self(counts)
    }

    pub fn counts(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<usize> {
        self.0.get(slot).copied()
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl fmt::Display for SyllablePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Assigns syllable counts to template slots under the lexicon's per-tag
/// syllable constraints.
#[derive(Debug, Clone, Copy)]
pub struct MeterPlanner<'l> {
    lexicon: &'l Lexicon,
}

impl<'l> MeterPlanner<'l> {
    pub fn new(lexicon: &'l Lexicon) -> Self {
        Self { lexicon }
    }

    /// First feasible plan for `template` summing to `total_syllables`.
    ///
    /// Partitions of the free budget are tried in generation order; within a
    /// partition, its distinct orderings are tried in random order. Worst case
    /// is exponential in the number of word slots, which is why templates are
    /// capped at [`crate::template::MAX_TEMPLATE_LEN`].
    pub fn assign<R: Rng + ?Sized>(
        &self,
        total_syllables: usize,
        template: &Template,
        last_word_syllables: usize,
        rng: &mut R,
    ) -> Result<SyllablePlan> {
        let no_meter = || SearchError::NoValidMeter {
            template: template.to_string(),
            syllables: total_syllables,
        };

        let free = total_syllables
            .checked_sub(last_word_syllables)
            .ok_or_else(no_meter)?;
        let slots = template.word_slots().saturating_sub(1);

        for partition in partitions_of_size(free, slots) {
            let mut orderings = distinct_permutations(&partition);
            orderings.shuffle(rng);
            for ordering in orderings {
                let plan = self.layout(template, &ordering, last_word_syllables);
                if self.fits(template, &plan) {
                    tracing::trace!(%template, plan = ?plan, "meter assigned");
                    return Ok(SyllablePlan(plan));
                }
            }
        }

        Err(no_meter())
    }

    fn layout(&self, template: &Template, ordering: &[usize], last: usize) -> Vec<usize> {
        let body = &template.tags()[..template.len() - 1];
        let mut values = ordering.iter().copied();
        let mut plan: Vec<usize> = body
            .iter()
            .map(|tag| {
                if is_punctuation(tag) {
                    0
                } else {
                    values.next().unwrap_or(0)
                }
            })
            .collect();
        plan.push(last);
        plan
    }

    /// Every slot but the pinned last one must use a count its tag allows.
    fn fits(&self, template: &Template, plan: &[usize]) -> bool {
        template
            .tags()
            .iter()
            .zip(plan)
            .take(template.len() - 1)
            .all(|(tag, count)| {
                self.lexicon
                    .allowed_syllables(tag)
                    .is_some_and(|allowed| allowed.contains(count))
            })
    }
}

/// Integer partitions of `n` into exactly `parts` positive parts, each listed
/// in non-decreasing order.
///
/// Zero parts only partitions zero.
pub fn partitions_of_size(n: usize, parts: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if parts == 0 {
        if n == 0 {
            out.push(Vec::new());
        }
        return out;
    }
    let mut current = Vec::with_capacity(parts);
    extend_partitions(n, parts, 1, &mut current, &mut out);
    out
}

fn extend_partitions(
    remaining: usize,
    parts_left: usize,
    min_part: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if parts_left == 1 {
        if remaining >= min_part {
            current.push(remaining);
            out.push(current.clone());
            current.pop();
        }
        return;
    }
    // Each of the remaining parts is at least `part`, so stop once they
    // cannot all fit.
    let mut part = min_part;
    while part * parts_left <= remaining {
        current.push(part);
        extend_partitions(remaining - part, parts_left - 1, part, current, out);
        current.pop();
        part += 1;
    }
}

/// All distinct orderings of a multiset, in lexicographic order.
pub fn distinct_permutations(values: &[usize]) -> Vec<Vec<usize>> {
    let mut current = values.to_vec();
    current.sort_unstable();
    let mut out = vec![current.clone()];
    while next_permutation(&mut current) {
        out.push(current.clone());
    }
    out
}

fn next_permutation(values: &mut [usize]) -> bool {
    if values.len() < 2 {
        return false;
    }
    let mut i = values.len() - 1;
    while i > 0 && values[i - 1] >= values[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = values.len() - 1;
    while values[j] <= values[i - 1] {
        j -= 1;
    }
    values.swap(i - 1, j);
    values[i..].reverse();
    true
}
