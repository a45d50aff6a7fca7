use crate::template::Template;

/// Anything a [`SearchBeam`] can rank.
pub trait Scored {
    fn score(&self) -> f64;
}

/// Partial or complete line under backward search.
///
/// `words` are in reading order; `score` is the cumulative natural-log
/// probability of every word chosen so far.
#[derive(Debug, Clone)]
pub struct Candidate<S> {
    pub words: Vec<String>,
    pub score: f64,
    pub state: S,
    pub template: Template,
}

impl<S> Candidate<S> {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    pub fn last_word(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }
}

impl<S> Scored for Candidate<S> {
    fn score(&self) -> f64 {
        self.score
    }
}

/// Bounded collection keeping the `width` best entries by descending score.
///
/// Sorting is stable, so equal scores keep insertion order.
#[derive(Debug, Clone)]
pub struct SearchBeam<T> {
    width: usize,
    entries: Vec<T>,
}

impl<T: Scored> SearchBeam<T> {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            entries: Vec::with_capacity(width),
        }
    }

    pub fn with_entries(width: usize, entries: impl IntoIterator<Item = T>) -> Self {
        let mut beam = Self::new(width);
        beam.refill(entries);
        beam
    }

    /// Replace the contents with the best `width` of `entries`.
    pub fn refill(&mut self, entries: impl IntoIterator<Item = T>) {
        self.entries.clear();
        self.entries.extend(entries);
        self.entries
            .sort_by(|a, b| b.score().total_cmp(&a.score()));
        self.entries.truncate(self.width);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&T> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }
}

impl<T> IntoIterator for SearchBeam<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
