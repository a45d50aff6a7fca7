//! Contracts of the language-model scorers driving the searches.
//!
//! Both oracles are long-lived values: construct once, reuse across calls,
//! release in `Drop`. Recurrent state is never hidden inside the oracle; it is
//! an explicit value threaded through [`BackwardOracle::step`].

use crate::error::Result;

/// Right-to-left word scorer used by the backward beam search.
pub trait BackwardOracle: Send + Sync {
    /// Opaque recurrent state; cloned into every candidate that derives from it.
    type State: Clone + Send;

    /// Words indexed by distribution position.
    fn vocabulary(&self) -> &[String];

    fn initial_state(&self) -> Self::State;

    /// Feed `sequence` (reading order) from `state` and return the
    /// next-word distribution over [`Self::vocabulary`] with the new state.
    fn step(&self, state: &Self::State, sequence: &[String]) -> Result<(Vec<f32>, Self::State)>;
}

/// Left-to-right token scorer used by the forward constrained search.
pub trait ForwardOracle: Send + Sync {
    fn vocab_size(&self) -> usize;

    fn encode(&self, text: &str) -> Vec<u32>;

    fn decode(&self, token: u32) -> String;

    /// One next-token distribution per prefix, in batch order.
    fn score(&self, prefixes: &[Vec<u32>]) -> Result<Vec<Vec<f32>>>;
}

/// Free-text generator that seeds the forward strategy's running prompt.
pub trait PromptGenerator: Send + Sync {
    fn generate(&self, seed_word: &str, length: usize) -> Result<String>;
}

/// Text up to and including the last sentence end; the whole text when it has
/// none.
pub fn trim_to_last_sentence(text: &str) -> &str {
    match text.rfind('.') {
        Some(idx) => &text[..=idx],
        None => text,
    }
}

/// Word at `token`, normalized for dictionary lookups.
pub(crate) fn decode_word<O: ForwardOracle + ?Sized>(oracle: &O, token: u32) -> String {
    oracle.decode(token).trim().to_lowercase()
}
