use serde::{Deserialize, Serialize};

use crate::poem::Strategy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoemConfig {
    /// Syllables of lines 1, 2 and 5; lines 3 and 4 get three fewer.
    #[serde(default = "default_first_line_syllables")]
    pub first_line_syllables: usize,
    #[serde(default = "default_strategy")]
    pub strategy: Strategy,
    /// Length of the generated text seeding the forward strategy.
    #[serde(default = "default_prompt_length")]
    pub prompt_length: usize,
}

fn default_first_line_syllables() -> usize {
    9
}

fn default_strategy() -> Strategy {
    Strategy::Conditioned
}

fn default_prompt_length() -> usize {
    100
}

impl Default for PoemConfig {
    fn default() -> Self {
        Self {
            first_line_syllables: default_first_line_syllables(),
            strategy: default_strategy(),
            prompt_length: default_prompt_length(),
        }
    }
}
