use serde::{Deserialize, Serialize};

use crate::poem::assembler::DEFAULT_BUDGET_SCHEDULE;
use crate::search::{DEFAULT_BEAM_WIDTH, DEFAULT_RAND_TEMPLATES, DEFAULT_SEARCH_SPACE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Candidates kept after each backward expansion.
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,
    /// Templates tried per line by the best-line ranking.
    #[serde(default = "default_rand_templates")]
    pub rand_templates: usize,
    /// Partial lines kept per slot by the forward search.
    #[serde(default = "default_search_space")]
    pub search_space: usize,
    /// Share of `search_space` granted to forward lines 2 to 5.
    #[serde(default = "default_budget_schedule")]
    pub budget_schedule: Vec<f64>,
    /// Words never placed in a generated line.
    #[serde(default)]
    pub excluded_words: Vec<String>,
}

fn default_beam_width() -> usize {
    DEFAULT_BEAM_WIDTH
}

fn default_rand_templates() -> usize {
    DEFAULT_RAND_TEMPLATES
}

fn default_search_space() -> usize {
    DEFAULT_SEARCH_SPACE
}

fn default_budget_schedule() -> Vec<f64> {
    DEFAULT_BUDGET_SCHEDULE.to_vec()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            beam_width: default_beam_width(),
            rand_templates: default_rand_templates(),
            search_space: default_search_space(),
            budget_schedule: default_budget_schedule(),
            excluded_words: Vec::new(),
        }
    }
}
