use super::super::{DataConfig, ObservabilityConfig, PoemConfig, RhymeConfig, SearchConfig};
use crate::error::ConfigError;
use crate::poem::AssemblySettings;
use crate::search::SearchOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimerickConfig {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Fixed RNG seed for reproducible template sampling.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub poem: PoemConfig,

    #[serde(default)]
    pub rhyme: RhymeConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl LimerickConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.beam_width == 0 {
            return Err(ConfigError::Validation(
                "search.beam_width must be at least 1".into(),
            ));
        }
        if self.search.search_space == 0 {
            return Err(ConfigError::Validation(
                "search.search_space must be at least 1".into(),
            ));
        }
        if self.search.rand_templates == 0 {
            return Err(ConfigError::Validation(
                "search.rand_templates must be at least 1".into(),
            ));
        }
        if self.search.budget_schedule.len() != 4 {
            return Err(ConfigError::Validation(format!(
                "search.budget_schedule needs 4 entries, got {}",
                self.search.budget_schedule.len()
            )));
        }
        if let Some(share) = self
            .search
            .budget_schedule
            .iter()
            .find(|share| !share.is_finite() || **share <= 0.0)
        {
            return Err(ConfigError::Validation(format!(
                "search.budget_schedule entries must be positive, got {share}"
            )));
        }
        if self.poem.first_line_syllables < 4 {
            return Err(ConfigError::Validation(format!(
                "poem.first_line_syllables must be at least 4, got {}",
                self.poem.first_line_syllables
            )));
        }
        if self.rhyme.api_url.trim().is_empty() && self.rhyme.offline_table.is_none() {
            return Err(ConfigError::Validation(
                "rhyme.api_url is empty and no rhyme.offline_table is set".into(),
            ));
        }
        if self.observability.level().is_none() {
            return Err(ConfigError::Validation(format!(
                "unknown observability.log_level '{}'",
                self.observability.log_level
            )));
        }
        Ok(())
    }

    /// Search and assembly knobs in the form the engine consumes.
    pub fn assembly_settings(&self) -> Result<AssemblySettings, ConfigError> {
        let budget_schedule: [f64; 4] = self
            .search
            .budget_schedule
            .as_slice()
            .try_into()
            .map_err(|_| {
                ConfigError::Validation("search.budget_schedule needs 4 entries".into())
            })?;
        let search = SearchOptions {
            width: self.search.beam_width,
            excluded: self
                .search
                .excluded_words
                .iter()
                .map(|word| word.trim().to_lowercase())
                .collect(),
        };
        Ok(AssemblySettings {
            first_line_syllables: self.poem.first_line_syllables,
            rand_templates: self.search.rand_templates,
            search,
            search_space: self.search.search_space,
            budget_schedule,
            prompt_length: self.poem.prompt_length,
        })
    }
}
