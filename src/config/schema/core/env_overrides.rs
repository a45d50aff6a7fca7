use super::LimerickConfig;

impl LimerickConfig {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(seed_str) = std::env::var("LIMERICKS_SEED")
            && let Ok(seed) = seed_str.trim().parse::<u64>()
        {
            self.seed = Some(seed);
        }

        if let Ok(width_str) = std::env::var("LIMERICKS_BEAM_WIDTH")
            && let Ok(width) = width_str.trim().parse::<usize>()
            && width > 0
        {
            self.search.beam_width = width;
        }

        if let Ok(url) = std::env::var("LIMERICKS_RHYME_API_URL")
            && !url.is_empty()
        {
            self.rhyme.api_url = url;
        }

        if let Ok(dir) = std::env::var("LIMERICKS_DATA_DIR")
            && !dir.is_empty()
        {
            self.data.dir = dir;
        }

        if let Ok(level) = std::env::var("LIMERICKS_LOG_LEVEL")
            && !level.is_empty()
        {
            self.observability.log_level = level;
        }
    }
}
