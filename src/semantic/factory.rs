use anyhow::Result;
use std::path::Path;

use super::rhyme::{
    CachedRhymeService, DatamuseRhymes, ReliableRhymeService, RhymeService, StaticRhymes,
};
use crate::config::RhymeConfig;

/// Build the rhyme backend described by `config`.
///
/// An offline table replaces the HTTP client entirely. Otherwise the
/// Datamuse client is wrapped in retries and, when enabled, a cache.
pub fn create_rhyme_service(config: &RhymeConfig) -> Result<Box<dyn RhymeService>> {
    if let Some(table) = config.offline_table.as_deref() {
        let path = shellexpand::tilde(table);
        let rhymes = StaticRhymes::from_json_file(Path::new(path.as_ref()))?;
        tracing::info!(table = %path, "using offline rhyme table");
        return Ok(Box::new(rhymes));
    }

    let client = DatamuseRhymes::new(
        &config.api_url,
        config.timeout_secs,
        config.connect_timeout_secs,
    );
    let reliable = ReliableRhymeService::new(client, config.max_retries, config.base_backoff_ms);
    tracing::debug!(
        url = %config.api_url,
        retries = config.max_retries,
        cache = config.cache,
        "rhyme service configured"
    );
    if config.cache {
        Ok(Box::new(CachedRhymeService::new(reliable)))
    } else {
        Ok(Box::new(reliable))
    }
}
