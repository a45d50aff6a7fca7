use serde::{Deserialize, Serialize};

use crate::semantic::DEFAULT_RHYME_API_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RhymeConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    #[serde(default = "default_true")]
    pub cache: bool,
    /// JSON `{"word": ["rhyme", ..]}` table used instead of the API.
    #[serde(default)]
    pub offline_table: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_RHYME_API_URL.into()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    3
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_backoff_ms() -> u64 {
    200
}

fn default_true() -> bool {
    true
}

impl Default for RhymeConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
            cache: true,
            offline_table: None,
        }
    }
}
