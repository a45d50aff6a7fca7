use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `limericks`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; the CLI and file loaders use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum LimerickError {
    // ── Search / ranking ────────────────────────────────────────────────
    #[error("search: {0}")]
    Search(#[from] SearchError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Lexicon / corpus loading ────────────────────────────────────────
    #[error("lexicon: {0}")]
    Lexicon(#[from] LexiconError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Search errors ───────────────────────────────────────────────────────────

/// Failures of the candidate-search engine.
///
/// Local failures (one template, one storyline candidate) are skipped by the
/// ranking layers; a variant reaching the caller means every alternative was
/// exhausted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("no syllable assignment fits {syllables} syllables over template [{template}]")]
    NoValidMeter { template: String, syllables: usize },

    #[error("no template found for {key}")]
    NoTemplateFound { key: String },

    #[error("no line found ending with '{word}': {reason}")]
    NoLineFound { word: String, reason: String },

    #[error("no storyline found for seed '{seed}' (unresolved: {})", .unresolved.join(", "))]
    NoStorylineFound {
        seed: String,
        unresolved: Vec<&'static str>,
    },

    #[error("service {service} unavailable: {message}")]
    ServiceUnavailable { service: String, message: String },

    #[error("scoring oracle failed: {0}")]
    Oracle(String),

    #[error("invalid template: {0}")]
    InvalidTemplate(String),
}

impl SearchError {
    pub(crate) fn no_line(word: &str, reason: impl Into<String>) -> Self {
        Self::NoLineFound {
            word: word.to_string(),
            reason: reason.into(),
        }
    }
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Lexicon errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("{path}: line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("{path}: {message}")]
    Format { path: String, message: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the search engine.
pub type Result<T> = std::result::Result<T, SearchError>;
