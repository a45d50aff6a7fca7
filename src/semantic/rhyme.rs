use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::{Result, SearchError};

pub const DEFAULT_RHYME_API_URL: &str = "https://api.datamuse.com/words";

/// Words rhyming with a query, in service order, without duplicates.
///
/// The query itself is only present when added explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RhymeSet {
    words: Vec<String>,
    index: HashSet<String>,
}

impl RhymeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for word in words {
            set.insert(word);
        }
        set
    }

    /// Append `word` unless already present.
    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        let word = word.into();
        if self.index.contains(&word) {
            return false;
        }
        self.index.insert(word.clone());
        self.words.push(word);
        true
    }

    pub fn remove(&mut self, word: &str) -> bool {
        if !self.index.remove(word) {
            return false;
        }
        self.words.retain(|w| w != word);
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

pub type LookupFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<RhymeSet>> + Send + 'a>>;

/// Source of rhymes for a single word.
pub trait RhymeService: Send + Sync {
    fn name(&self) -> &str;

    fn lookup<'a>(&'a self, word: &'a str) -> LookupFuture<'a>;
}

/// Lookup with failures reported as [`SearchError::ServiceUnavailable`].
pub async fn lookup_rhymes<S: RhymeService + ?Sized>(service: &S, word: &str) -> Result<RhymeSet> {
    service
        .lookup(word)
        .await
        .map_err(|e| SearchError::ServiceUnavailable {
            service: service.name().to_string(),
            message: format!("{e:#}"),
        })
}

// ── Datamuse ─────────────────────────────────────────────────

/// One element of the `[{"word", "score", "numSyllables"}]` response; only
/// the word is used.
#[derive(Debug, Deserialize)]
struct DatamuseWord {
    word: String,
}

/// Perfect-rhyme lookups against a Datamuse-compatible `words` endpoint.
pub struct DatamuseRhymes {
    client: reqwest::Client,
    url: String,
}

impl DatamuseRhymes {
    pub fn new(url: &str, timeout_secs: u64, connect_timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RhymeService for DatamuseRhymes {
    fn name(&self) -> &str {
        "datamuse"
    }

    fn lookup<'a>(&'a self, word: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            let resp = self
                .client
                .get(&self.url)
                .query(&[("rel_rhy", word)])
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("Rhyme HTTP request failed: {e}"))?
                .error_for_status()?;

            let entries: Vec<DatamuseWord> = resp.json().await?;
            let rhymes = RhymeSet::from_words(
                entries
                    .into_iter()
                    .map(|entry| entry.word.trim().to_lowercase())
                    .filter(|w| !w.is_empty()),
            );
            tracing::debug!(word, rhymes = rhymes.len(), "rhyme lookup");
            Ok(rhymes)
        })
    }
}

// ── In-memory table ──────────────────────────────────────────

/// Fixed rhyme table; unknown words have no rhymes.
#[derive(Debug, Clone, Default)]
pub struct StaticRhymes {
    table: HashMap<String, Vec<String>>,
}

impl StaticRhymes {
    pub fn new(table: HashMap<String, Vec<String>>) -> Self {
        Self { table }
    }

    pub fn from_json_file(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rhyme table {}", path.display()))?;
        let table = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse rhyme table {}", path.display()))?;
        Ok(Self { table })
    }
}

impl RhymeService for StaticRhymes {
    fn name(&self) -> &str {
        "static"
    }

    fn lookup<'a>(&'a self, word: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            Ok(self
                .table
                .get(word)
                .map(|words| RhymeSet::from_words(words.iter().cloned()))
                .unwrap_or_default())
        })
    }
}

// ── Cache ────────────────────────────────────────────────────

/// Memoizes successful lookups by word.
pub struct CachedRhymeService<S> {
    inner: S,
    cache: Mutex<HashMap<String, RhymeSet>>,
}

impl<S: RhymeService> CachedRhymeService<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached_words(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<S: RhymeService> RhymeService for CachedRhymeService<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn lookup<'a>(&'a self, word: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            let hit = self
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(word)
                .cloned();
            if let Some(rhymes) = hit {
                return Ok(rhymes);
            }

            let rhymes = self.inner.lookup(word).await?;
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(word.to_string(), rhymes.clone());
            Ok(rhymes)
        })
    }
}

// ── Retry ────────────────────────────────────────────────────

/// Client errors other than 429 and 408 will not resolve by retrying.
fn is_non_retryable(err: &anyhow::Error) -> bool {
    if let Some(reqwest_err) = err.downcast_ref::<reqwest::Error>()
        && let Some(status) = reqwest_err.status()
    {
        let code = status.as_u16();
        return status.is_client_error() && code != 429 && code != 408;
    }
    false
}

/// Retries failed lookups with exponential backoff capped at 10s.
pub struct ReliableRhymeService<S> {
    inner: S,
    max_retries: u32,
    base_backoff_ms: u64,
}

impl<S: RhymeService> ReliableRhymeService<S> {
    pub fn new(inner: S, max_retries: u32, base_backoff_ms: u64) -> Self {
        Self {
            inner,
            max_retries,
            base_backoff_ms: base_backoff_ms.max(10),
        }
    }
}

impl<S: RhymeService> RhymeService for ReliableRhymeService<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn lookup<'a>(&'a self, word: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            let mut backoff_ms = self.base_backoff_ms;
            let mut failures = Vec::new();

            for attempt in 0..=self.max_retries {
                match self.inner.lookup(word).await {
                    Ok(rhymes) => {
                        if attempt > 0 {
                            tracing::info!(
                                service = self.inner.name(),
                                attempt,
                                "Rhyme service recovered after retries"
                            );
                        }
                        return Ok(rhymes);
                    }
                    Err(e) => {
                        let non_retryable = is_non_retryable(&e);
                        failures.push(format!(
                            "attempt {}/{}: {e}",
                            attempt + 1,
                            self.max_retries + 1
                        ));
                        if non_retryable {
                            tracing::warn!(service = self.inner.name(), "Non-retryable rhyme error");
                            break;
                        }
                        if attempt < self.max_retries {
                            tracing::warn!(
                                service = self.inner.name(),
                                attempt = attempt + 1,
                                max_retries = self.max_retries,
                                "Rhyme lookup failed, retrying"
                            );
                            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                            backoff_ms = backoff_ms.saturating_mul(2).min(10_000);
                        }
                    }
                }
            }

            anyhow::bail!(
                "Rhyme lookup for '{word}' failed. Attempts:\n{}",
                failures.join("\n")
            )
        })
    }
}

impl RhymeService for Box<dyn RhymeService> {
    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn lookup<'a>(&'a self, word: &'a str) -> LookupFuture<'a> {
        self.as_ref().lookup(word)
    }
}
