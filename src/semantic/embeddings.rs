use anyhow::Context;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::LexiconError;

/// Word vectors used to rank storyline candidates.
pub trait EmbeddingSpace: Send + Sync {
    fn vector(&self, word: &str) -> Option<&[f32]>;

    fn contains(&self, word: &str) -> bool {
        self.vector(word).is_some()
    }

    /// Cosine similarity, `None` when either word has no vector.
    fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        Some(cosine_similarity(self.vector(a)?, self.vector(b)?))
    }
}

/// Cosine similarity of two vectors; 0 for empty, mismatched or zero vectors.
///
/// The result stays in `[-1, 1]` rather than being floored at 0: storyline
/// ranking adds two similarities, and a word pointing away from its
/// neighbours must score below an unrelated one.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, norm_a, norm_b), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, norm_a + x * x, norm_b + y * y)
        },
    );

    // Zero vectors give 0 / 0.
    let cosine = dot / (norm_a * norm_b).sqrt();
    if !cosine.is_finite() {
        return 0.0;
    }

    #[allow(clippy::cast_possible_truncation)]
    let cosine = cosine.clamp(-1.0, 1.0) as f32;
    cosine
}

/// In-memory word -> vector table.
#[derive(Debug, Clone, Default)]
pub struct WordVectors {
    dims: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            vectors: HashMap::new(),
        }
    }

    pub fn insert(&mut self, word: impl Into<String>, vector: Vec<f32>) -> Result<(), String> {
        if vector.len() != self.dims {
            return Err(format!(
                "expected {} dimensions, got {}",
                self.dims,
                vector.len()
            ));
        }
        self.vectors.insert(word.into(), vector);
        Ok(())
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl EmbeddingSpace for WordVectors {
    fn vector(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }
}

/// Parse the word2vec text format: a `count dims` header, then one
/// `word v1 .. vdims` line per word.
pub fn parse_word2vec(text: &str, source: &str) -> Result<WordVectors, LexiconError> {
    let parse_err = |line: usize, message: String| LexiconError::Parse {
        path: source.to_string(),
        line,
        message,
    };

    let mut lines = text.lines().enumerate();
    let (_, header) = lines.next().ok_or_else(|| LexiconError::Format {
        path: source.to_string(),
        message: "empty embedding file".into(),
    })?;
    let mut fields = header.split_whitespace();
    let declared: usize = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| parse_err(1, format!("bad header '{header}'")))?;
    let dims: usize = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| parse_err(1, format!("bad header '{header}'")))?;

    let mut vectors = WordVectors::new(dims);
    for (idx, line) in lines {
        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else {
            continue;
        };
        let vector = fields
            .map(str::parse::<f32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| parse_err(idx + 1, format!("'{word}': {e}")))?;
        vectors
            .insert(word, vector)
            .map_err(|message| parse_err(idx + 1, format!("'{word}': {message}")))?;
    }

    if vectors.len() != declared {
        tracing::warn!(
            source,
            declared,
            found = vectors.len(),
            "embedding count differs from header"
        );
    }
    Ok(vectors)
}

pub fn load_word_vectors(path: &Path) -> anyhow::Result<WordVectors> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read embeddings {}", path.display()))?;
    let vectors = parse_word2vec(&text, &path.display().to_string())?;
    tracing::info!(
        words = vectors.len(),
        dims = vectors.dims(),
        "embeddings loaded"
    );
    Ok(vectors)
}
