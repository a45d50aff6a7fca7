/// Canonical root form of a word, used to keep near-duplicates out of a poem.
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Rule-based English suffix stripper.
///
/// Strips the first matching inflectional or derivational suffix, undoes
/// consonant doubling and `i` -> `y` changes, and keeps at least three
/// characters of the word. A plural `s` is not stripped from `ss`, `us` or
/// `is` endings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixStemmer;

const SUFFIXES: [&str; 13] = [
    "ational", "ness", "ment", "iest", "ing", "ier", "est", "ies", "ed", "er", "ly", "al", "s",
];

const MIN_STEM_LEN: usize = 3;

impl Stemmer for SuffixStemmer {
    fn stem(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        for suffix in SUFFIXES {
            let Some(stem) = lower.strip_suffix(suffix) else {
                continue;
            };
            // "glass", "bus", "iris"
            if suffix == "s" && stem.ends_with(['s', 'u', 'i']) {
                continue;
            }
            if stem.chars().count() < MIN_STEM_LEN {
                continue;
            }
            return normalize_stem(stem, suffix);
        }

        lower
    }
}

fn normalize_stem(stem: &str, suffix: &str) -> String {
    // "ponies" -> "pony", "happier" -> "happy"
    if matches!(suffix, "ies" | "ier" | "iest") {
        return format!("{stem}y");
    }
    if suffix == "ational" {
        return format!("{stem}ate");
    }
    // "happiness" -> "happy", "happily" -> "happy"
    if matches!(suffix, "ness" | "ly")
        && let Some(trimmed) = stem.strip_suffix('i')
    {
        return format!("{trimmed}y");
    }

    // "running" -> "run", "bigger" -> "big"
    let bytes = stem.as_bytes();
    if matches!(suffix, "ing" | "ed" | "er" | "est")
        && bytes.len() >= 2
        && bytes[bytes.len() - 1] == bytes[bytes.len() - 2]
        && !matches!(bytes[bytes.len() - 1], b'l' | b's' | b'z')
    {
        return stem[..stem.len() - 1].to_string();
    }

    // "baked" / "baking" / "baker" all share "bak"
    if let Some(trimmed) = stem.strip_suffix('e')
        && trimmed.chars().count() >= MIN_STEM_LEN
    {
        return trimmed.to_string();
    }

    stem.to_string()
}
