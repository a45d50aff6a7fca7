//! Storyline discovery and the external resources it leans on: rhymes,
//! dictionary glosses and word embeddings.

pub mod embeddings;
pub mod factory;
pub mod lexical;
pub mod rhyme;
pub mod storyline;

pub use embeddings::{EmbeddingSpace, WordVectors, cosine_similarity, load_word_vectors};
pub use factory::create_rhyme_service;
pub use lexical::{InMemoryLexicalNetwork, LexicalNetwork, definition_words, load_definitions};
pub use rhyme::{
    CachedRhymeService, DEFAULT_RHYME_API_URL, DatamuseRhymes, ReliableRhymeService,
    RhymeService, RhymeSet, StaticRhymes, lookup_rhymes,
};
pub use storyline::{StorylineChain, StorylineChainFinder};
