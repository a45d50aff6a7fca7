use super::assembler::{AssemblySettings, PoemAssembler, PoemResources};
use super::first_line::{FirstLineResources, load_first_line_resources};
use crate::config::LimerickConfig;
use crate::error::LimerickError;
use crate::lexicon::{Lexicon, SuffixStemmer, load_lexicon};
use crate::semantic::{
    InMemoryLexicalNetwork, RhymeService, WordVectors, create_rhyme_service, load_definitions,
    load_word_vectors,
};
use crate::template::{TemplateCorpus, load_template_corpus};

/// Every file-backed input of a poem plus the settings derived from config.
pub struct PoemData {
    pub lexicon: Lexicon,
    pub corpus: TemplateCorpus,
    pub rhymes: Box<dyn RhymeService>,
    pub network: InMemoryLexicalNetwork,
    pub vectors: WordVectors,
    pub first_lines: FirstLineResources,
    pub settings: AssemblySettings,
}

impl PoemData {
    /// Load the files named in `config.data` and build the rhyme stack.
    pub fn load(config: &LimerickConfig) -> Result<Self, LimerickError> {
        let settings = config.assembly_settings()?;
        let data = &config.data;
        let lexicon = load_lexicon(&data.resolve(&data.tags), &data.resolve(&data.cmudict))?;
        let corpus = load_template_corpus(&data.resolve(&data.templates))?;
        let rhymes = create_rhyme_service(&config.rhyme)?;
        let network = load_definitions(&data.resolve(&data.definitions))?;
        let vectors = load_word_vectors(&data.resolve(&data.embeddings))?;
        let first_lines = load_first_line_resources(&data.resolve(&data.first_lines))?;
        tracing::debug!(rhymes = rhymes.name(), "poem data ready");

        Ok(Self {
            lexicon,
            corpus,
            rhymes,
            network,
            vectors,
            first_lines,
            settings,
        })
    }

    pub fn assembler(&self) -> PoemAssembler<'_> {
        PoemAssembler::new(
            PoemResources {
                lexicon: &self.lexicon,
                corpus: &self.corpus,
                rhymes: self.rhymes.as_ref(),
                network: &self.network,
                embeddings: &self.vectors,
                stemmer: &SuffixStemmer,
                first_lines: &self.first_lines,
            },
            self.settings.clone(),
        )
    }
}
