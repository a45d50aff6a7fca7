use clap::{Parser, Subcommand};
use limericks::poem::Strategy;

/// `limericks` - constrained search for limerick lines.
#[derive(Parser, Debug)]
#[command(name = "limericks")]
#[command(version)]
#[command(about = "Meter planning, rhyme lookup and storyline discovery for limericks.", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.limericks/config.toml
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the five line-ending words of a limerick around a seed word
    Storyline {
        /// Ending word of the second line
        seed: String,
    },

    /// Outline a poem: storyline, opening line and per-line templates
    Sketch {
        /// Ending word of the second line
        seed: String,

        /// independent, conditioned or forward (defaults to poem.strategy)
        #[arg(long)]
        strategy: Option<Strategy>,
    },

    /// Assign syllable counts to a part-of-speech template
    Meter {
        /// Space-separated tags, e.g. "DT JJ NN IN DT NN"
        #[arg(short, long)]
        template: String,

        /// Total syllables of the line
        #[arg(short, long)]
        syllables: usize,

        /// Word that ends the line
        #[arg(short, long)]
        last_word: String,
    },

    /// List the rhymes the configured service returns for a word
    Rhymes {
        word: String,
    },

    /// Print the effective configuration
    Config,
}
