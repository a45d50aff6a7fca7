use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cli::commands::{Cli, Commands};
use crate::app::status::render_status;
use limericks::config::LimerickConfig;
use limericks::lexicon::{Lexicon, SuffixStemmer, load_lexicon};
use limericks::meter::MeterPlanner;
use limericks::poem::{PoemData, Strategy};
use limericks::semantic::{
    StorylineChainFinder, create_rhyme_service, load_definitions, load_word_vectors,
    lookup_rhymes,
};
use limericks::template::Template;

fn rng_for(config: &LimerickConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

fn lexicon_for(config: &LimerickConfig) -> Result<Lexicon> {
    let data = &config.data;
    load_lexicon(&data.resolve(&data.tags), &data.resolve(&data.cmudict))
}

async fn run_storyline(config: &LimerickConfig, seed: &str) -> Result<()> {
    let data = &config.data;
    let lexicon = lexicon_for(config)?;
    let rhymes = create_rhyme_service(&config.rhyme)?;
    let network = load_definitions(&data.resolve(&data.definitions))?;
    let vectors = load_word_vectors(&data.resolve(&data.embeddings))?;

    let finder = StorylineChainFinder::new(&lexicon, &rhymes, &network, &vectors, &SuffixStemmer);
    let chain = finder.find(seed).await?;
    for (index, word) in chain.words().iter().enumerate() {
        println!("line {}: {word}", index + 1);
    }
    Ok(())
}

async fn run_sketch(
    config: &LimerickConfig,
    seed: &str,
    strategy: Option<Strategy>,
) -> Result<()> {
    let data = PoemData::load(config)?;
    let strategy = strategy.unwrap_or(config.poem.strategy);
    let mut rng = rng_for(config);
    let sketch = data
        .assembler()
        .sketch(strategy, &seed.trim().to_lowercase(), &mut rng)
        .await?;
    print!("{sketch}");
    Ok(())
}

fn run_meter(
    config: &LimerickConfig,
    template: &str,
    syllables: usize,
    last_word: &str,
) -> Result<()> {
    let tags: Vec<&str> = template.split_whitespace().collect();
    if tags.is_empty() {
        bail!("--template needs at least one tag");
    }
    let template = Template::from_tags(&tags)?;
    let lexicon = lexicon_for(config)?;
    let last_word = last_word.trim().to_lowercase();
    let last_syllables = lexicon
        .syllables(&last_word)
        .with_context(|| format!("'{last_word}' has no pronunciation in the dictionary"))?;

    let mut rng = rng_for(config);
    let plan = MeterPlanner::new(&lexicon).assign(syllables, &template, last_syllables, &mut rng)?;
    println!("{template}");
    println!("{plan}");
    Ok(())
}

async fn run_rhymes(config: &LimerickConfig, word: &str) -> Result<()> {
    let service = create_rhyme_service(&config.rhyme)?;
    let rhymes = lookup_rhymes(&service, &word.trim().to_lowercase()).await?;
    if rhymes.is_empty() {
        println!("(no rhymes)");
    }
    for rhyme in rhymes.iter() {
        println!("{rhyme}");
    }
    Ok(())
}

pub async fn dispatch(cli: Cli, config: LimerickConfig) -> Result<()> {
    match cli.command {
        Commands::Storyline { seed } => run_storyline(&config, &seed).await,
        Commands::Sketch { seed, strategy } => run_sketch(&config, &seed, strategy).await,
        Commands::Meter {
            template,
            syllables,
            last_word,
        } => run_meter(&config, &template, syllables, &last_word),
        Commands::Rhymes { word } => run_rhymes(&config, &word).await,
        Commands::Config => {
            println!("{}", render_status(&config));
            Ok(())
        }
    }
}
