use limericks::error::SearchError;
use limericks::lexicon::{Lexicon, SuffixStemmer};
use limericks::poem::{FirstLineResources, PoemAssembler, PoemResources, RhymePlan};
use limericks::semantic::{InMemoryLexicalNetwork, StaticRhymes, WordVectors};
use limericks::template::TemplateCorpus;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::toy_world::{
    BrokenOracle, CannedPrompts, FULL_LINE, RankedOracle, RecordingOracle, SHORT_LINE,
    WordOracle, corpus, expected_storyline, first_lines, lexicon, line_syllables, network,
    paired, rhymes, settings, template, vectors,
};

struct World {
    lexicon: Lexicon,
    corpus: TemplateCorpus,
    rhymes: StaticRhymes,
    network: InMemoryLexicalNetwork,
    vectors: WordVectors,
    first_lines: FirstLineResources,
}

impl World {
    fn new() -> Self {
        Self {
            lexicon: lexicon(),
            corpus: corpus(),
            rhymes: rhymes(),
            network: network(),
            vectors: vectors(),
            first_lines: first_lines(),
        }
    }

    fn assembler(&self) -> PoemAssembler<'_> {
        PoemAssembler::new(
            PoemResources {
                lexicon: &self.lexicon,
                corpus: &self.corpus,
                rhymes: &self.rhymes,
                network: &self.network,
                embeddings: &self.vectors,
                stemmer: &SuffixStemmer,
                first_lines: &self.first_lines,
            },
            settings(),
        )
    }
}

const SHAPE: [usize; 5] = [FULL_LINE, FULL_LINE, SHORT_LINE, SHORT_LINE, FULL_LINE];

#[tokio::test]
async fn independent_lines_end_in_storyline_words() {
    let world = World::new();
    let oracle = RankedOracle::new();
    let mut rng = StdRng::seed_from_u64(17);

    let poem = world
        .assembler()
        .independent(&oracle, "moon", &mut rng)
        .await
        .unwrap();

    assert_eq!(poem.lines.len(), 5);
    assert_eq!(poem.last_words(), ["june", "moon", "light", "night", "spoon"]);
    assert_eq!(poem.storyline, Some(expected_storyline()));
    for (line, syllables) in poem.lines.iter().zip(SHAPE) {
        assert_eq!(line_syllables(&world.lexicon, &line.words), syllables);
        assert!(line.score.is_some());
        assert!(line.template.is_some());
    }
}

#[tokio::test]
async fn conditioned_poem_opens_with_a_name() {
    let world = World::new();
    let oracle = RankedOracle::new();
    let mut rng = StdRng::seed_from_u64(4);

    let poem = world
        .assembler()
        .conditioned(&oracle, "moon", &mut rng)
        .await
        .unwrap();

    assert_eq!(
        poem.lines[0].words,
        ["there", "was", "a", "girl", "named", "june"]
    );
    assert!(poem.lines[0].score.is_none());
    assert_eq!(poem.last_words(), ["june", "moon", "light", "night", "spoon"]);
    for (line, syllables) in poem.lines.iter().zip(SHAPE) {
        assert_eq!(line_syllables(&world.lexicon, &line.words), syllables);
    }
    assert_eq!(
        poem.lines[3].template.as_ref().map(ToString::to_string).as_deref(),
        Some("JJ NN")
    );
    assert_eq!(
        poem.lines[4].template.as_ref().map(ToString::to_string).as_deref(),
        Some("DT JJ NN VBD NN")
    );

    let rendered = poem.to_string();
    assert_eq!(rendered.lines().count(), 5);
    assert!(rendered.lines().skip(1).all(|l| l.contains("line score:")));
}

#[tokio::test]
async fn conditioned_without_paired_templates_fails_whole_poem() {
    let mut world = World::new();
    world.corpus = corpus().with_last_two_lines(std::collections::HashMap::new());
    let oracle = RankedOracle::new();
    let mut rng = StdRng::seed_from_u64(4);

    let err = world
        .assembler()
        .conditioned(&oracle, "moon", &mut rng)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::NoTemplateFound { ref key } if key.contains("NN-NN")));
}

#[tokio::test]
async fn fourth_line_continues_from_the_chosen_fifth_line() {
    let mut world = World::new();
    // Six one-syllable words score lower per word than five words with one
    // two-syllable adjective, so the second pair's fifth line wins.
    world.corpus = corpus().with_last_two_lines(std::collections::HashMap::from([(
        "NN-NN".to_string(),
        vec![
            paired("JJ NN EX VBD DT NN VBN NN", 1),
            paired("JJ NN DT JJ NN VBD NN", 1),
        ],
    )]));
    let oracle = RecordingOracle::new();
    let mut rng = StdRng::seed_from_u64(9);

    let poem = world
        .assembler()
        .conditioned(&oracle, "moon", &mut rng)
        .await
        .unwrap();

    let ln_p = f64::from(RecordingOracle::PROBABILITY).ln();
    let fifth = &poem.lines[4];
    assert_eq!(
        fifth.template.as_ref().map(ToString::to_string).as_deref(),
        Some("DT JJ NN VBD NN")
    );
    assert!((fifth.score.unwrap() - 4.0 * ln_p / 5.0).abs() < 1e-9);

    // Line 4 carries line 5's raw score: four steps there plus one here.
    let fourth = &poem.lines[3];
    assert_eq!(fourth.words.len(), 2);
    assert!((fourth.score.unwrap() - 5.0 * ln_p / 2.0).abs() < 1e-9);

    let fifth_text = fifth.words.join(" ");
    let steps = oracle.steps.lock().unwrap();
    let fourth_starts: Vec<&Vec<String>> = steps
        .iter()
        .filter(|(_, sequence)| sequence.as_slice() == ["night"])
        .map(|(state, _)| state)
        .collect();
    assert_eq!(fourth_starts.len(), 2);
    assert!(
        fourth_starts
            .iter()
            .all(|state| state.last().is_some_and(|line| line.ends_with("spoon")))
    );
    assert!(
        fourth_starts
            .iter()
            .any(|state| state.last() == Some(&fifth_text))
    );
}

#[tokio::test]
async fn oracle_failure_aborts_generation() {
    let world = World::new();
    let oracle = BrokenOracle::new();
    let mut rng = StdRng::seed_from_u64(4);

    let err = world
        .assembler()
        .independent(&oracle, "moon", &mut rng)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Oracle(_)));
}

#[tokio::test]
async fn unresolvable_seed_yields_no_poem() {
    let world = World::new();
    let oracle = RankedOracle::new();
    let mut rng = StdRng::seed_from_u64(4);

    let err = world
        .assembler()
        .conditioned(&oracle, "orange", &mut rng)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::NoStorylineFound { .. }));
}

#[tokio::test]
async fn forward_lines_follow_rhyme_groups() {
    let world = World::new();
    let oracle = WordOracle;
    let prompts = CannedPrompts::new("the cat saw the moon. the dog");
    let templates = [
        template("DT JJ NN"),
        template("JJ NN"),
        template("JJ NN"),
        template("DT JJ NN"),
    ];
    let mut rng = StdRng::seed_from_u64(8);

    let poem = world
        .assembler()
        .forward(
            &oracle,
            &prompts,
            RhymePlan::Words {
                a: "moon",
                b: "night",
            },
            &templates,
            &mut rng,
        )
        .await
        .unwrap();

    let ends = poem.last_words();
    assert_eq!(ends[0], "june");
    let group_a = ["moon", "spoon", "tune"];
    let group_b = ["night", "light"];
    assert!(group_a.contains(&ends[1]) && group_a.contains(&ends[4]));
    assert!(group_b.contains(&ends[2]) && group_b.contains(&ends[3]));
    assert_ne!(ends[1], ends[4]);
    assert_ne!(ends[2], ends[3]);
    for (line, template) in poem.lines[1..].iter().zip(&templates) {
        assert_eq!(line.words.len(), template.len());
        assert!(line.score.is_some_and(|s| s < 0.0));
    }
    assert_eq!(*prompts.seeds.lock().unwrap(), ["moon"]);
    assert!(poem.storyline.is_none());
}

#[tokio::test]
async fn forward_storyline_plan_pins_every_ending() {
    let world = World::new();
    let oracle = WordOracle;
    let prompts = CannedPrompts::new("the dog ate.");
    let chain = expected_storyline();
    let templates = [
        template("DT JJ NN"),
        template("JJ NN"),
        template("JJ NN"),
        template("DT JJ NN"),
    ];
    let mut rng = StdRng::seed_from_u64(8);

    let poem = world
        .assembler()
        .forward(
            &oracle,
            &prompts,
            RhymePlan::Storyline(&chain),
            &templates,
            &mut rng,
        )
        .await
        .unwrap();

    assert_eq!(poem.last_words(), ["june", "moon", "light", "night", "spoon"]);
    assert_eq!(poem.storyline.as_ref(), Some(&chain));
}

#[tokio::test]
async fn forward_needs_four_templates() {
    let world = World::new();
    let oracle = WordOracle;
    let prompts = CannedPrompts::new("");
    let mut rng = StdRng::seed_from_u64(8);

    let err = world
        .assembler()
        .forward(
            &oracle,
            &prompts,
            RhymePlan::Words {
                a: "moon",
                b: "night",
            },
            &[template("DT NN")],
            &mut rng,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidTemplate(_)));
}

#[tokio::test]
async fn forward_draws_templates_when_none_given() {
    let mut world = World::new();
    world.corpus = TemplateCorpus::from_templates([template("DT JJ NN"), template("JJ NN")]);
    let oracle = WordOracle;
    let prompts = CannedPrompts::new("the cat ate.");
    let chain = expected_storyline();
    let mut rng = StdRng::seed_from_u64(21);

    let poem = world
        .assembler()
        .forward(&oracle, &prompts, RhymePlan::Storyline(&chain), &[], &mut rng)
        .await
        .unwrap();

    assert_eq!(poem.last_words(), ["june", "moon", "light", "night", "spoon"]);
    for line in &poem.lines[1..] {
        let drawn = line.template.as_ref().unwrap().to_string();
        assert!(drawn == "DT JJ NN" || drawn == "JJ NN");
    }
}
