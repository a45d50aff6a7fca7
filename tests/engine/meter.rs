use limericks::error::SearchError;
use limericks::lexicon::{Lexicon, is_punctuation};
use limericks::meter::MeterPlanner;
use limericks::template::{TemplateCorpus, TemplateSelector};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::toy_world::{corpus, lexicon, template};

#[test]
fn determiner_takes_the_remaining_syllable() {
    let lexicon = Lexicon::builder()
        .word("the", &["DT"], &["1"])
        .word("pony", &["NN"], &["10"])
        .build();
    let mut rng = StdRng::seed_from_u64(1);
    let plan = MeterPlanner::new(&lexicon)
        .assign(3, &template("DT NN"), 2, &mut rng)
        .unwrap();
    assert_eq!(plan.counts(), [1, 2]);
}

#[test]
fn disallowed_determiner_count_has_no_meter() {
    let lexicon = Lexicon::builder()
        .word("only", &["DT"], &["10"])
        .word("pony", &["NN"], &["10"])
        .build();
    let mut rng = StdRng::seed_from_u64(1);
    let err = MeterPlanner::new(&lexicon)
        .assign(3, &template("DT NN"), 2, &mut rng)
        .unwrap_err();
    assert!(matches!(err, SearchError::NoValidMeter { syllables: 3, .. }));
}

#[test]
fn every_plan_sums_to_total_and_respects_tags() {
    let lexicon = lexicon();
    let planner = MeterPlanner::new(&lexicon);
    let cases = [
        ("DT JJ NN VBD NN", 6),
        ("DT JJ NN VBD NN", 5),
        ("JJ NN", 3),
        ("JJ NN , DT NN", 5),
        ("EX VBD DT NN VBN NNP", 6),
    ];

    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        for (tags, total) in cases {
            let template = template(tags);
            let plan = planner.assign(total, &template, 1, &mut rng).unwrap();
            assert_eq!(plan.len(), template.len());
            assert_eq!(plan.total(), total, "{tags} with seed {seed}");
            for (slot, tag) in template.tags().iter().enumerate() {
                let count = plan.get(slot).unwrap();
                if is_punctuation(tag) {
                    assert_eq!(count, 0);
                } else if slot + 1 < template.len() {
                    assert!(lexicon.allowed_syllables(tag).unwrap().contains(&count));
                }
            }
        }
    }
}

#[test]
fn empty_end_tag_bucket_has_no_template() {
    let mut rng = StdRng::seed_from_u64(3);
    let corpus = corpus();
    let err = TemplateSelector::new(&corpus)
        .sample_by_end_tag_and_length("NNP", 2, &mut rng)
        .unwrap_err();
    assert!(matches!(err, SearchError::NoTemplateFound { .. }));

    let empty = TemplateCorpus::default();
    let err = TemplateSelector::new(&empty)
        .sample_by_end_tag_and_length("NNP", 5, &mut rng)
        .unwrap_err();
    assert!(matches!(err, SearchError::NoTemplateFound { .. }));
}
