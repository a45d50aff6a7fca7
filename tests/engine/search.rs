use limericks::error::SearchError;
use limericks::meter::MeterPlanner;
use limericks::search::{BackwardLineSearcher, BestLineSelector, SearchOptions, TemplateSource};
use limericks::template::TemplateEntry;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::toy_world::{FULL_LINE, RankedOracle, lexicon, template};

#[test]
fn lines_match_template_length_and_tags() {
    let lexicon = lexicon();
    let oracle = RankedOracle::new();
    let planner = MeterPlanner::new(&lexicon);
    let mut rng = StdRng::seed_from_u64(9);

    for width in [1, 3, 20] {
        let searcher = BackwardLineSearcher::new(&lexicon, &oracle, SearchOptions::with_width(width));
        let template = template("DT JJ NN VBD NN");
        let plan = planner.assign(FULL_LINE, &template, 1, &mut rng).unwrap();
        let lines = searcher.search(&template, &plan, "moon", None).unwrap();

        assert!(!lines.is_empty());
        assert!(lines.len() <= width);
        for line in &lines {
            assert_eq!(line.words.len(), template.len());
            assert_eq!(line.last_word(), Some("moon"));
            for (word, tag) in line.words.iter().zip(template.tags()).take(template.len() - 1) {
                assert!(lexicon.has_tag(word, tag), "{word} is not {tag}");
            }
        }
        assert!(lines.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[test]
fn slot_without_admissible_word_is_no_line_found() {
    let lexicon = lexicon();
    let oracle = RankedOracle::new();
    let searcher = BackwardLineSearcher::new(&lexicon, &oracle, SearchOptions::with_width(1));
    let template = template("DT MD NN");
    let plan = limericks::meter::SyllablePlan::from_counts(vec![1, 1, 1]);

    let err = searcher.search(&template, &plan, "moon", None).unwrap_err();
    assert!(matches!(err, SearchError::NoLineFound { ref word, .. } if word == "moon"));
}

#[test]
fn excluded_words_never_appear() {
    let lexicon = lexicon();
    let oracle = RankedOracle::new();
    let mut options = SearchOptions::with_width(10);
    options.excluded.insert("the".to_string());
    options.excluded.insert("cat".to_string());
    let searcher = BackwardLineSearcher::new(&lexicon, &oracle, options);
    let template = template("DT JJ NN VBD NN");
    let mut rng = StdRng::seed_from_u64(2);
    let plan = MeterPlanner::new(&lexicon)
        .assign(FULL_LINE, &template, 1, &mut rng)
        .unwrap();

    let lines = searcher.search(&template, &plan, "spoon", None).unwrap();
    for line in lines {
        assert!(!line.words.iter().any(|w| w == "the" || w == "cat"));
    }
}

#[test]
fn ranked_lines_are_sorted_and_skips_counted() {
    let lexicon = lexicon();
    let oracle = RankedOracle::new();
    let searcher = BackwardLineSearcher::new(&lexicon, &oracle, SearchOptions::with_width(4));
    let selector = BestLineSelector::new(&lexicon, searcher, 5);
    let entries = [
        TemplateEntry::new(template("DT JJ NN VBD NN")),
        TemplateEntry::new(template("DT MD NN")),
        TemplateEntry::new(template("EX VBD DT NN VBN NN")),
        TemplateEntry::new(template("DT NN VBD NN")),
    ];
    let mut rng = StdRng::seed_from_u64(5);

    let ranked = selector
        .select("moon", FULL_LINE, TemplateSource::Explicit(&entries), None, &mut rng)
        .unwrap();
    assert_eq!(ranked.lines.len() + ranked.skipped, entries.len());
    assert!(ranked.skipped >= 1);
    assert!(
        ranked
            .lines
            .windows(2)
            .all(|w| w[0].normalized_score >= w[1].normalized_score)
    );
    assert_eq!(ranked.best().words.last().map(String::as_str), Some("moon"));
}

#[test]
fn all_templates_failing_is_no_line_found() {
    let lexicon = lexicon();
    let oracle = RankedOracle::new();
    let searcher = BackwardLineSearcher::new(&lexicon, &oracle, SearchOptions::default());
    let selector = BestLineSelector::new(&lexicon, searcher, 5);
    let entries = [TemplateEntry::new(template("DT MD NN"))];
    let mut rng = StdRng::seed_from_u64(5);

    let err = selector
        .select("moon", FULL_LINE, TemplateSource::Explicit(&entries), None, &mut rng)
        .unwrap_err();
    assert!(matches!(err, SearchError::NoLineFound { .. }));
}
