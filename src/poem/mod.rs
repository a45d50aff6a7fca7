pub mod assembler;
pub mod data;
pub mod first_line;
pub mod sketch;

pub use assembler::{AssemblySettings, PoemAssembler, PoemResources, RhymePlan, Strategy};
pub use data::PoemData;
pub use first_line::{
    CITY_CATEGORY, FirstLineBuilder, FirstLineResources, load_first_line_resources,
};
pub use sketch::{LineSketch, PoemSketch};

use std::fmt;

use crate::semantic::StorylineChain;
use crate::template::Template;

/// Column the score is aligned to when a poem is rendered.
const LINE_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct PoemLine {
    pub words: Vec<String>,
    /// Normalized backward score or forward log-probability; `None` for
    /// lines that were not searched (the opening line).
    pub score: Option<f64>,
    pub template: Option<Template>,
}

impl PoemLine {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// A complete five-line limerick.
#[derive(Debug, Clone, PartialEq)]
pub struct Poem {
    pub lines: Vec<PoemLine>,
    pub storyline: Option<StorylineChain>,
}

impl Poem {
    pub fn last_words(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| line.words.last().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Poem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line.score {
                Some(score) => {
                    writeln!(f, "{:<LINE_WIDTH$} line score: {score:.3}", line.text())?;
                }
                None => writeln!(f, "{}", line.text())?,
            }
        }
        Ok(())
    }
}
