//! Line search: backward beam search from a fixed last word, template
//! ranking on top of it, and forward search under a token-level oracle.

pub mod backward;
pub mod beam;
pub mod best_line;
pub mod forward;

pub use backward::{BackwardLineSearcher, DEFAULT_BEAM_WIDTH, SearchOptions};
pub use beam::{Candidate, Scored, SearchBeam};
pub use best_line::{
    BestLineSelector, DEFAULT_RAND_TEMPLATES, RankedLine, RankedLines, TemplateSource,
};
pub use forward::{DEFAULT_SEARCH_SPACE, ForwardConstrainedSearcher, ForwardContext, ForwardLine};
