#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod error;
pub mod lexicon;
pub mod meter;
pub mod oracle;
pub mod poem;
pub mod search;
pub mod semantic;
pub mod template;

pub use config::LimerickConfig;
pub use error::{LimerickError, SearchError};
pub use poem::{Poem, PoemAssembler, PoemData, Strategy};
