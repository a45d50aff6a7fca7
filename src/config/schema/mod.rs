mod core;
mod data;
mod observability;
mod poem;
mod rhyme;
mod search;

pub use self::core::LimerickConfig;
pub use data::DataConfig;
pub use observability::ObservabilityConfig;
pub use poem::PoemConfig;
pub use rhyme::RhymeConfig;
pub use search::SearchConfig;
