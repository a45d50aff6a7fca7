pub mod schema;

pub use schema::{
    DataConfig, LimerickConfig, ObservabilityConfig, PoemConfig, RhymeConfig, SearchConfig,
};
