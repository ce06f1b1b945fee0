pub mod app_config;
pub mod cache_key;
pub mod config;
pub mod facets;
pub mod filter_predicate;
pub mod lookup;
pub mod predicate;
pub mod pricing;
pub mod query;
pub mod search_predicate;
pub mod synonyms;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use lookup::{LookupSnapshot, SharedSnapshot};
pub use predicate::{Predicate, PredicateValue};
pub use query::{parse_query, ParsedQuery};
pub use synonyms::{SynonymEntry, SynonymSnapshot, SynonymType};
pub use types::*;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("validation error: {0}")]
    Validation(String),
}
