pub mod app_config;
pub mod config;
pub mod inputs;
pub mod listings;
pub mod locations;
pub mod query;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use inputs::{RelevancyInstructions, ResumeInput};
pub use listings::ListingRecord;
pub use locations::{load_locations, GeoParameters, LocationEntry, LocationTable, UnknownLocation};
pub use query::{QueryError, SearchQuery, SearchQueryBuilder, SortMode, MAX_LIMIT, MIN_LIMIT};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read locations file {path}: {source}")]
    LocationsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locations file: {0}")]
    LocationsFileParse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}
