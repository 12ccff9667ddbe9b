pub mod app_config;
pub mod config;
pub mod plans;
pub mod providers;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use plans::{PlanDetail, PlanGeography, PlanSummary};
pub use providers::{brand_key, load_providers, Provider, ProviderDirectory};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read provider directory {path}: {source}")]
    ProvidersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse provider CSV: {0}")]
    ProvidersCsv(#[from] csv::Error),

    #[error("failed to parse provider YAML: {0}")]
    ProvidersYaml(#[from] serde_yaml::Error),

    #[error("provider directory validation failed: {0}")]
    Validation(String),
}
