use std::io;

use config::ConfigError;
use runway_wind::ResolverError;
use thiserror::Error;

pub(crate) type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub(crate) enum ApplicationError {
    #[error("Error regarding config: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Could not find a config directory for this platform")]
    NoConfigDirectory,
    #[error("Missing API token: set {0} in the config file or the environment")]
    MissingApiToken(&'static str),
    #[error("System input/output error: {0}")]
    IoError(#[from] io::Error),
    #[error("Error with reqwest: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("No request was attempted for {0}")]
    NoRequestAttempted(String),
    #[error("Failed to write TOML: {0}")]
    TomlError(#[from] toml::ser::Error),
    #[error("Failed to decode JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to resolve runway winds: {0}")]
    ResolverError(#[from] ResolverError),
    #[error("Time error: {0}")]
    TimeError(#[from] jiff::Error),
}
