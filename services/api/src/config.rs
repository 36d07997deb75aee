//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Directory where the persisted state blobs live.
    pub data_dir: PathBuf,
    pub openai_api_key: Option<String>,
    pub recommendation_model: String,
    pub fitness_model: String,
    /// Sampling temperature for both models; kept low for determinism.
    pub temperature: f32,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure
    /// tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        // The API key is optional here so the `openapi` binary can run
        // without one; the server binary requires it at startup.
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        let recommendation_model = std::env::var("RECOMMENDATION_MODEL")
            .unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let fitness_model =
            std::env::var("FITNESS_MODEL").unwrap_or_else(|_| "gpt-4".to_string());

        let temperature = match std::env::var("MODEL_TEMPERATURE") {
            Ok(raw) => raw.parse::<f32>().map_err(|e| {
                ConfigError::InvalidValue("MODEL_TEMPERATURE".to_string(), e.to_string())
            })?,
            Err(_) => 0.2,
        };

        Ok(Self {
            bind_address,
            log_level,
            data_dir,
            openai_api_key,
            recommendation_model,
            fitness_model,
            temperature,
        })
    }
}
