use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Load a `.env` file into the process environment if one is present.
/// Missing files are fine; anything else is logged and ignored so a broken
/// dotfile never takes the tool down.
pub fn load_env() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => log::debug!("no .env file found"),
        Err(err) => log::warn!("failed to load .env: {}", err),
    }
}

/// Flattening configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct FlattenConfig {
    /// Schema the generated tables are created in
    #[validate(length(min = 1, message = "Generated schema cannot be empty"))]
    pub generated_schema: String,

    /// Hierarchy text table joined for label resolution
    #[validate(length(min = 1, message = "Text table cannot be empty"))]
    pub text_table: String,

    /// Language key used when resolving node texts
    #[validate(length(min = 1, max = 2, message = "Language key must be 1-2 characters"))]
    pub language: String,

    /// Rows per block for chunked bulk inserts
    #[validate(range(
        min = 1,
        max = 10_000_000,
        message = "Insert chunk size must be between 1 and 10000000"
    ))]
    pub insert_chunk_size: u32,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            generated_schema: "HIERFLAT".to_string(),
            text_table: "RSTHIERNODE".to_string(),
            language: "E".to_string(),
            insert_chunk_size: 100_000,
        }
    }
}

impl FlattenConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            generated_schema: env::var("HIERFLAT_GENERATED_SCHEMA")
                .unwrap_or_else(|_| "HIERFLAT".to_string()),
            text_table: env::var("HIERFLAT_TEXT_TABLE")
                .unwrap_or_else(|_| "RSTHIERNODE".to_string()),
            language: env::var("HIERFLAT_LANGUAGE").unwrap_or_else(|_| "E".to_string()),
            insert_chunk_size: parse_env_var("HIERFLAT_INSERT_CHUNK_SIZE", "100000")?,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
