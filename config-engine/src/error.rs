use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration parsing failed: {0}")]
    ParseError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to read environment file: {0}")]
    EnvFile(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
