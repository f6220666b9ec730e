//! Error types for exchange definitions

use thiserror::Error;

/// Result type for definition operations
pub type Result<T> = std::result::Result<T, DefinitionError>;

/// Errors raised while loading, validating or decoding exchange definitions
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Exchange definition not found: {0}")]
    NotFound(String),

    #[error("Unknown literal '{value}' for vocabulary {vocabulary}")]
    UnknownLiteral { vocabulary: String, value: String },

    #[error("Routing key '{key}' is not declared by exchange {exchange}")]
    UnknownRoutingKey { exchange: String, key: String },

    #[error("Duplicate {what} '{value}' in {scope}")]
    Duplicate {
        what: &'static str,
        value: String,
        scope: String,
    },

    #[error("Invalid identifier '{ident}' in {scope}: {reason}")]
    InvalidIdentifier {
        ident: String,
        scope: String,
        reason: &'static str,
    },

    #[error("Invalid value {value:?} in {scope}: {reason}")]
    InvalidValue {
        value: String,
        scope: String,
        reason: &'static str,
    },

    #[error("Invalid manifest {source_name}: {reason}")]
    InvalidManifest { source_name: String, reason: String },

    #[error("Vocabulary {vocabulary} in {exchange} refers to undeclared key '{key}'")]
    DanglingVocabulary {
        exchange: String,
        vocabulary: String,
        key: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ignore pattern error: {0}")]
    Pattern(#[from] ignore::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
