//! Error types for schema loading and subset computation

use thiserror::Error;

use crate::schema::EntityKind;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{kind} not found in schema: {name}{}", did_you_mean(.suggestion))]
    UnknownEntity {
        kind: EntityKind,
        name: String,
        suggestion: Option<String>,
    },

    #[error("Unknown entity kind: {0} (expected one of: type, resource, function)")]
    UnknownKind(String),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean `{}`?)", name),
        None => String::new(),
    }
}
