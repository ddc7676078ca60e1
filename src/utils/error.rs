use thiserror::Error;

#[derive(Error, Debug)]
pub enum KitError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Operation timed out after {limit_ms}ms")]
    TimeoutError { limit_ms: u64 },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Scenario '{scenario}' failed: {details}")]
    ScenarioError { scenario: String, details: String },
}

pub type Result<T> = std::result::Result<T, KitError>;
