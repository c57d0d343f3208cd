use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LambdaError>;

#[derive(Error, Debug)]
pub enum LambdaError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid value for config field '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Failed to spawn thread for task '{name}': {source}")]
    Spawn {
        name: String,
        source: std::io::Error,
    },

    #[error("Task '{name}' panicked: {message}")]
    TaskPanicked { name: String, message: String },

    #[error("Worker pool is shut down, task '{name}' was not accepted")]
    PoolClosed { name: String },

    #[error("Failed to set up logging: {0}")]
    Logging(String),

    #[error("Console write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl LambdaError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn task_panicked(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskPanicked {
            name: name.into(),
            message: message.into(),
        }
    }
}
