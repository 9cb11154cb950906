use thiserror::Error;

use crate::modules::chat::{ApplicationError, CompletionError, ImageError, RepositoryError};
use crate::modules::config::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Storage error: {0}")]
    RepositoryError(#[from] RepositoryError),

    #[error("Completion error: {0}")]
    CompletionError(#[from] CompletionError),

    #[error("Image error: {0}")]
    ImageError(#[from] ImageError),

    #[error("Chat error: {0}")]
    ApplicationError(#[from] ApplicationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Task error: {0}")]
    TaskError(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
