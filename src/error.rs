//! Error handling for salary-tax
//!
//! Defines custom error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation. The tax engine
//! itself never fails; these cover the layers around it.

use thiserror::Error;

/// Error types for the layers around the tax engine
#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("advisor error: {0}")]
    Advisor(String),

    #[error("no Gemini API key configured (set GEMINI_API_KEY or gemini_api_key in config.toml)")]
    MissingApiKey,

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application operations
pub type Result<T> = anyhow::Result<T>;
