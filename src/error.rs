//! Error types for the compilation pipeline.

use crate::validation::ValidationResult;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading, resolving, validating, rendering, or writing.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A required top-level document is missing or malformed
    #[error("Failed to load {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// A name does not exist in the registry
    #[error("Reference error: {0}")]
    Reference(String),

    /// Validation found one or more errors
    #[error("Validation failed with {} error(s)", .0.errors.len())]
    Validation(ValidationResult),

    /// Template parse or render failure
    #[error("Template error: {0}")]
    Template(String),

    /// Staging or committing output failed
    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// Configuration or logging setup failure
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CompileError {
    pub fn load(path: &Path, message: impl ToString) -> Self {
        CompileError::Load {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn write(path: &Path, message: impl ToString) -> Self {
        CompileError::Write {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

impl From<config::ConfigError> for CompileError {
    fn from(err: config::ConfigError) -> Self {
        CompileError::Config(err.to_string())
    }
}

impl From<tera::Error> for CompileError {
    fn from(err: tera::Error) -> Self {
        // tera nests the useful message in the source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        CompileError::Template(message)
    }
}
