use std::io;
use thiserror::Error;

// Import module-level errors for AppError
use crate::config::settings::ConfigError;
use crate::shell::runner::ShellError;

/// Errors that can occur while dispatching git commands
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Unsupported git subcommand: {0}")]
    UnsupportedCommand(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(String),

    #[error("Failed to parse git output: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Top-level application error that wraps all module-specific errors
///
/// This provides a unified error type for application-level code while preserving
/// the specific error context from each module. All module errors automatically
/// convert to AppError via the `From` trait.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Shell error: {0}")]
    Shell(#[from] ShellError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
