//! Error types for the `pdfchat` console.

use pdfchat_model::ModelError;
use pdfchat_rag::RagError;
use thiserror::Error;

/// Errors surfaced by the console application.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or inconsistent settings, detected before any I/O.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The console could not be read.
    #[error("Input error: {0}")]
    Input(String),

    #[error(transparent)]
    Rag(#[from] RagError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience result type for console operations.
pub type Result<T> = std::result::Result<T, CliError>;
