//! Error types for the `pdfchat-model` crate.

use thiserror::Error;

/// Errors produced while talking to a chat-completion model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The provider rejected the request or could not be reached.
    #[error("Chat provider error ({provider}): {message}")]
    Provider {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The provider answered without any assistant content.
    #[error("Chat provider ({provider}) returned no content")]
    EmptyResponse {
        /// The provider that produced the empty answer.
        provider: String,
    },

    /// Invalid client configuration (missing key, bad model name).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
