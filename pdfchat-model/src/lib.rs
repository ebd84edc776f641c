//! # pdfchat-model
//!
//! Chat-completion models for pdfchat.
//!
//! ## Overview
//!
//! - [`ChatModel`] - the trait the console talks to: messages in, reply out
//! - [`OpenAIChatClient`] - OpenAI and OpenAI-compatible servers (feature `openai`)
//! - [`MockChatModel`] - scripted replies for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pdfchat_model::{ChatMessage, ChatModel};
//! use pdfchat_model::openai::{OpenAIChatClient, OpenAIConfig};
//!
//! let model = OpenAIChatClient::new(OpenAIConfig::new(
//!     std::env::var("OPENAI_API_KEY")?,
//!     "gpt-4.1-nano",
//! ))?;
//! let reply = model
//!     .complete(&[ChatMessage::system("Be brief."), ChatMessage::user("What is Node.js?")])
//!     .await?;
//! ```

pub mod error;
pub mod message;
pub mod mock;
pub mod model;
#[cfg(feature = "openai")]
pub mod openai;

pub use error::{ModelError, Result};
pub use message::{ChatMessage, Role};
pub use mock::MockChatModel;
pub use model::ChatModel;
#[cfg(feature = "openai")]
pub use openai::OpenAIChatClient;
