//! OpenAI chat completions (and OpenAI-compatible servers).

mod client;
mod config;
mod convert;

pub use client::OpenAIChatClient;
pub use config::{DEFAULT_CHAT_MODEL, OPENAI_API_BASE, OpenAIConfig};
