//! # pdfchat-cli
//!
//! Interactive console for asking questions about a PDF.
//!
//! On startup the PDF is split into one document per page, chunked into
//! overlapping windows, embedded and upserted into a Qdrant collection. The
//! console then loops: each question retrieves the most relevant chunks, which
//! are sent to the chat model together with the conversation so far.
//!
//! ```text
//! load → chunk → embed → store → loop(retrieve → prompt → complete → print)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use clap::Parser;
//! use pdfchat_cli::{app, settings::Args};
//!
//! let settings = Args::parse().into_settings()?;
//! let summary = app::run(settings).await?;
//! ```

pub mod app;
pub mod console;
pub mod conversation;
pub mod error;
pub mod prompt;
pub mod settings;
pub mod telemetry;

pub use conversation::{ChatSession, Conversation};
pub use error::{CliError, Result};
pub use settings::{Args, Settings};
