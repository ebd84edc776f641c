//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pdfchat_rag::{RagConfig, RagError};

use crate::error::{CliError, Result};
use crate::telemetry::LogFormat;

pub const DEFAULT_PDF: &str = "content/nodejs_tutorial.pdf";
pub const DEFAULT_COLLECTION: &str = "pdf-chunk-collection";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1-nano";

/// Ask questions about a PDF. The document is chunked, embedded into Qdrant,
/// and every answer is generated from the most relevant chunks.
#[derive(Debug, Clone, Parser)]
#[command(name = "pdfchat", version, about, long_about = None)]
pub struct Args {
    /// PDF file to ingest
    #[arg(long, env = "PDFCHAT_PDF", default_value = DEFAULT_PDF)]
    pub pdf: PathBuf,

    /// Qdrant gRPC endpoint, e.g. http://localhost:6334
    #[arg(long, env = "QDRANT_URL")]
    pub qdrant_url: Option<String>,

    #[arg(long, env = "QDRANT_API_KEY", hide_env_values = true)]
    pub qdrant_api_key: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API, used for embeddings and chat
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    #[arg(long, env = "PDFCHAT_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Request shortened embeddings of this size
    #[arg(long, env = "PDFCHAT_EMBEDDING_DIMENSIONS")]
    pub embedding_dimensions: Option<usize>,

    #[arg(long, env = "PDFCHAT_CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    pub chat_model: String,

    /// Qdrant collection holding the chunks
    #[arg(long, env = "PDFCHAT_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Chunk size in characters
    #[arg(long, env = "PDFCHAT_CHUNK_SIZE", default_value_t = 1000)]
    pub chunk_size: usize,

    /// Characters shared by neighbouring chunks
    #[arg(long, env = "PDFCHAT_CHUNK_OVERLAP", default_value_t = 400)]
    pub chunk_overlap: usize,

    /// Chunks retrieved per question
    #[arg(long, env = "PDFCHAT_TOP_K", default_value_t = 3)]
    pub top_k: usize,

    /// Chunks per embedding request
    #[arg(long, env = "PDFCHAT_EMBED_BATCH_SIZE", default_value_t = 64)]
    pub embed_batch_size: usize,

    /// Embedding batches in flight during ingestion
    #[arg(long, env = "PDFCHAT_INGEST_CONCURRENCY", default_value_t = 4)]
    pub ingest_concurrency: usize,

    /// Timeout applied to every HTTP and gRPC request
    #[arg(long, env = "PDFCHAT_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout_secs: u64,

    /// Past exchanges sent with each question (all when unset)
    #[arg(long, env = "PDFCHAT_MAX_HISTORY_TURNS")]
    pub max_history_turns: Option<usize>,

    /// Use the existing collection as is, without loading the PDF
    #[arg(long, conflicts_with = "recreate_collection")]
    pub skip_ingest: bool,

    /// Drop and recreate the collection before ingesting. Needed after changing
    /// --chunk-size, --chunk-overlap or the PDF, otherwise chunks from the
    /// earlier ingestion stay in the collection
    #[arg(long)]
    pub recreate_collection: bool,

    #[arg(long, env = "PDFCHAT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Validated settings. Building one performs no I/O.
#[derive(Clone)]
pub struct Settings {
    pub pdf_path: PathBuf,
    pub qdrant_url: String,
    pub qdrant_api_key: Option<String>,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub embedding_model: String,
    pub embedding_dimensions: Option<usize>,
    pub chat_model: String,
    pub collection: String,
    pub rag: RagConfig,
    pub request_timeout: Duration,
    pub max_history_turns: Option<usize>,
    pub skip_ingest: bool,
    pub recreate_collection: bool,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("pdf_path", &self.pdf_path)
            .field("qdrant_url", &self.qdrant_url)
            .field("qdrant_api_key", &self.qdrant_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("embedding_model", &self.embedding_model)
            .field("embedding_dimensions", &self.embedding_dimensions)
            .field("chat_model", &self.chat_model)
            .field("collection", &self.collection)
            .field("rag", &self.rag)
            .field("request_timeout", &self.request_timeout)
            .field("max_history_turns", &self.max_history_turns)
            .field("skip_ingest", &self.skip_ingest)
            .field("recreate_collection", &self.recreate_collection)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn required(value: Option<String>, flag: &str, env: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CliError::Config(format!("{flag} (or {env}) is required"))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Args {
    /// Validate into [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] when a required value is missing or the
    /// chunking and retrieval parameters are inconsistent.
    pub fn into_settings(self) -> Result<Settings> {
        let qdrant_url = required(self.qdrant_url, "--qdrant-url", "QDRANT_URL")?;
        let openai_api_key = required(self.openai_api_key, "--openai-api-key", "OPENAI_API_KEY")?;

        for (name, value) in
            [("--embedding-model", &self.embedding_model), ("--chat-model", &self.chat_model), ("--collection", &self.collection)]
        {
            if value.trim().is_empty() {
                return Err(CliError::Config(format!("{name} must not be empty")));
            }
        }
        if self.embedding_dimensions == Some(0) {
            return Err(CliError::Config("--embedding-dimensions must be greater than zero".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CliError::Config("--request-timeout-secs must be greater than zero".to_string()));
        }

        let rag = RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .embed_batch_size(self.embed_batch_size)
            .ingest_concurrency(self.ingest_concurrency)
            .build()
            .map_err(|e| match e {
                RagError::ConfigError(message) => CliError::Config(message),
                other => CliError::Rag(other),
            })?;

        Ok(Settings {
            pdf_path: self.pdf,
            qdrant_url,
            qdrant_api_key: non_empty(self.qdrant_api_key),
            openai_api_key,
            openai_base_url: non_empty(self.openai_base_url),
            embedding_model: self.embedding_model.trim().to_string(),
            embedding_dimensions: self.embedding_dimensions,
            chat_model: self.chat_model.trim().to_string(),
            collection: self.collection.trim().to_string(),
            rag,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_history_turns: self.max_history_turns,
            skip_ingest: self.skip_ingest,
            recreate_collection: self.recreate_collection,
            log_format: self.log_format,
        })
    }
}
