//! # pdfchat-rag
//!
//! Retrieval building blocks for chatting with a PDF.
//!
//! ## Overview
//!
//! - [`load_pdf`] - one [`Document`] per PDF page, carrying its page number
//! - [`FixedSizeChunker`] - overlapping character windows (1000/400 by default)
//! - [`EmbeddingProvider`] - text → vector; [`openai::OpenAIEmbeddingProvider`] behind the `openai` feature
//! - [`VectorStore`] - collections of embedded chunks; [`qdrant::QdrantVectorStore`]
//!   behind the `qdrant` feature and [`InMemoryVectorStore`] for tests
//! - [`RagPipeline`] - chunk → embed → upsert with bounded concurrency, and query
//! - [`Retriever`] - top-k search over one collection
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pdfchat_rag::{FixedSizeChunker, RagConfig, RagPipeline, Retriever, load_pdf};
//!
//! let config = RagConfig::default();
//! let pipeline = Arc::new(
//!     RagPipeline::builder()
//!         .chunker(Arc::new(FixedSizeChunker::from_config(&config)?))
//!         .config(config)
//!         .embedding_provider(embedder)
//!         .vector_store(store)
//!         .build()?,
//! );
//!
//! pipeline.create_collection("pdf-chunk-collection").await?;
//! pipeline.ingest_batch("pdf-chunk-collection", &load_pdf("content/guide.pdf").await?).await?;
//!
//! let retriever = Retriever::new(pipeline, "pdf-chunk-collection");
//! let hits = retriever.retrieve("What is Node.js?").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod loader;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod retriever;
pub mod vectorstore;

pub use chunking::{Chunker, FixedSizeChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, DocumentMetadata, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use loader::load_pdf;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use retriever::Retriever;
pub use vectorstore::VectorStore;
