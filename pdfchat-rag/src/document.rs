//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a piece of text came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DocumentMetadata {
    /// Path of the source file as given to the loader.
    pub source_path: String,
    /// 1-based page number inside the source file.
    pub page_number: u32,
}

/// One page of a source PDF.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Stable identifier, derived from the source path and page number.
    pub id: String,
    /// The extracted page text.
    pub text: String,
    /// Source path and page number.
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Create a page document, deriving its id from the source path and page.
    pub fn new(text: impl Into<String>, source_path: impl Into<String>, page_number: u32) -> Self {
        let source_path = source_path.into();
        Self {
            id: format!("{source_path}#page={page_number}"),
            text: text.into(),
            metadata: DocumentMetadata { source_path, page_number },
        }
    }
}

/// A segment of a [`Document`] with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// UUID string derived from the parent document id and chunk index.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until embedded.
    pub embedding: Vec<f32>,
    /// Metadata inherited unchanged from the parent document.
    pub metadata: DocumentMetadata,
    /// The ID of the parent [`Document`].
    pub document_id: String,
    /// Position of this chunk within its parent document.
    pub chunk_index: usize,
}

impl Chunk {
    /// Deterministic point id for the `chunk_index`-th chunk of `document_id`.
    ///
    /// Re-ingesting the same document yields the same ids, so upserts overwrite
    /// instead of duplicating.
    pub fn stable_id(document_id: &str, chunk_index: usize) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("{document_id}#chunk={chunk_index}").as_bytes())
            .to_string()
    }

    /// The page this chunk was cut from.
    pub fn page_number(&self) -> u32 {
        self.metadata.page_number
    }
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
