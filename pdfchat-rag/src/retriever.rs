//! Top-k retrieval over an ingested collection.

use std::sync::Arc;

use crate::config::DEFAULT_TOP_K;
use crate::document::SearchResult;
use crate::error::Result;
use crate::pipeline::RagPipeline;

/// Retrieves the most relevant chunks of one collection for a query.
///
/// A thin wrapper over [`RagPipeline::search`] that pins the collection and
/// the number of results. No caching, no re-ranking: results come back in
/// the order the vector store ranked them.
#[derive(Clone)]
pub struct Retriever {
    pipeline: Arc<RagPipeline>,
    collection: String,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever returning the top 3 chunks of `collection`.
    pub fn new(pipeline: Arc<RagPipeline>, collection: impl Into<String>) -> Self {
        Self { pipeline, collection: collection.into(), top_k: DEFAULT_TOP_K }
    }

    /// Change how many chunks each query returns. Zero is treated as one.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// The collection this retriever searches.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Number of chunks returned per query.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Return the chunks most similar to `query`, most relevant first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.pipeline.search(&self.collection, query, self.top_k).await
    }
}
