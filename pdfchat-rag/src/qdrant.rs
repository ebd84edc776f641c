//! Qdrant vector store backend.
//!
//! Provides [`QdrantVectorStore`] which implements [`VectorStore`] using
//! the [qdrant-client](https://docs.rs/qdrant-client) crate over gRPC.
//!
//! Each chunk becomes one point whose payload is
//! `{ text, page_number, source_path, document_id, chunk_index }`.
//!
//! # Example
//!
//! ```rust,ignore
//! use pdfchat_rag::qdrant::QdrantVectorStore;
//!
//! let store = QdrantVectorStore::new("http://localhost:6334")?;
//! store.create_collection("pdf-chunk-collection", 3072).await?;
//! store.upsert("pdf-chunk-collection", &chunks).await?;
//! let results = store.search("pdf-chunk-collection", &query_embedding, 3).await?;
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointId, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;
use tracing::debug;

use crate::document::{Chunk, DocumentMetadata, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Wraps a [`qdrant_client::Qdrant`] client and maps collections to Qdrant
/// collections with cosine distance.
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    /// Create a new Qdrant vector store connecting to the given URL.
    pub fn new(url: &str) -> Result<Self> {
        Self::connect(url, None, None)
    }

    /// Create a store with an optional API key and request timeout.
    pub fn connect(url: &str, api_key: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Qdrant::from_url(url);
        if let Some(api_key) = api_key {
            builder = builder.api_key(api_key);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Self::map_err)?;
        debug!(url, "configured qdrant client");
        Ok(Self { client })
    }

    /// Create a new Qdrant vector store from an existing client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::VectorStoreError { backend: "qdrant".to_string(), message: e.to_string() }
    }
}

/// Build the point payload stored alongside a chunk's vector.
fn chunk_payload(chunk: &Chunk) -> Result<Payload> {
    Payload::try_from(json!({
        "text": chunk.text,
        "page_number": chunk.metadata.page_number,
        "source_path": chunk.metadata.source_path,
        "document_id": chunk.document_id,
        "chunk_index": chunk.chunk_index,
    }))
    .map_err(|e| RagError::VectorStoreError {
        backend: "qdrant".to_string(),
        message: format!("invalid payload for chunk '{}': {e}", chunk.id),
    })
}

fn payload_string(payload: &HashMap<String, QdrantValue>, key: &str) -> String {
    match payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => s.clone(),
        _ => String::new(),
    }
}

fn payload_integer(payload: &HashMap<String, QdrantValue>, key: &str) -> i64 {
    match payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(Kind::IntegerValue(n)) => *n,
        Some(Kind::DoubleValue(n)) => *n as i64,
        _ => 0,
    }
}

fn point_id_string(id: Option<&PointId>) -> String {
    match id.and_then(|pid| pid.point_id_options.as_ref()) {
        Some(PointIdOptions::Uuid(s)) => s.clone(),
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}

/// Rebuild a chunk (without its vector) from a point id and payload.
fn chunk_from_payload(id: String, payload: &HashMap<String, QdrantValue>) -> Chunk {
    Chunk {
        id,
        text: payload_string(payload, "text"),
        embedding: Vec::new(),
        metadata: DocumentMetadata {
            source_path: payload_string(payload, "source_path"),
            page_number: u32::try_from(payload_integer(payload, "page_number")).unwrap_or(0),
        },
        document_id: payload_string(payload, "document_id"),
        chunk_index: usize::try_from(payload_integer(payload, "chunk_index")).unwrap_or(0),
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let collections = self.client.list_collections().await.map_err(Self::map_err)?;
        let exists = collections.collections.iter().any(|c| c.name == name);
        if exists {
            debug!(collection = name, "qdrant collection already exists, skipping creation");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection = name, dimensions, "created qdrant collection");
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let collections = self.client.list_collections().await.map_err(Self::map_err)?;
        if !collections.collections.iter().any(|c| c.name == name) {
            return Ok(());
        }
        self.client.delete_collection(name).await.map_err(Self::map_err)?;
        debug!(collection = name, "deleted qdrant collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let points = chunks
            .iter()
            .map(|chunk| {
                Ok(PointStruct::new(chunk.id.clone(), chunk.embedding.clone(), chunk_payload(chunk)?))
            })
            .collect::<Result<Vec<PointStruct>>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection, count = chunks.len(), "upserted chunks to qdrant");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, embedding.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| SearchResult {
                chunk: chunk_from_payload(point_id_string(scored.id.as_ref()), &scored.payload),
                score: scored.score,
            })
            .collect();

        Ok(results)
    }
}
