//! Collection preparation against the in-memory store.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pdfchat_cli::app::{prepare_collection, run};
use pdfchat_cli::telemetry::LogFormat;
use pdfchat_cli::{CliError, Settings};
use pdfchat_model::ModelError;
use pdfchat_rag::{
    EmbeddingProvider, FixedSizeChunker, InMemoryVectorStore, RagConfig, RagError, RagPipeline,
};

struct ConstantEmbedder;

#[async_trait]
impl EmbeddingProvider for ConstantEmbedder {
    async fn embed(&self, _text: &str) -> pdfchat_rag::Result<Vec<f32>> {
        Ok(vec![1.0, 0.0, 0.0])
    }

    fn dimensions(&self) -> usize {
        3
    }
}

fn settings(pdf: PathBuf, skip_ingest: bool) -> Settings {
    Settings {
        pdf_path: pdf,
        qdrant_url: "http://localhost:6334".to_string(),
        qdrant_api_key: None,
        openai_api_key: "sk-test".to_string(),
        openai_base_url: None,
        embedding_model: "text-embedding-3-large".to_string(),
        embedding_dimensions: None,
        chat_model: "gpt-4.1-nano".to_string(),
        collection: "pdf-chunk-collection".to_string(),
        rag: RagConfig::default(),
        request_timeout: Duration::from_secs(60),
        max_history_turns: None,
        skip_ingest,
        recreate_collection: false,
        log_format: LogFormat::Pretty,
    }
}

fn pipeline(store: Arc<InMemoryVectorStore>) -> RagPipeline {
    RagPipeline::builder()
        .config(RagConfig::default())
        .chunker(Arc::new(FixedSizeChunker::new(1000, 400).unwrap()))
        .embedding_provider(Arc::new(ConstantEmbedder))
        .vector_store(store)
        .build()
        .unwrap()
}

#[tokio::test]
async fn skip_ingest_only_ensures_the_collection() {
    let store = Arc::new(InMemoryVectorStore::new());
    let settings = settings(PathBuf::from("does/not/exist.pdf"), true);

    let stored = prepare_collection(&pipeline(store.clone()), &settings).await.unwrap();
    assert_eq!(stored, 0);
    assert_eq!(store.count("pdf-chunk-collection").await, Some(0));
}

#[tokio::test]
async fn missing_pdf_fails_before_touching_the_store() {
    let store = Arc::new(InMemoryVectorStore::new());
    let settings = settings(PathBuf::from("does/not/exist.pdf"), false);

    let err = prepare_collection(&pipeline(store.clone()), &settings).await.unwrap_err();
    assert!(matches!(err, CliError::Rag(RagError::LoadError { .. })));
    assert_eq!(store.count("pdf-chunk-collection").await, None);
}

#[tokio::test]
async fn chat_model_is_validated_before_the_pdf_is_read() {
    let mut settings = settings(PathBuf::from("does/not/exist.pdf"), false);
    settings.chat_model = String::new();

    let err = run(settings).await.unwrap_err();
    assert!(matches!(err, CliError::Model(ModelError::Config(_))));
}
