//! Startup wiring: load, ingest, then hand over to the console loop.

use std::sync::Arc;

use pdfchat_model::openai::{OpenAIChatClient, OpenAIConfig};
use pdfchat_rag::openai::OpenAIEmbeddingProvider;
use pdfchat_rag::qdrant::QdrantVectorStore;
use pdfchat_rag::{FixedSizeChunker, RagPipeline, Retriever, load_pdf};
use tracing::{info, warn};

use crate::console::{
    ExitReason, LoopSummary, RustylineReader, ctrl_c, run_loop, unless_interrupted,
};
use crate::conversation::{ChatSession, Conversation};
use crate::error::Result;
use crate::prompt::SYSTEM_PROMPT;
use crate::settings::Settings;

/// Build the embedding, vector store and chunking pipeline described by `settings`.
pub fn build_pipeline(settings: &Settings) -> Result<RagPipeline> {
    let mut embedder = OpenAIEmbeddingProvider::new(settings.openai_api_key.clone())?
        .with_model(settings.embedding_model.clone())
        .with_timeout(settings.request_timeout);
    if let Some(base_url) = &settings.openai_base_url {
        embedder = embedder.with_base_url(base_url.clone());
    }
    if let Some(dims) = settings.embedding_dimensions {
        embedder = embedder.with_dimensions(dims);
    }

    let store = QdrantVectorStore::connect(
        &settings.qdrant_url,
        settings.qdrant_api_key.clone(),
        Some(settings.request_timeout),
    )?;

    let pipeline = RagPipeline::builder()
        .config(settings.rag.clone())
        .embedding_provider(Arc::new(embedder))
        .vector_store(Arc::new(store))
        .chunker(Arc::new(FixedSizeChunker::from_config(&settings.rag)?))
        .build()?;
    Ok(pipeline)
}

/// Build the chat model described by `settings`.
pub fn build_chat_model(settings: &Settings) -> Result<OpenAIChatClient> {
    let mut config = OpenAIConfig::new(settings.openai_api_key.clone(), settings.chat_model.clone())
        .with_timeout(settings.request_timeout);
    if let Some(base_url) = &settings.openai_base_url {
        config = config.with_base_url(base_url.clone());
    }
    Ok(OpenAIChatClient::new(config)?)
}

/// Make sure `settings.collection` exists and, unless ingestion is skipped,
/// holds the chunks of `settings.pdf_path`. Returns the number of chunks stored.
pub async fn prepare_collection(pipeline: &RagPipeline, settings: &Settings) -> Result<usize> {
    if settings.skip_ingest {
        pipeline.create_collection(&settings.collection).await?;
        info!(collection = %settings.collection, "skipping ingestion");
        return Ok(0);
    }

    let documents = load_pdf(&settings.pdf_path).await?;

    // The collection must exist before any batch is upserted.
    if settings.recreate_collection {
        pipeline.recreate_collection(&settings.collection).await?;
    } else {
        pipeline.create_collection(&settings.collection).await?;
    }

    let chunks = pipeline.ingest_batch(&settings.collection, &documents).await?;
    info!(
        pdf = %settings.pdf_path.display(),
        pages = documents.len(),
        chunks = chunks.len(),
        collection = %settings.collection,
        "ingestion complete"
    );
    Ok(chunks.len())
}

/// Run the whole program: ingest, then answer questions until the user leaves.
///
/// Both clients are built before any network or file I/O. Ctrl-C during
/// ingestion or while waiting for an answer ends the run normally.
pub async fn run(settings: Settings) -> Result<LoopSummary> {
    info!(?settings, "starting pdfchat");

    let pipeline = Arc::new(build_pipeline(&settings)?);
    let model = Arc::new(build_chat_model(&settings)?);

    let Some(prepared) = unless_interrupted(prepare_collection(&pipeline, &settings), ctrl_c()).await
    else {
        warn!("interrupted during ingestion");
        return Ok(LoopSummary { turns: 0, failed_turns: 0, reason: ExitReason::Interrupted });
    };
    prepared?;

    let retriever = Retriever::new(pipeline, settings.collection.clone()).with_top_k(settings.rag.top_k);
    let session = ChatSession::new(retriever, model);
    let mut conversation =
        Conversation::new(SYSTEM_PROMPT).with_max_history_turns(settings.max_history_turns);

    let mut reader = RustylineReader::new()?;
    let mut stdout = std::io::stdout();
    run_loop(&mut reader, &session, &mut conversation, &mut stdout, None, ctrl_c()).await
}
