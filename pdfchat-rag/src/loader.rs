//! PDF loading.
//!
//! [`load_pdf`] turns a PDF on disk into one [`Document`] per page. Text
//! extraction is CPU-bound and the parser may panic on malformed input, so it
//! runs on the blocking pool and a panic is reported as [`RagError::LoadError`].

use std::path::Path;

use tracing::{debug, info};

use crate::document::Document;
use crate::error::{RagError, Result};

/// Load a PDF file, producing one [`Document`] per page in page order.
///
/// Pages are numbered from 1. Pages without extractable text still produce a
/// (empty) document so that numbering stays aligned with the file.
///
/// # Errors
///
/// Returns [`RagError::LoadError`] if the file does not exist, cannot be read,
/// or is not a parseable PDF.
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref().to_path_buf();
    let source = path.display().to_string();
    debug!(path = %source, "loading PDF");

    if !path.is_file() {
        return Err(RagError::LoadError { path: source, message: "file not found".to_string() });
    }

    let pages = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_by_pages(&path).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| RagError::LoadError {
        path: source.clone(),
        message: format!("PDF parser aborted: {e}"),
    })?
    .map_err(|e| RagError::LoadError {
        path: source.clone(),
        message: format!("not a readable PDF: {e}"),
    })?;

    let documents: Vec<Document> = pages
        .into_iter()
        .enumerate()
        .map(|(index, text)| Document::new(text, source.as_str(), index as u32 + 1))
        .collect();

    for document in &documents {
        debug!(
            page = document.metadata.page_number,
            chars = document.text.chars().count(),
            "extracted page"
        );
    }
    info!(path = %source, page_count = documents.len(), "loaded PDF");

    Ok(documents)
}
