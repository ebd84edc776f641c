//! Prompt construction for retrieval-augmented answers.

use pdfchat_rag::SearchResult;

/// Instructions sent as the first message of every conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.\n\
Answer the user's query based solely on the context provided with it.\n\
Each piece of context includes the page number it was taken from.\n\
Use only the given context to generate your answer and cite the corresponding page number(s) in your response.\n\
If the context does not contain the answer, say so.";

/// Concatenate the retrieved chunks, each followed by its page number.
pub fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| {
            format!(
                "content:\n{}\npage number: {}",
                result.chunk.text.trim(),
                result.chunk.page_number()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The user message for one turn: the query followed by its context block.
pub fn build_user_prompt(query: &str, results: &[SearchResult]) -> String {
    let context = if results.is_empty() {
        "(no relevant context was found)".to_string()
    } else {
        build_context(results)
    };
    format!("user query: {}\n\ncontext:\n{context}", query.trim())
}

#[cfg(test)]
mod tests {
    use pdfchat_rag::{Chunk, Document, DocumentMetadata};

    use super::*;

    fn result(text: &str, page: u32, score: f32) -> SearchResult {
        let document = Document::new(text, "content/nodejs_tutorial.pdf", page);
        SearchResult {
            chunk: Chunk {
                id: Chunk::stable_id(&document.id, 0),
                text: text.to_string(),
                embedding: Vec::new(),
                metadata: DocumentMetadata {
                    source_path: "content/nodejs_tutorial.pdf".to_string(),
                    page_number: page,
                },
                document_id: document.id,
                chunk_index: 0,
            },
            score,
        }
    }

    #[test]
    fn user_prompt_contains_query_text_and_pages() {
        let results = vec![
            result("Node.js is a JavaScript runtime.", 1, 0.9),
            result("npm ships with Node.js.", 7, 0.5),
        ];
        let prompt = build_user_prompt("What is Node.js?", &results);

        assert!(prompt.starts_with("user query: What is Node.js?"));
        assert!(prompt.contains("Node.js is a JavaScript runtime."));
        assert!(prompt.contains("page number: 1"));
        assert!(prompt.contains("page number: 7"));
        assert!(prompt.find("page number: 1") < prompt.find("page number: 7"));
    }

    #[test]
    fn context_blocks_are_separated_by_a_blank_line() {
        let results = vec![result("  first chunk ", 2, 0.9), result("second chunk", 3, 0.5)];
        assert_eq!(
            build_context(&results),
            "content:\nfirst chunk\npage number: 2\n\ncontent:\nsecond chunk\npage number: 3"
        );
    }

    #[test]
    fn empty_retrieval_is_stated_explicitly() {
        let prompt = build_user_prompt("anything", &[]);
        assert!(prompt.contains("no relevant context"));
    }

    #[test]
    fn system_prompt_asks_for_page_citations() {
        assert!(SYSTEM_PROMPT.contains("page number"));
        assert!(SYSTEM_PROMPT.contains("solely on the context"));
    }
}
