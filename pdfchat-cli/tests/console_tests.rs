//! End-to-end conversation tests with an in-memory store and a scripted model.

use std::collections::VecDeque;
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pdfchat_cli::console::{ExitReason, LineReader, ReadOutcome, run_loop};
use pdfchat_cli::prompt::SYSTEM_PROMPT;
use pdfchat_cli::{ChatSession, CliError, Conversation};
use pdfchat_model::{ChatMessage, ChatModel, MockChatModel, Role};
use pdfchat_rag::{
    Document, EmbeddingProvider, FixedSizeChunker, InMemoryVectorStore, RagConfig, RagPipeline,
    Retriever,
};

const DIMS: usize = 256;
const COLLECTION: &str = "pdf-chunk-collection";

/// Bag-of-words embeddings: lowercase alphanumeric tokens hashed into buckets.
struct BagOfWords;

#[async_trait]
impl EmbeddingProvider for BagOfWords {
    async fn embed(&self, text: &str) -> pdfchat_rag::Result<Vec<f32>> {
        let mut v = vec![0.0f32; DIMS];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let hash = word
                .to_lowercase()
                .bytes()
                .fold(0xcbf2_9ce4_8422_2325u64, |h, b| (h ^ b as u64).wrapping_mul(0x100_0000_01b3));
            v[(hash % DIMS as u64) as usize] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        DIMS
    }
}

/// Never answers, standing in for a slow provider.
struct StalledModel;

#[async_trait]
impl ChatModel for StalledModel {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn complete(&self, _messages: &[ChatMessage]) -> pdfchat_model::Result<String> {
        pending().await
    }
}

/// Replays fixed lines, then reports end of input.
struct ScriptedReader {
    lines: VecDeque<String>,
    history: Vec<String>,
}

impl ScriptedReader {
    fn new(lines: &[&str]) -> Self {
        Self { lines: lines.iter().map(|l| l.to_string()).collect(), history: Vec::new() }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> pdfchat_cli::Result<ReadOutcome> {
        Ok(self.lines.pop_front().map(ReadOutcome::Line).unwrap_or(ReadOutcome::Eof))
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}

fn tutorial_pages() -> Vec<Document> {
    let source = "content/nodejs_tutorial.pdf";
    vec![
        Document::new(
            "What is Node.js? Node.js is an open source JavaScript runtime built on Chrome's V8 engine.",
            source,
            1,
        ),
        Document::new("The event loop handles asynchronous callbacks without blocking threads.", source, 2),
        Document::new("Use npm install to add packages listed in package.json.", source, 3),
        Document::new("Streams let you read large files piece by piece.", source, 4),
    ]
}

async fn session_with(model: Arc<MockChatModel>) -> ChatSession {
    let config = RagConfig::default();
    let pipeline = RagPipeline::builder()
        .chunker(Arc::new(FixedSizeChunker::from_config(&config).unwrap()))
        .config(config)
        .embedding_provider(Arc::new(BagOfWords))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap();
    pipeline.create_collection(COLLECTION).await.unwrap();
    pipeline.ingest_batch(COLLECTION, &tutorial_pages()).await.unwrap();

    ChatSession::new(Retriever::new(Arc::new(pipeline), COLLECTION), model)
}

#[tokio::test]
async fn node_question_retrieves_page_one_into_the_prompt() {
    let model = Arc::new(MockChatModel::new("mock").with_reply("Node.js is a JavaScript runtime (page 1)."));
    let session = session_with(model.clone()).await;

    let results = session.retriever().retrieve("What is Node.js?").await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].chunk.page_number(), 1);

    let mut conversation = Conversation::new(SYSTEM_PROMPT);
    let reply = session.answer(&mut conversation, "What is Node.js?").await.unwrap();
    assert_eq!(reply, "Node.js is a JavaScript runtime (page 1).");

    let request = &model.requests()[0];
    assert_eq!(request.len(), 2);
    assert_eq!(request[0].content, SYSTEM_PROMPT);
    let prompt = &request[1].content;
    assert!(prompt.contains("What is Node.js?"));
    assert!(prompt.contains("open source JavaScript runtime"));
    assert!(prompt.contains("page number: 1"));
}

#[tokio::test]
async fn history_grows_by_two_per_turn() {
    let model = Arc::new(MockChatModel::new("mock"));
    let session = session_with(model.clone()).await;
    let mut conversation = Conversation::new(SYSTEM_PROMPT);
    let mut reader = ScriptedReader::new(&["What is Node.js?", "What is npm?", "What are streams?"]);
    let mut out = Vec::new();

    let summary =
        run_loop(&mut reader, &session, &mut conversation, &mut out, None, pending()).await.unwrap();

    assert_eq!(summary.turns, 3);
    assert_eq!(summary.reason, ExitReason::EndOfInput);
    assert_eq!(conversation.messages().len(), 1 + 2 * 3);
    let roles: Vec<Role> = conversation.messages().iter().map(|m| m.role).collect();
    let mut expected = vec![Role::System];
    for _ in 0..3 {
        expected.extend([Role::User, Role::Assistant]);
    }
    assert_eq!(roles, expected);
    assert!(conversation.messages()[3].content.contains("What is npm?"));

    // Each request carries everything said before it.
    let requests = model.requests();
    assert_eq!(requests.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 4, 6]);
    assert_eq!(reader.history, vec!["What is Node.js?", "What is npm?", "What are streams?"]);

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed.matches("🤖 : echo: ").count(), 3);
}

#[tokio::test]
async fn failed_turn_leaves_history_untouched_and_loop_continues() {
    let model = Arc::new(
        MockChatModel::new("mock").with_reply("first").with_failure("rate limited").with_reply("third"),
    );
    let session = session_with(model.clone()).await;
    let mut conversation = Conversation::new(SYSTEM_PROMPT);
    let mut reader = ScriptedReader::new(&["one", "two", "three", "exit"]);
    let mut out = Vec::new();

    let summary =
        run_loop(&mut reader, &session, &mut conversation, &mut out, None, pending()).await.unwrap();

    assert_eq!(summary.turns, 2);
    assert_eq!(summary.failed_turns, 1);
    assert_eq!(summary.reason, ExitReason::Command);
    assert_eq!(conversation.messages().len(), 5);
    assert_eq!(conversation.messages()[2].content, "first");
    assert_eq!(conversation.messages()[4].content, "third");

    // The third request does not mention the failed question.
    let third = &model.requests()[2];
    assert_eq!(third.len(), 4);
    assert!(third.iter().all(|m| !m.content.contains("user query: two")));

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("rate limited"));
}

#[tokio::test]
async fn exit_sentinel_stops_before_any_model_call() {
    let model = Arc::new(MockChatModel::new("mock"));
    let session = session_with(model.clone()).await;
    let mut conversation = Conversation::new(SYSTEM_PROMPT);
    let mut reader = ScriptedReader::new(&["", "   ", "QUIT", "never asked"]);
    let mut out = Vec::new();

    let summary =
        run_loop(&mut reader, &session, &mut conversation, &mut out, None, pending()).await.unwrap();

    assert_eq!(summary.reason, ExitReason::Command);
    assert_eq!(summary.turns, 0);
    assert_eq!(model.call_count(), 0);
    assert_eq!(conversation.messages().len(), 1);
    assert_eq!(reader.lines.len(), 1);
}

#[tokio::test]
async fn turn_cap_ends_the_loop() {
    let model = Arc::new(MockChatModel::new("mock"));
    let session = session_with(model.clone()).await;
    let mut conversation = Conversation::new(SYSTEM_PROMPT);
    let mut reader = ScriptedReader::new(&["a", "b", "c"]);
    let mut out = Vec::new();

    let summary = run_loop(&mut reader, &session, &mut conversation, &mut out, Some(2), pending())
        .await
        .unwrap();

    assert_eq!(summary.reason, ExitReason::TurnLimit);
    assert_eq!(summary.turns, 2);
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn history_window_limits_what_is_sent() {
    let model = Arc::new(MockChatModel::new("mock"));
    let session = session_with(model.clone()).await;
    let mut conversation = Conversation::new(SYSTEM_PROMPT).with_max_history_turns(Some(1));

    for query in ["What is Node.js?", "What is npm?", "What are streams?"] {
        session.answer(&mut conversation, query).await.unwrap();
    }

    assert_eq!(conversation.messages().len(), 7);
    let last = model.requests().pop().unwrap();
    assert_eq!(last.len(), 4);
    assert!(last[1].content.contains("What is npm?"));
}

#[tokio::test]
async fn retrieval_failure_is_reported_without_touching_history() {
    let model = Arc::new(MockChatModel::new("mock"));
    let session = session_with(model.clone()).await;
    let empty = RagPipeline::builder()
        .config(RagConfig::default())
        .chunker(Arc::new(FixedSizeChunker::new(1000, 400).unwrap()))
        .embedding_provider(Arc::new(BagOfWords))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap();
    let missing = ChatSession::new(Retriever::new(Arc::new(empty), "missing"), model.clone());
    let mut conversation = Conversation::new(SYSTEM_PROMPT);

    let err = missing.answer(&mut conversation, "What is Node.js?").await.unwrap_err();
    assert!(matches!(err, CliError::Rag(_)));
    assert_eq!(conversation.messages().len(), 1);
    assert_eq!(model.call_count(), 0);

    // The healthy session still answers.
    session.answer(&mut conversation, "What is Node.js?").await.unwrap();
    assert_eq!(conversation.turns(), 1);
}

#[tokio::test]
async fn interrupt_during_a_turn_ends_the_loop_without_committing() {
    let scripted = session_with(Arc::new(MockChatModel::new("mock"))).await;
    let session = ChatSession::new(scripted.retriever().clone(), Arc::new(StalledModel));
    let mut conversation = Conversation::new(SYSTEM_PROMPT);
    let mut reader = ScriptedReader::new(&["What is Node.js?", "never asked"]);
    let mut out = Vec::new();

    let shutdown = tokio::time::sleep(Duration::from_millis(50));
    let summary =
        run_loop(&mut reader, &session, &mut conversation, &mut out, None, shutdown).await.unwrap();

    assert_eq!(summary.reason, ExitReason::Interrupted);
    assert_eq!(summary.turns, 0);
    assert_eq!(summary.failed_turns, 0);
    assert_eq!(conversation.messages().len(), 1);
    assert_eq!(reader.lines.len(), 1);
}
