//! Interactive read-answer-print loop.

use std::future::Future;
use std::io::Write;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{info, warn};

use crate::conversation::{ChatSession, Conversation};
use crate::error::{CliError, Result};

/// Prompt shown before each query.
pub const PROMPT: &str = "Enter the prompt :- ";

/// Inputs that end the session, compared case-insensitively.
pub const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// What one read from the console produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// End of input (Ctrl-D or a closed pipe).
    Eof,
    /// Ctrl-C.
    Interrupted,
}

/// Source of user input lines.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// Remember an accepted line for in-session recall.
    fn add_history(&mut self, _line: &str) {}
}

/// [`LineReader`] backed by a rustyline editor.
pub struct RustylineReader {
    editor: DefaultEditor,
}

impl RustylineReader {
    pub fn new() -> Result<Self> {
        let editor =
            DefaultEditor::new().map_err(|e| CliError::Input(format!("failed to open console: {e}")))?;
        Ok(Self { editor })
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(e) => Err(CliError::Input(e.to_string())),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            warn!(error = %e, "failed to record console history");
        }
    }
}

/// A console line, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Blank,
    Query(&'a str),
}

pub fn parse_line(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Command::Blank
    } else if EXIT_COMMANDS.iter().any(|c| c.eq_ignore_ascii_case(trimmed)) {
        Command::Exit
    } else {
        Command::Query(trimmed)
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Command,
    EndOfInput,
    Interrupted,
    TurnLimit,
}

/// Resolves on the first Ctrl-C. Never resolves if the signal handler cannot
/// be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Run `work` unless `shutdown` resolves first, in which case `work` is
/// dropped and `None` is returned.
pub async fn unless_interrupted<F, S>(work: F, shutdown: S) -> Option<F::Output>
where
    F: Future,
    S: Future<Output = ()>,
{
    tokio::select! {
        output = work => Some(output),
        () = shutdown => None,
    }
}

/// Outcome of [`run_loop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub turns: usize,
    pub failed_turns: usize,
    pub reason: ExitReason,
}

/// Read queries until an exit condition and print one answer per query.
///
/// Failed turns are logged, reported on `out`, and skipped; the loop keeps
/// going. `max_turns` caps answered queries (successful or not). When
/// `shutdown` resolves while a turn is in flight the turn is abandoned,
/// history is left as it was, and the loop ends as interrupted.
pub async fn run_loop<R, W, S>(
    reader: &mut R,
    session: &ChatSession,
    conversation: &mut Conversation,
    out: &mut W,
    max_turns: Option<usize>,
    shutdown: S,
) -> Result<LoopSummary>
where
    R: LineReader + ?Sized,
    W: Write + ?Sized,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut turns = 0;
    let mut failed_turns = 0;

    let reason = loop {
        if max_turns.is_some_and(|max| turns + failed_turns >= max) {
            break ExitReason::TurnLimit;
        }

        let line = match reader.read_line(PROMPT)? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Eof => break ExitReason::EndOfInput,
            ReadOutcome::Interrupted => break ExitReason::Interrupted,
        };

        let query = match parse_line(&line) {
            Command::Exit => break ExitReason::Command,
            Command::Blank => continue,
            Command::Query(query) => query,
        };
        reader.add_history(query);

        let answered = tokio::select! {
            result = session.answer(conversation, query) => result,
            () = &mut shutdown => break ExitReason::Interrupted,
        };
        match answered {
            Ok(reply) => {
                turns += 1;
                writeln!(out, "🤖 : {reply}\n")?;
            }
            Err(e) => {
                failed_turns += 1;
                warn!(error = %e, "turn failed");
                writeln!(out, "⚠️  Could not answer that question: {e}\n")?;
            }
        }
        out.flush()?;
    };

    info!(turns, failed_turns, ?reason, "conversation ended");
    Ok(LoopSummary { turns, failed_turns, reason })
}
