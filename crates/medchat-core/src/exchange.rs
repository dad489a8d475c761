//! One question, one answer.
//!
//! The controller owns the chat history, the input buffer and the pending
//! count. Requests run on their own tokio tasks and report back over a
//! channel; the owner of the controller (the UI loop) applies each result
//! with [`ExchangeController::settle`], so history is only ever touched from
//! one task.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::backend::{BackendError, ChatBackend};
use crate::history::ChatHistory;
use crate::input::InputBuffer;
use crate::state::ChatEntry;

pub const DEFAULT_GREETING: &str =
    "Hello! I am your medical assistant. Ask me anything from the Medical Book.";

/// Identifies one submission
pub type Ticket = u64;

/// Result of one backend call, waiting to be applied to the history
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Result<String, BackendError>,
}

pub struct ExchangeController {
    backend: Arc<dyn ChatBackend>,
    history: ChatHistory,
    input: InputBuffer,
    in_flight: usize,
    next_ticket: Ticket,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl ExchangeController {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            history: ChatHistory::new(),
            input: InputBuffer::new(),
            in_flight: 0,
            next_ticket: 1,
            tx,
            rx,
        }
    }

    /// Seed the history with an opening bot line. Only meaningful before
    /// the first submission.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        if !greeting.trim().is_empty() {
            self.history.append(ChatEntry::bot(greeting));
        }
        self
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputBuffer {
        &mut self.input
    }

    /// True while at least one submission is waiting on the backend
    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Append `raw` as a user entry and send it to the backend.
    ///
    /// Blank input is ignored and returns `None`. Nothing stops a second
    /// submission while an earlier one is still in flight.
    pub fn submit(&mut self, raw: &str) -> Option<Ticket> {
        if raw.trim().is_empty() {
            return None;
        }

        self.history.append(ChatEntry::user(raw));
        self.input.clear();
        self.in_flight += 1;

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        info!(ticket, in_flight = self.in_flight, "dispatching question");

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let question = raw.to_string();
        tokio::spawn(async move {
            // A panicking backend still owes the history exactly one answer
            let call = tokio::spawn(async move { backend.ask(&question).await });
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(e) => Err(BackendError::TaskFailed(e.to_string())),
            };
            // The receiver lives as long as the controller
            let _ = tx.send(Completion { ticket, outcome });
        });

        Some(ticket)
    }

    /// Submit whatever is in the input buffer
    pub fn submit_input(&mut self) -> Option<Ticket> {
        if self.input.is_blank() {
            return None;
        }
        let raw = self.input.take();
        self.submit(&raw)
    }

    /// Wait for the next backend call to finish. Returns `None` straight
    /// away when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        self.rx.recv().await
    }

    /// Apply a finished call: exactly one bot entry per completion
    pub fn settle(&mut self, completion: Completion) {
        let Completion { ticket, outcome } = completion;

        let entry = match outcome {
            Ok(answer) => {
                info!(ticket, "answer received");
                ChatEntry::bot(answer)
            }
            Err(err) => {
                warn!(ticket, error = %err, "exchange failed");
                ChatEntry::bot(err.user_message())
            }
        };

        self.in_flight = self.in_flight.saturating_sub(1);
        self.history.append(entry);
    }

    /// Settle every completion that has already arrived, without waiting.
    /// Returns how many were applied.
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.settle(completion);
            applied += 1;
        }
        applied
    }

    /// Submit and wait for that submission's outcome. Other completions that
    /// arrive meanwhile are settled too. The history gets its bot entry
    /// either way; the returned result says whether the backend answered.
    pub async fn ask(&mut self, raw: &str) -> Option<Result<String, BackendError>> {
        let ticket = self.submit(raw)?;

        while let Some(completion) = self.next_completion().await {
            if completion.ticket == ticket {
                let outcome = completion.outcome.clone();
                self.settle(completion);
                return Some(outcome);
            }
            self.settle(completion);
        }
        None
    }
}
