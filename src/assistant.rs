//! Assistant session
//!
//! Append-only conversation log over the assistant endpoint. One outstanding
//! request at a time; failures degrade to a fixed in-band reply instead of an
//! error state, so this channel never blocks the user.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::client::AnalysisApi;
use crate::models::{AssistantTurn, TurnRole};

/// Appended in place of a reply when the assistant request fails
pub const ASSISTANT_ERROR_REPLY: &str = "Error fetching assistant response.";

/// Conversation log plus the single-outstanding-request guard
pub struct AssistantSession {
    api: Arc<dyn AnalysisApi>,
    turns: RwLock<Vec<AssistantTurn>>,
    pending: AtomicBool,
}

impl AssistantSession {
    pub fn new(api: Arc<dyn AnalysisApi>) -> Self {
        Self {
            api,
            turns: RwLock::new(Vec::new()),
            pending: AtomicBool::new(false),
        }
    }

    /// Ask the assistant a question.
    ///
    /// Returns `false` without touching the log when the trimmed question is
    /// empty or a reply is already pending. Otherwise the user turn is
    /// appended immediately, and an assistant turn follows once the request
    /// resolves (the fixed fallback text on any failure).
    pub async fn ask(&self, question: &str) -> bool {
        let question = question.trim();
        if question.is_empty() {
            return false;
        }

        // Single outstanding turn: swap wins the slot or bails out
        if self.pending.swap(true, Ordering::SeqCst) {
            return false;
        }

        self.append(TurnRole::User, question.to_string());

        let reply = match self.api.fetch_assistant_reply(question).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("Assistant query failed: {}", err);
                ASSISTANT_ERROR_REPLY.to_string()
            }
        };

        self.append(TurnRole::Assistant, reply);
        self.pending.store(false, Ordering::SeqCst);
        true
    }

    fn append(&self, role: TurnRole, content: String) {
        if let Ok(mut turns) = self.turns.write() {
            turns.push(AssistantTurn { role, content });
        }
    }

    /// Whether a reply is currently outstanding
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Chronological copy of the conversation
    pub fn turns(&self) -> Vec<AssistantTurn> {
        self.turns
            .read()
            .map(|turns| turns.clone())
            .unwrap_or_default()
    }

    pub fn turn_count(&self) -> usize {
        self.turns.read().map(|turns| turns.len()).unwrap_or(0)
    }
}
