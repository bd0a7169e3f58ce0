//! Chat session lifecycle and transcript
//!
//! [`ChatSession`] is an explicit two-state machine over a shared
//! conversation handle:
//!
//! ```text
//! NoSession --send_turn (open ok)--> Active --reset--> NoSession
//! ```
//!
//! A send takes a clone of the current handle and then releases the state, so
//! a `reset` during the send does not cancel it: the send finishes against
//! the old conversation. The reply comes back flagged `stale` so the caller
//! can tell it belongs to a conversation that has since been discarded.

use crate::ai::{ChatConversation, ChatService};
use crate::{prompts, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const GREETING: &str = "Pixel OS chat terminal initialized. Ready for input.";
pub const RESET_GREETING: &str = "Memory cleared. New session started.";
pub const SEND_FAILED: &str = "Error: connection lost or API limit reached.";

enum SessionState {
    NoSession,
    Active {
        conversation: Arc<dyn ChatConversation>,
        generation: u64,
    },
}

/// Lifecycle state, as reported by [`ChatSession::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    NoSession,
    Active,
}

/// Assistant reply to one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    /// The session this turn ran on was reset before the reply arrived.
    pub stale: bool,
}

pub struct ChatSession {
    backend: Arc<dyn ChatService>,
    system_instruction: String,
    state: Mutex<SessionState>,
    /// Bumped on every reset; identifies which session a send started on.
    resets: Mutex<u64>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatService>) -> Self {
        Self::with_system_instruction(backend, prompts::render(prompts::CHAT_SYSTEM, &[]))
    }

    pub fn with_system_instruction(
        backend: Arc<dyn ChatService>,
        system_instruction: String,
    ) -> Self {
        Self {
            backend,
            system_instruction,
            state: Mutex::new(SessionState::NoSession),
            resets: Mutex::new(0),
        }
    }

    pub async fn state(&self) -> ChatState {
        match *self.state.lock().await {
            SessionState::NoSession => ChatState::NoSession,
            SessionState::Active { .. } => ChatState::Active,
        }
    }

    /// Current handle, opening a session first when there is none. The state
    /// moves to `Active` only once the backend has created the session.
    async fn acquire(&self) -> Result<(Arc<dyn ChatConversation>, u64)> {
        let mut state = self.state.lock().await;
        if let SessionState::Active {
            conversation,
            generation,
        } = &*state
        {
            return Ok((Arc::clone(conversation), *generation));
        }

        let generation = *self.resets.lock().await;
        info!("Opening new chat session");
        let conversation = self.backend.open_session(&self.system_instruction).await?;
        *state = SessionState::Active {
            conversation: Arc::clone(&conversation),
            generation,
        };
        Ok((conversation, generation))
    }

    /// Send one user turn, creating the session on first use.
    ///
    /// A failed send leaves the state as it was; the handle stays usable for
    /// the next attempt.
    pub async fn send_turn(&self, message: &str) -> Result<ChatReply> {
        let (conversation, generation) = self.acquire().await?;
        debug!("Sending chat turn ({} chars)", message.len());

        let text = conversation.send_message(message).await?;

        let stale = *self.resets.lock().await != generation;
        if stale {
            warn!("Chat reply arrived after the session was reset");
        }
        Ok(ChatReply { text, stale })
    }

    /// Drop the current handle. In-flight sends are not cancelled.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        *self.resets.lock().await += 1;
        *state = SessionState::NoSession;
        info!("Chat session reset");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// Ordered chat log. Append-only except [`ChatTranscript::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::seeded(GREETING)
    }

    fn seeded(greeting: &str) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                text: greeting.to_string(),
            }],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.into(),
        });
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            text: text.into(),
        });
    }

    /// Record the outcome of a turn. Failures become an assistant error line.
    pub fn record_outcome(&mut self, outcome: &Result<ChatReply>) {
        match outcome {
            Ok(reply) => self.push_assistant(reply.text.clone()),
            Err(_) => self.push_assistant(SEND_FAILED),
        }
    }

    /// Clear and reseed with a single greeting.
    pub fn reset(&mut self) {
        *self = Self::seeded(RESET_GREETING);
    }
}
