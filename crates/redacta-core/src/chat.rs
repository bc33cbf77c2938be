//! Chat session orchestrator.
//!
//! Three independent append-only transcripts (general tutoring,
//! mind-map generation, summary generation), each driven by its own
//! little state machine:
//!
//! ```text
//! Idle -> Sending -> Streaming -> Idle
//! ```
//!
//! `Idle -> Sending` on submit (ignored if the input is blank or a send
//! is already in flight for that session). `Sending -> Streaming` once
//! the reply stream opens: an empty assistant placeholder is appended
//! and each text delta is folded into it in arrival order. Back to
//! `Idle` on completion or failure; on failure the placeholder is
//! replaced with a fixed apology text.
//!
//! The full transcript set is written through to the store after every
//! state change (message appended, fragment applied, session cleared),
//! so a crash mid-stream leaves at worst a partially-written assistant
//! message, never a lost user message.

use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::gateway::TutorGateway;
use crate::storage::StateStore;

/// Fallback assistant text when a reply fails mid-flight.
pub const FALLBACK_REPLY: &str = "Ops! Tive um problema de conexão. Pode repetir?";

/// One of the three fixed conversation threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    General,
    MindMap,
    Summary,
}

impl ChatMode {
    pub const ALL: [ChatMode; 3] = [ChatMode::General, ChatMode::MindMap, ChatMode::Summary];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::General => "general",
            ChatMode::MindMap => "mindmap",
            ChatMode::Summary => "summary",
        }
    }

    fn index(&self) -> usize {
        match self {
            ChatMode::General => 0,
            ChatMode::MindMap => 1,
            ChatMode::Summary => 2,
        }
    }
}

impl std::str::FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(ChatMode::General),
            "mindmap" => Ok(ChatMode::MindMap),
            "summary" => Ok(ChatMode::Summary),
            other => Err(format!("unknown chat mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Role name on the generateContent wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// The three persisted transcripts, one per mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatHistories {
    #[serde(default)]
    pub general: Vec<ChatMessage>,
    #[serde(default)]
    pub mindmap: Vec<ChatMessage>,
    #[serde(default)]
    pub summary: Vec<ChatMessage>,
}

impl ChatHistories {
    pub fn session(&self, mode: ChatMode) -> &[ChatMessage] {
        match mode {
            ChatMode::General => &self.general,
            ChatMode::MindMap => &self.mindmap,
            ChatMode::Summary => &self.summary,
        }
    }

    fn session_mut(&mut self, mode: ChatMode) -> &mut Vec<ChatMessage> {
        match mode {
            ChatMode::General => &mut self.general,
            ChatMode::MindMap => &mut self.mindmap,
            ChatMode::Summary => &mut self.summary,
        }
    }
}

/// Per-session send state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
    Streaming,
}

/// Outcome of a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or a send already in flight; nothing changed.
    Ignored,
    /// Reply streamed to completion.
    Completed,
    /// Request or stream failed; the fallback text is in the transcript.
    Failed,
}

/// Owns the transcripts and drives streaming replies into them.
pub struct ChatOrchestrator {
    histories: ChatHistories,
    states: [SessionState; 3],
    store: StateStore,
}

impl ChatOrchestrator {
    /// Load persisted transcripts, starting empty when none exist or
    /// the stored record is unreadable.
    pub fn load(store: StateStore) -> Self {
        let histories = match store.load_chats() {
            Ok(Some(histories)) => histories,
            Ok(None) => ChatHistories::default(),
            Err(e) => {
                tracing::warn!(error = %e, "chat transcripts unreadable, starting empty");
                ChatHistories::default()
            }
        };
        Self {
            histories,
            states: [SessionState::Idle; 3],
            store,
        }
    }

    pub fn messages(&self, mode: ChatMode) -> &[ChatMessage] {
        self.histories.session(mode)
    }

    pub fn state(&self, mode: ChatMode) -> SessionState {
        self.states[mode.index()]
    }

    /// Submit one user message and fold the streamed reply into the
    /// transcript. Returns [`SendOutcome::Ignored`] without touching any
    /// state when the input is blank or this session already has a send
    /// in flight.
    pub async fn send(
        &mut self,
        gateway: &dyn TutorGateway,
        mode: ChatMode,
        text: &str,
    ) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() || self.state(mode) != SessionState::Idle {
            return SendOutcome::Ignored;
        }

        self.states[mode.index()] = SessionState::Sending;
        self.histories.session_mut(mode).push(ChatMessage {
            role: ChatRole::User,
            text: text.to_string(),
        });
        self.persist();

        // Transcript before this turn, excluding the message just added.
        let history = self.histories.session(mode);
        let prior = history[..history.len() - 1].to_vec();

        let mut stream = match gateway.stream_chat(mode, &prior, text).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(mode = mode.as_str(), error = %e, "chat request failed");
                self.histories.session_mut(mode).push(ChatMessage {
                    role: ChatRole::Assistant,
                    text: FALLBACK_REPLY.to_string(),
                });
                self.persist();
                self.states[mode.index()] = SessionState::Idle;
                return SendOutcome::Failed;
            }
        };

        self.states[mode.index()] = SessionState::Streaming;
        self.histories.session_mut(mode).push(ChatMessage {
            role: ChatRole::Assistant,
            text: String::new(),
        });
        self.persist();

        while let Some(item) = stream.next().await {
            match item {
                Ok(delta) => {
                    if let Some(last) = self.histories.session_mut(mode).last_mut() {
                        last.text.push_str(&delta);
                    }
                    self.persist();
                }
                Err(e) => {
                    tracing::warn!(mode = mode.as_str(), error = %e, "chat stream failed");
                    if let Some(last) = self.histories.session_mut(mode).last_mut() {
                        last.text = FALLBACK_REPLY.to_string();
                    }
                    self.persist();
                    self.states[mode.index()] = SessionState::Idle;
                    return SendOutcome::Failed;
                }
            }
        }

        self.states[mode.index()] = SessionState::Idle;
        SendOutcome::Completed
    }

    /// Empty one session's transcript. The other two are untouched.
    pub fn clear(&mut self, mode: ChatMode) {
        self.histories.session_mut(mode).clear();
        self.persist();
    }

    /// Write-through, best effort: a failed write is logged and the
    /// in-memory state stays authoritative.
    fn persist(&self) {
        if let Err(e) = self.store.save_chats(&self.histories) {
            tracing::warn!(error = %e, "chat transcript write failed");
        }
    }
}
