use crate::error::{PromptDeckError, Result};
use crate::message::{Role, Turn};

/// One rendered conversation entry. Ids are assigned at append time and
/// only ever increase, so identical contents never collide as view keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelMessage {
    pub id: u64,
    pub role: Role,
    pub content: String,
}

/// Transient state of one conversation: an append-only message list plus
/// a pending flag for the single in-flight request. Idle → Submitting →
/// Idle; there is no retry or cancel state, and nothing is persisted.
#[derive(Debug)]
pub struct ChatPanel {
    messages: Vec<PanelMessage>,
    next_id: u64,
    pending: bool,
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatPanel {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            pending: false,
        }
    }

    /// Starts a submission: validates the prompt, raises the pending flag,
    /// and returns the outbound turn list — the full prior history plus the
    /// new user turn. Nothing is appended to the visible list until the
    /// round trip completes.
    pub fn begin_submit(&mut self, prompt: &str) -> Result<Vec<Turn>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(PromptDeckError::Validation("prompt is empty".to_string()));
        }
        if self.pending {
            return Err(PromptDeckError::Runtime(
                "a request is already in flight".to_string(),
            ));
        }

        self.pending = true;
        let mut turns: Vec<Turn> = self
            .messages
            .iter()
            .map(|message| Turn {
                role: message.role,
                content: message.content.clone(),
            })
            .collect();
        turns.push(Turn::user(prompt));
        Ok(turns)
    }

    /// Appends the {user, prompt} / {assistant, reply} pair together and
    /// clears pending. Resubmitting an identical prompt appends a fresh
    /// independent pair; nothing is deduplicated.
    pub fn complete(&mut self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.push(Role::User, prompt.into());
        self.push(Role::Assistant, reply.into());
        self.pending = false;
    }

    /// Clears pending after a failed round trip; the list is unchanged.
    pub fn fail(&mut self) {
        self.pending = false;
    }

    fn push(&mut self, role: Role, content: String) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(PanelMessage { id, role, content });
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Lazy view of the conversation, most recent entry first.
    pub fn newest_first(&self) -> impl Iterator<Item = &PanelMessage> {
        self.messages.iter().rev()
    }

    pub fn messages(&self) -> &[PanelMessage] {
        &self.messages
    }
}
