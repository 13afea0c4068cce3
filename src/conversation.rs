use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of the conversation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered message history for a single chat session.
///
/// Invariant: when present, message 0 is the system directive and survives
/// every trim.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: &str) -> Self {
        let mut conversation = Self::default();
        conversation.reset(system_prompt);
        conversation
    }

    /// Clears all history and re-seeds the system message.
    pub fn reset(&mut self, system_prompt: &str) {
        self.messages.clear();
        self.messages.push(Message::new(Role::System, system_prompt));
    }

    /// Appends without enforcing any limit; callers batch appends and trim
    /// once per turn.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Bounds history length. Keeps the leading system message (when there
    /// is one) plus the most recent messages; the oldest interior messages
    /// are discarded. Idempotent.
    pub fn trim(&mut self, max_messages: usize) {
        if self.messages.len() <= max_messages {
            return;
        }

        let has_system = matches!(self.messages.first(), Some(m) if m.role == Role::System);
        if has_system && max_messages > 0 {
            let keep_recent = max_messages - 1;
            let tail_start = self.messages.len() - keep_recent;
            let mut trimmed = Vec::with_capacity(max_messages);
            trimmed.push(self.messages[0].clone());
            trimmed.extend(self.messages.split_off(tail_start));
            self.messages = trimmed;
        } else {
            let tail_start = self.messages.len() - max_messages;
            self.messages.drain(..tail_start);
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
