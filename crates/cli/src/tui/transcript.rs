//! Ordered chat history with pending-message and tool-placement rules.

use proto::{ChatMessage, MessageStatus, Role};

/// Criteria for [`Transcript::filter`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub role: Option<Role>,
    pub status: Option<MessageStatus>,
    /// Drops messages whose content is blank.
    pub hide_empty: bool,
    pub hide_system: bool,
}

impl MessageFilter {
    fn matches(&self, message: &ChatMessage) -> bool {
        if self.role.is_some_and(|role| role != message.role) {
            return false;
        }
        if self.status.is_some_and(|status| status != message.status) {
            return false;
        }
        if self.hide_empty && message.content.trim().is_empty() {
            return false;
        }
        !(self.hide_system && message.role == Role::System)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn add(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Appends a placeholder to be completed by [`Self::update_last_pending`].
    pub fn add_pending(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage::pending(role, content));
    }

    /// Replaces the content and status of the most recent pending message.
    /// Returns `false` when nothing is pending.
    pub fn update_last_pending(&mut self, content: impl Into<String>, status: MessageStatus) -> bool {
        let index = self.messages.iter().rposition(ChatMessage::is_pending);
        self.resolve(index, content.into(), status)
    }

    /// Like [`Self::update_last_pending`], but for the oldest pending message,
    /// so replies resolve placeholders in the order they were queued.
    pub fn update_first_pending(&mut self, content: impl Into<String>, status: MessageStatus) -> bool {
        let index = self.oldest_pending();
        self.resolve(index, content.into(), status)
    }

    /// Index of the oldest pending message.
    pub fn oldest_pending(&self) -> Option<usize> {
        self.messages.iter().position(ChatMessage::is_pending)
    }

    fn resolve(&mut self, index: Option<usize>, content: String, status: MessageStatus) -> bool {
        match index.and_then(|i| self.messages.get_mut(i)) {
            Some(message) => {
                message.content = content;
                message.status = status;
                true
            }
            None => false,
        }
    }

    /// Inserts `message` at `index`, shifting later messages down; an
    /// out-of-range index appends.
    pub fn insert(&mut self, index: usize, message: ChatMessage) {
        let index = index.min(self.messages.len());
        self.messages.insert(index, message);
    }

    /// Inserts a tool message right before the last assistant message, or
    /// appends it when there is none.
    pub fn add_tool(&mut self, name: impl Into<String>, args: Vec<String>) {
        let message = ChatMessage::tool(name, args);
        match self.messages.iter().rposition(|m| m.role == Role::Assistant) {
            Some(index) => self.messages.insert(index, message),
            None => self.messages.push(message),
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Removes the message at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<ChatMessage> {
        (index < self.messages.len()).then(|| self.messages.remove(index))
    }

    pub fn filter(&self, criteria: &MessageFilter) -> Vec<&ChatMessage> {
        self.messages.iter().filter(|m| criteria.matches(m)).collect()
    }
}
