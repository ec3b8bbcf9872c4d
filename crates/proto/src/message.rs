use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message authored by the local user.
    User,
    /// Message authored by the remote assistant.
    Assistant,
    /// Informational message from the client itself.
    System,
    /// Tool invocation announced by the assistant.
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            "tool" => Ok(Role::Tool),
            other => Err(crate::error::ProtoError::InvalidRole(other.to_string())),
        }
    }
}

/// Whether a message is still streaming in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Placeholder awaiting its final content.
    Pending,
    /// Final content received.
    #[default]
    Complete,
}

/// A single entry in the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Semantic role of this message.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Creation timestamp in UTC.
    pub timestamp: DateTime<Utc>,
    /// Pending/complete marker.
    pub status: MessageStatus,
    /// Tool name when `role` is `Tool`.
    pub tool_name: Option<String>,
    /// Tool arguments when `role` is `Tool`.
    #[serde(default)]
    pub tool_args: Vec<String>,
}

impl ChatMessage {
    /// Creates a completed message for the given role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            status: MessageStatus::Complete,
            tool_name: None,
            tool_args: Vec::new(),
        }
    }

    /// Creates a pending placeholder message.
    pub fn pending(role: Role, content: impl Into<String>) -> Self {
        Self {
            status: MessageStatus::Pending,
            ..Self::new(role, content)
        }
    }

    /// Creates a tool announcement with empty content.
    pub fn tool(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            tool_name: Some(name.into()),
            tool_args: args,
            ..Self::new(Role::Tool, "")
        }
    }

    /// Returns `true` while the message awaits final content.
    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }
}

/// How much of a tool invocation the transcript shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolDisplayMode {
    /// Tool messages are not rendered.
    Hidden,
    /// One dimmed line: tool name with inline arguments.
    #[default]
    Minimal,
    /// Tool name, with arguments on their own line.
    Full,
}

impl ToolDisplayMode {
    /// Cycles hidden → minimal → full → hidden.
    pub fn next(self) -> Self {
        match self {
            Self::Hidden => Self::Minimal,
            Self::Minimal => Self::Full,
            Self::Full => Self::Hidden,
        }
    }
}

/// Prefix/label flavour for a particular front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiVariant {
    #[default]
    Default,
    Git,
    Chat,
}
