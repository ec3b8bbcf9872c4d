//! Decoding of inbound channel payloads into chat content.

use serde_json::Value;
use tracing::warn;

/// Raw frame delivered by a [`ChannelStream`](crate::ChannelStream).
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelPayload {
    Text(String),
    Binary(Vec<u8>),
    Json(Value),
}

/// Parses a payload into JSON. Malformed frames are logged and dropped.
pub fn parse_channel_payload(payload: &ChannelPayload) -> Option<Value> {
    let parsed = match payload {
        ChannelPayload::Text(text) => serde_json::from_str(text),
        ChannelPayload::Binary(bytes) => serde_json::from_slice(bytes),
        ChannelPayload::Json(value) => return Some(value.clone()),
    };
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to parse channel payload: {e}");
            None
        }
    }
}

/// A `tool_use` block found in message content.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolBlock {
    pub name: String,
    pub input: Value,
}

impl ToolBlock {
    /// Flattens the tool input into display arguments (`key=value` for objects).
    pub fn args(&self) -> Vec<String> {
        match &self.input {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| match value {
                    Value::String(s) => format!("{key}={s}"),
                    other => format!("{key}={other}"),
                })
                .collect(),
            Value::Null => Vec::new(),
            other => vec![other.to_string()],
        }
    }
}

/// Chat-relevant parts of a decoded payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedContent {
    /// Concatenated text, trimmed.
    pub content: String,
    pub is_user_message: bool,
    pub tool_blocks: Vec<ToolBlock>,
}

/// Reads `message.entry.{Message|Completion}.content`.
///
/// Content may be a plain string or an array of blocks; `text` blocks are
/// concatenated and `tool_use` blocks are collected separately.
pub fn extract_message_content(parsed: &Value) -> ExtractedContent {
    let Some(entry) = parsed.pointer("/message/entry") else {
        return ExtractedContent::default();
    };

    let is_user_message = entry.pointer("/Message/role").and_then(Value::as_str) == Some("user");
    let content = ["/Message/content", "/Completion/content"]
        .iter()
        .filter_map(|path| entry.pointer(path))
        .find(|value| is_present(value));

    let mut text = String::new();
    let mut tool_blocks = Vec::new();
    match content {
        Some(Value::String(s)) => text.push_str(s),
        Some(Value::Array(blocks)) => {
            for block in blocks {
                match block.get("type").and_then(Value::as_str) {
                    Some("text") => {
                        if let Some(t) = block.get("text").and_then(Value::as_str) {
                            text.push_str(t);
                        }
                    }
                    Some("tool_use") => tool_blocks.push(ToolBlock {
                        name: block
                            .get("name")
                            .and_then(Value::as_str)
                            .unwrap_or("unknown")
                            .to_string(),
                        input: block
                            .get("input")
                            .cloned()
                            .unwrap_or_else(|| Value::Object(Default::default())),
                    }),
                    _ => {}
                }
            }
        }
        _ => {}
    }

    ExtractedContent {
        content: text.trim().to_string(),
        is_user_message,
        tool_blocks,
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
