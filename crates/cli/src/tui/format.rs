//! Message prefixes, colours, and wrapping for the transcript.

use proto::{Role, UiVariant};
use ratatui::style::Color;
use unicode_width::UnicodeWidthStr;

use super::theme::THEME;

/// Line prefixes per role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixes {
    pub user: &'static str,
    pub assistant: &'static str,
    pub system: &'static str,
    pub tool: &'static str,
}

impl Prefixes {
    /// Prefixes for `variant`.
    pub fn for_variant(variant: UiVariant) -> Self {
        let base = Self {
            user: "👤 You: ",
            assistant: "🤖 Assistant: ",
            system: "ℹ️  system: ",
            tool: "🔧 ",
        };
        match variant {
            UiVariant::Default => base,
            UiVariant::Git => Self {
                system: "ℹ️  git: ",
                ..base
            },
            UiVariant::Chat => Self {
                assistant: "🤖 Chat: ",
                ..base
            },
        }
    }

    pub fn for_role(&self, role: Role) -> &'static str {
        match role {
            Role::User => self.user,
            Role::Assistant => self.assistant,
            Role::System => self.system,
            Role::Tool => self.tool,
        }
    }
}

/// Content colour for `role`.
pub fn role_color(role: Role) -> Color {
    match role {
        Role::User => THEME.user_text,
        Role::Assistant => THEME.assistant_text,
        Role::System => THEME.system_text,
        Role::Tool => THEME.tool_text,
    }
}

/// Word-wraps every line of `content` wider than `max_width` terminal cells.
///
/// Lines break on single spaces only; a word longer than the width keeps a
/// line to itself.
pub fn wrap_content(content: &str, max_width: usize) -> String {
    if max_width == 0 {
        return content.to_string();
    }
    content
        .split('\n')
        .map(|line| {
            if line.width() <= max_width {
                return line.to_string();
            }
            let mut wrapped: Vec<String> = Vec::new();
            let mut current = String::new();
            for word in line.split(' ') {
                let joined = current.width() + 1 + word.width();
                if joined <= max_width {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                } else {
                    if !current.is_empty() {
                        wrapped.push(std::mem::take(&mut current));
                    }
                    current.push_str(word);
                }
            }
            if !current.is_empty() {
                wrapped.push(current);
            }
            wrapped.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses `[tool] name: arg arg` out of free text.
pub fn extract_tool_info(content: &str) -> Option<(String, Vec<String>)> {
    let start = content.find("[tool]")?;
    let rest = content[start + "[tool]".len()..].trim_start();
    let name_len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let (name, tail) = rest.split_at(name_len);
    let args = tail
        .strip_prefix(':')
        .map(|args| args.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    Some((name.to_string(), args))
}
