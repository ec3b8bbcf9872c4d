use serde::{Deserialize, Serialize};

/// Modal editing state of the multi-line editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Keys edit and navigate the buffer.
    #[default]
    Insert,
    /// Navigation keys are inert; plain return submits.
    Command,
}

impl EditMode {
    /// Upper-case label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
        }
    }
}

/// Requested presentation policy for the smart input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Always the single-line presentation.
    Simple,
    /// Always the modal multi-line presentation.
    Multiline,
    /// Chosen from the content shape.
    #[default]
    Auto,
}

impl std::str::FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "multiline" | "multi" => Ok(Self::Multiline),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown input mode '{other}'")),
        }
    }
}

/// Presentation actually rendering the shared buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    #[default]
    Simple,
    Multiline,
}

/// UI region that currently owns keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusTarget {
    #[default]
    Input,
    Help,
    Messages,
    Global,
}

/// Read-only snapshot of the input subsystem for presentational code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    /// Region holding focus.
    pub focus_target: FocusTarget,
    /// Current buffer content.
    pub content: String,
    /// Cursor offset in characters.
    pub cursor: usize,
    /// Current modal state.
    pub mode: EditMode,
}
