//! Terminal-agnostic keyboard event shape.

/// Named keys and modifiers that accompany a [`KeyInput`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFlags {
    pub return_key: bool,
    pub escape: bool,
    pub backspace: bool,
    pub delete: bool,
    pub left_arrow: bool,
    pub right_arrow: bool,
    pub up_arrow: bool,
    pub down_arrow: bool,
    pub tab: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyFlags {
    /// Flags with only `return_key` set.
    pub fn enter() -> Self {
        Self {
            return_key: true,
            ..Self::default()
        }
    }

    /// Flags with only `escape` set.
    pub fn escape() -> Self {
        Self {
            escape: true,
            ..Self::default()
        }
    }

    /// Flags with only `backspace` set.
    pub fn backspace() -> Self {
        Self {
            backspace: true,
            ..Self::default()
        }
    }

    /// Flags with only `delete` set.
    pub fn delete() -> Self {
        Self {
            delete: true,
            ..Self::default()
        }
    }

    /// Flags with only `left_arrow` set.
    pub fn left() -> Self {
        Self {
            left_arrow: true,
            ..Self::default()
        }
    }

    /// Flags with only `right_arrow` set.
    pub fn right() -> Self {
        Self {
            right_arrow: true,
            ..Self::default()
        }
    }

    /// Flags with only `up_arrow` set.
    pub fn up() -> Self {
        Self {
            up_arrow: true,
            ..Self::default()
        }
    }

    /// Flags with only `down_arrow` set.
    pub fn down() -> Self {
        Self {
            down_arrow: true,
            ..Self::default()
        }
    }

    /// Returns `true` when ctrl or meta is held.
    pub fn has_control_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// One keyboard event: the produced text (possibly empty) plus key flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyInput {
    /// Text produced by the key press; empty for named keys.
    pub input: String,
    /// Named keys and modifiers.
    pub key: KeyFlags,
}

impl KeyInput {
    /// A single printable character with no modifiers.
    pub fn char(c: char) -> Self {
        Self {
            input: c.to_string(),
            key: KeyFlags::default(),
        }
    }

    /// A chunk of text, as delivered by a paste.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            input: text.into(),
            key: KeyFlags::default(),
        }
    }

    /// A named key with no text.
    pub fn key(key: KeyFlags) -> Self {
        Self {
            input: String::new(),
            key,
        }
    }

    /// Returns the same event with ctrl held.
    pub fn with_ctrl(mut self) -> Self {
        self.key.ctrl = true;
        self
    }

    /// Returns the same event with meta held.
    pub fn with_meta(mut self) -> Self {
        self.key.meta = true;
        self
    }

    /// Text input that should be inserted verbatim into a buffer.
    pub fn printable(&self) -> Option<&str> {
        if self.input.is_empty() || self.key.has_control_modifier() {
            None
        } else {
            Some(&self.input)
        }
    }
}
