//! Modifier-key shortcuts bound outside the text buffer.

use proto::KeyInput;

/// One key binding mapped to an application action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut<A> {
    /// Key character, matched case-insensitively.
    pub key: char,
    /// Ctrl must be held when set and must not be held otherwise.
    pub ctrl: bool,
    /// Meta must be held when set and must not be held otherwise.
    pub meta: bool,
    pub description: String,
    pub action: A,
}

impl<A> Shortcut<A> {
    /// A `Ctrl+key` binding.
    pub fn ctrl(key: char, description: impl Into<String>, action: A) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
            description: description.into(),
            action,
        }
    }

    /// Whether `event` triggers this binding.
    pub fn matches(&self, event: &KeyInput) -> bool {
        let mut chars = event.input.chars();
        let key_matches = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_lowercase().eq(self.key.to_lowercase()),
            _ => false,
        };
        key_matches && self.ctrl == event.key.ctrl && self.meta == event.key.meta
    }

    /// Human-readable key label, e.g. `Ctrl+C`.
    pub fn label(&self) -> String {
        let mut label = String::new();
        if self.ctrl {
            label.push_str("Ctrl+");
        }
        if self.meta {
            label.push_str("Meta+");
        }
        label.extend(self.key.to_uppercase());
        label
    }
}

/// Ordered list of shortcuts; the first match wins.
#[derive(Debug, Clone)]
pub struct ShortcutSet<A> {
    shortcuts: Vec<Shortcut<A>>,
    disabled: bool,
}

impl<A> ShortcutSet<A> {
    pub fn new(shortcuts: Vec<Shortcut<A>>) -> Self {
        Self {
            shortcuts,
            disabled: false,
        }
    }

    /// A disabled set never matches.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Action bound to `event`, if any.
    pub fn matching(&self, event: &KeyInput) -> Option<&A> {
        if self.disabled {
            return None;
        }
        self.shortcuts
            .iter()
            .find(|shortcut| shortcut.matches(event))
            .map(|shortcut| &shortcut.action)
    }

    /// `(label, description)` pairs for help listings.
    pub fn help_entries(&self) -> Vec<(String, &str)> {
        self.shortcuts
            .iter()
            .map(|s| (s.label(), s.description.as_str()))
            .collect()
    }
}

/// Actions behind the shortcuts every chat surface offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonAction {
    Exit,
    ClearHistory,
    ToggleTools,
    ToggleHelp,
}

/// Ctrl+C exit, Ctrl+L clear, Ctrl+T tool display, Ctrl+H help.
pub fn common_shortcuts() -> ShortcutSet<CommonAction> {
    ShortcutSet::new(vec![
        Shortcut::ctrl('c', "Exit application", CommonAction::Exit),
        Shortcut::ctrl('l', "Clear message history", CommonAction::ClearHistory),
        Shortcut::ctrl('t', "Toggle tool display", CommonAction::ToggleTools),
        Shortcut::ctrl('h', "Toggle help", CommonAction::ToggleHelp),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_shortcut_matches_case_insensitively() {
        let set = common_shortcuts();
        assert_eq!(
            set.matching(&KeyInput::char('c').with_ctrl()),
            Some(&CommonAction::Exit)
        );
        assert_eq!(
            set.matching(&KeyInput::char('L').with_ctrl()),
            Some(&CommonAction::ClearHistory)
        );
    }

    #[test]
    fn modifier_requirements_are_exact() {
        let set = common_shortcuts();
        assert_eq!(set.matching(&KeyInput::char('c')), None);
        assert_eq!(set.matching(&KeyInput::char('c').with_ctrl().with_meta()), None);
    }

    #[test]
    fn unmodified_shortcut_rejects_ctrl() {
        let set = ShortcutSet::new(vec![Shortcut {
            key: '?',
            ctrl: false,
            meta: false,
            description: "Help".to_string(),
            action: 1,
        }]);
        assert_eq!(set.matching(&KeyInput::char('?')), Some(&1));
        assert_eq!(set.matching(&KeyInput::char('?').with_ctrl()), None);
    }

    #[test]
    fn first_match_wins() {
        let set = ShortcutSet::new(vec![
            Shortcut::ctrl('x', "first", "first"),
            Shortcut::ctrl('x', "second", "second"),
        ]);
        assert_eq!(set.matching(&KeyInput::char('x').with_ctrl()), Some(&"first"));
    }

    #[test]
    fn disabled_set_never_matches() {
        let mut set = common_shortcuts();
        set.set_disabled(true);
        assert_eq!(set.matching(&KeyInput::char('c').with_ctrl()), None);
    }

    #[test]
    fn help_entries_use_readable_labels() {
        let set = common_shortcuts();
        let entries = set.help_entries();
        assert_eq!(entries[0], ("Ctrl+C".to_string(), "Exit application"));
        assert_eq!(entries.len(), 4);
    }
}
