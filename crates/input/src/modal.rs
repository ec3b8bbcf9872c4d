//! Insert/command modal editing over a [`TextBuffer`].
//!
//! Key routing is split in two: [`transition`] is a pure function from the
//! current mode and a key event to an edit action and the next mode, and
//! [`ModalController::handle_key`] applies that action to the owned buffer.
//!
//! | mode    | key                     | action          | next    |
//! |---------|-------------------------|-----------------|---------|
//! | any     | escape                  | none            | command |
//! | command | return                  | submit          | command |
//! | insert  | return + ctrl/meta      | submit          | insert  |
//! | insert  | return                  | insert newline  | insert  |
//! | any     | printable, no ctrl/meta | insert text     | same    |
//! | insert  | arrows                  | move cursor     | insert  |
//! | insert  | backspace/delete        | delete backward | insert  |
//! | command | arrows/backspace/delete | ignored         | command |

use proto::{EditMode, KeyInput};
use tracing::debug;

use crate::buffer::{TextBuffer, Vertical};

/// Edit requested by one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction<'a> {
    /// The key only affects the mode.
    None,
    Submit,
    InsertNewline,
    InsertText(&'a str),
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    DeleteBackward,
    /// The key is not for the editor.
    Ignore,
}

/// What handling a key did to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Trimmed, non-empty content was submitted and the buffer cleared.
    Submitted(String),
    /// Content, cursor or mode changed.
    Changed,
    /// The key was consumed without a visible change.
    Handled,
    /// The key is not for the editor.
    Ignored,
}

impl KeyOutcome {
    /// `true` for everything except [`KeyOutcome::Ignored`].
    pub fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    fn from_change(changed: bool) -> Self {
        if changed { Self::Changed } else { Self::Handled }
    }
}

/// Pure modal transition: `(mode, event) -> (action, next mode)`.
pub fn transition(mode: EditMode, event: &KeyInput) -> (ModalAction<'_>, EditMode) {
    let key = &event.key;

    if key.escape {
        return (ModalAction::None, EditMode::Command);
    }

    if key.return_key {
        return match mode {
            EditMode::Command => (ModalAction::Submit, EditMode::Command),
            EditMode::Insert if key.has_control_modifier() => {
                (ModalAction::Submit, EditMode::Insert)
            }
            EditMode::Insert => (ModalAction::InsertNewline, EditMode::Insert),
        };
    }

    if let Some(text) = event.printable() {
        return (ModalAction::InsertText(text), mode);
    }

    if mode != EditMode::Insert {
        return (ModalAction::Ignore, mode);
    }

    let action = if key.left_arrow {
        ModalAction::MoveLeft
    } else if key.right_arrow {
        ModalAction::MoveRight
    } else if key.up_arrow {
        ModalAction::MoveUp
    } else if key.down_arrow {
        ModalAction::MoveDown
    } else if key.backspace || key.delete {
        ModalAction::DeleteBackward
    } else {
        ModalAction::Ignore
    };
    (action, mode)
}

/// Multi-line editor with insert/command modes.
#[derive(Debug, Clone, Default)]
pub struct ModalController {
    buffer: TextBuffer,
    mode: EditMode,
}

impl ModalController {
    /// Creates an empty editor in insert mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing buffer, starting in insert mode.
    pub fn with_buffer(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            mode: EditMode::Insert,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Overrides the mode from outside the key stream.
    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    /// Routes one key event through the mode table.
    pub fn handle_key(&mut self, event: &KeyInput) -> KeyOutcome {
        if self.buffer.is_disabled() {
            return KeyOutcome::Ignored;
        }

        let (action, next_mode) = transition(self.mode, event);
        let mode_changed = next_mode != self.mode;
        if mode_changed {
            debug!(from = ?self.mode, to = ?next_mode, "Edit mode changed");
            self.mode = next_mode;
        }

        let edited = match action {
            ModalAction::Ignore => return KeyOutcome::Ignored,
            ModalAction::None => false,
            ModalAction::Submit => {
                return match self.buffer.submit() {
                    Some(text) => KeyOutcome::Submitted(text),
                    None => KeyOutcome::from_change(mode_changed),
                };
            }
            ModalAction::InsertNewline => self.buffer.insert("\n"),
            ModalAction::InsertText(text) => self.buffer.insert(text),
            ModalAction::MoveLeft => self.buffer.move_by(-1),
            ModalAction::MoveRight => self.buffer.move_by(1),
            ModalAction::MoveUp => self.buffer.move_vertical(Vertical::Up),
            ModalAction::MoveDown => self.buffer.move_vertical(Vertical::Down),
            ModalAction::DeleteBackward => self.buffer.delete_backward(),
        };

        KeyOutcome::from_change(edited || mode_changed)
    }
}

#[cfg(test)]
mod tests {
    use proto::KeyFlags;

    use super::*;

    fn editor(content: &str, cursor: usize) -> ModalController {
        ModalController::with_buffer(TextBuffer::with_content(content, cursor))
    }

    #[test]
    fn escape_switches_to_command_from_any_mode() {
        let escape = KeyInput::key(KeyFlags::escape());
        assert_eq!(
            transition(EditMode::Insert, &escape),
            (ModalAction::None, EditMode::Command)
        );
        assert_eq!(
            transition(EditMode::Command, &escape),
            (ModalAction::None, EditMode::Command)
        );
    }

    #[test]
    fn return_routing_depends_on_mode_and_modifier() {
        let enter = KeyInput::key(KeyFlags::enter());
        assert_eq!(
            transition(EditMode::Command, &enter),
            (ModalAction::Submit, EditMode::Command)
        );
        assert_eq!(
            transition(EditMode::Insert, &enter),
            (ModalAction::InsertNewline, EditMode::Insert)
        );
        assert_eq!(
            transition(EditMode::Insert, &enter.clone().with_ctrl()),
            (ModalAction::Submit, EditMode::Insert)
        );
        assert_eq!(
            transition(EditMode::Insert, &enter.with_meta()),
            (ModalAction::Submit, EditMode::Insert)
        );
    }

    #[test]
    fn printable_text_inserts_in_both_modes() {
        let event = KeyInput::char('q');
        assert_eq!(
            transition(EditMode::Command, &event),
            (ModalAction::InsertText("q"), EditMode::Command)
        );
        assert_eq!(
            transition(EditMode::Insert, &event),
            (ModalAction::InsertText("q"), EditMode::Insert)
        );
    }

    #[test]
    fn navigation_and_deletion_are_inert_in_command_mode() {
        for flags in [
            KeyFlags::left(),
            KeyFlags::right(),
            KeyFlags::up(),
            KeyFlags::down(),
            KeyFlags::backspace(),
            KeyFlags::delete(),
        ] {
            assert_eq!(
                transition(EditMode::Command, &KeyInput::key(flags)),
                (ModalAction::Ignore, EditMode::Command)
            );
        }
    }

    #[test]
    fn ctrl_char_is_ignored() {
        assert_eq!(
            transition(EditMode::Insert, &KeyInput::char('l').with_ctrl()),
            (ModalAction::Ignore, EditMode::Insert)
        );
    }

    #[test]
    fn insert_mode_return_adds_newline() {
        let mut editor = editor("ab", 1);
        let outcome = editor.handle_key(&KeyInput::key(KeyFlags::enter()));
        assert_eq!(outcome, KeyOutcome::Changed);
        assert_eq!(editor.buffer().content(), "a\nb");
        assert_eq!(editor.buffer().cursor(), 2);
    }

    #[test]
    fn command_mode_return_submits_and_stays_in_command() {
        let mut editor = editor("  draft  ", 3);
        editor.handle_key(&KeyInput::key(KeyFlags::escape()));
        let outcome = editor.handle_key(&KeyInput::key(KeyFlags::enter()));
        assert_eq!(outcome, KeyOutcome::Submitted("draft".to_string()));
        assert_eq!(editor.buffer().content(), "");
        assert_eq!(editor.buffer().cursor(), 0);
        assert_eq!(editor.mode(), EditMode::Command);
    }

    #[test]
    fn ctrl_return_submits_in_insert_mode() {
        let mut editor = editor("line one\nline two", 4);
        let outcome = editor.handle_key(&KeyInput::key(KeyFlags::enter()).with_ctrl());
        assert_eq!(
            outcome,
            KeyOutcome::Submitted("line one\nline two".to_string())
        );
        assert_eq!(editor.mode(), EditMode::Insert);
    }

    #[test]
    fn blank_submit_is_consumed_but_changes_nothing() {
        let mut editor = editor("   ", 3);
        let outcome = editor.handle_key(&KeyInput::key(KeyFlags::enter()).with_ctrl());
        assert_eq!(outcome, KeyOutcome::Handled);
        assert_eq!(editor.buffer().content(), "   ");
    }

    #[test]
    fn arrows_move_in_insert_mode() {
        let mut editor = editor("abcdef\nxy", 5);
        editor.handle_key(&KeyInput::key(KeyFlags::down()));
        assert_eq!(editor.buffer().cursor(), 9);
        editor.handle_key(&KeyInput::key(KeyFlags::left()));
        assert_eq!(editor.buffer().cursor(), 8);
        editor.handle_key(&KeyInput::key(KeyFlags::up()));
        assert_eq!(editor.buffer().cursor(), 1);
        editor.handle_key(&KeyInput::key(KeyFlags::right()));
        assert_eq!(editor.buffer().cursor(), 2);
    }

    #[test]
    fn arrows_and_backspace_ignored_in_command_mode() {
        let mut editor = editor("abc", 2);
        editor.set_mode(EditMode::Command);
        assert_eq!(
            editor.handle_key(&KeyInput::key(KeyFlags::left())),
            KeyOutcome::Ignored
        );
        assert_eq!(
            editor.handle_key(&KeyInput::key(KeyFlags::backspace())),
            KeyOutcome::Ignored
        );
        assert_eq!(editor.buffer().content(), "abc");
        assert_eq!(editor.buffer().cursor(), 2);
    }

    #[test]
    fn delete_key_deletes_backward() {
        let mut editor = editor("abc", 2);
        editor.handle_key(&KeyInput::key(KeyFlags::delete()));
        assert_eq!(editor.buffer().content(), "ac");
        assert_eq!(editor.buffer().cursor(), 1);
    }

    #[test]
    fn escape_reports_change_only_once() {
        let mut editor = editor("", 0);
        let escape = KeyInput::key(KeyFlags::escape());
        assert_eq!(editor.handle_key(&escape), KeyOutcome::Changed);
        assert_eq!(editor.handle_key(&escape), KeyOutcome::Handled);
    }

    #[test]
    fn disabled_editor_ignores_keys() {
        let mut editor = editor("abc", 3);
        editor.buffer_mut().set_disabled(true);
        assert_eq!(
            editor.handle_key(&KeyInput::key(KeyFlags::escape())),
            KeyOutcome::Ignored
        );
        assert_eq!(editor.mode(), EditMode::Insert);
    }
}
