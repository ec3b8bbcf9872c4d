//! Conversion from crossterm key events to [`KeyInput`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use proto::{KeyFlags, KeyInput};

/// Normalises a crossterm key press; releases and unmapped keys yield `None`.
pub fn key_input_from(event: &KeyEvent) -> Option<KeyInput> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let modifiers = event.modifiers;
    let mut key = KeyFlags {
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        meta: modifiers.intersects(KeyModifiers::ALT | KeyModifiers::META | KeyModifiers::SUPER),
        shift: modifiers.contains(KeyModifiers::SHIFT),
        ..KeyFlags::default()
    };
    let mut input = String::new();

    match event.code {
        KeyCode::Char(c) => input.push(c),
        KeyCode::Enter => key.return_key = true,
        KeyCode::Esc => key.escape = true,
        KeyCode::Backspace => key.backspace = true,
        KeyCode::Delete => key.delete = true,
        KeyCode::Left => key.left_arrow = true,
        KeyCode::Right => key.right_arrow = true,
        KeyCode::Up => key.up_arrow = true,
        KeyCode::Down => key.down_arrow = true,
        KeyCode::Tab => key.tab = true,
        KeyCode::BackTab => {
            key.tab = true;
            key.shift = true;
        }
        _ => return None,
    }

    Some(KeyInput { input, key })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn plain_char_becomes_text() {
        let event = key_input_from(&press(KeyCode::Char('a'), KeyModifiers::NONE))
            .expect("char maps");
        assert_eq!(event, KeyInput::char('a'));
    }

    #[test]
    fn ctrl_char_keeps_text_and_sets_ctrl() {
        let event = key_input_from(&press(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .expect("ctrl char maps");
        assert_eq!(event.input, "c");
        assert!(event.key.ctrl);
        assert_eq!(event.printable(), None);
    }

    #[test]
    fn alt_maps_to_meta() {
        let event = key_input_from(&press(KeyCode::Enter, KeyModifiers::ALT))
            .expect("alt enter maps");
        assert!(event.key.return_key);
        assert!(event.key.meta);
        assert!(event.input.is_empty());
    }

    #[test]
    fn named_keys_map_to_flags() {
        let cases = [
            (KeyCode::Esc, KeyFlags::escape()),
            (KeyCode::Backspace, KeyFlags::backspace()),
            (KeyCode::Delete, KeyFlags::delete()),
            (KeyCode::Left, KeyFlags::left()),
            (KeyCode::Right, KeyFlags::right()),
            (KeyCode::Up, KeyFlags::up()),
            (KeyCode::Down, KeyFlags::down()),
        ];
        for (code, flags) in cases {
            let event = key_input_from(&press(code, KeyModifiers::NONE)).expect("key maps");
            assert_eq!(event.key, flags);
        }
    }

    #[test]
    fn releases_and_unmapped_keys_are_dropped() {
        let mut release = press(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(key_input_from(&release), None);
        assert_eq!(
            key_input_from(&press(KeyCode::F(5), KeyModifiers::NONE)),
            None
        );
    }
}
