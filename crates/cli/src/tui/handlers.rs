//! Key routing for the chat surface.
//!
//! Three regions share the key stream: the help panel while it is open,
//! global shortcuts, and the message input once the session is ready.

use input::{InputDispatcher, KeyOutcome, handler_fn};
use proto::KeyInput;

use super::app::ChatApp;

pub const HELP_PRIORITY: i32 = 100;
pub const SHORTCUT_PRIORITY: i32 = 50;
pub const INPUT_PRIORITY: i32 = 10;

/// Dispatcher with the help, shortcut, and input handlers registered.
pub fn build_dispatcher() -> InputDispatcher<ChatApp> {
    let mut dispatcher = InputDispatcher::new();

    dispatcher.register(
        "help",
        handler_fn(
            HELP_PRIORITY,
            |app: &ChatApp| app.show_help,
            |event: &KeyInput, app: &mut ChatApp| {
                if event.key.escape {
                    app.show_help = false;
                    return true;
                }
                false
            },
        ),
    );

    dispatcher.register(
        "shortcuts",
        handler_fn(
            SHORTCUT_PRIORITY,
            |_: &ChatApp| true,
            |event: &KeyInput, app: &mut ChatApp| match app.shortcuts.matching(event).copied() {
                Some(action) => {
                    app.apply_action(action);
                    true
                }
                None => false,
            },
        ),
    );

    dispatcher.register(
        "input",
        handler_fn(
            INPUT_PRIORITY,
            |app: &ChatApp| app.is_ready(),
            |event: &KeyInput, app: &mut ChatApp| match app.input.handle_key(event) {
                KeyOutcome::Submitted(text) => {
                    app.submit(text);
                    true
                }
                outcome => outcome.is_consumed(),
            },
        ),
    );

    dispatcher
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use proto::{EditMode, InputMode, KeyFlags, SetupPhase};
    use session::SetupStatus;

    fn app(phase: SetupPhase, input_mode: InputMode) -> ChatApp {
        let mut app = ChatApp::new(&UiConfig {
            input_mode,
            ..UiConfig::default()
        });
        app.apply_status(SetupStatus {
            phase,
            message: phase.status_message().to_string(),
        });
        app
    }

    fn type_text(dispatcher: &mut InputDispatcher<ChatApp>, app: &mut ChatApp, text: &str) {
        for c in text.chars() {
            dispatcher.dispatch(&KeyInput::char(c), app);
        }
    }

    #[test]
    fn registers_three_regions() {
        let dispatcher = build_dispatcher();
        assert_eq!(dispatcher.ids(), vec!["help", "shortcuts", "input"]);
    }

    #[test]
    fn typing_before_ready_is_unhandled() {
        let mut dispatcher = build_dispatcher();
        let mut app = app(SetupPhase::Connecting, InputMode::Auto);
        assert!(!dispatcher.dispatch(&KeyInput::char('a'), &mut app));
        assert!(app.input.buffer().is_empty());
    }

    #[test]
    fn shortcuts_work_before_ready() {
        let mut dispatcher = build_dispatcher();
        let mut app = app(SetupPhase::LoadingActor, InputMode::Auto);
        assert!(dispatcher.dispatch(&KeyInput::char('c').with_ctrl(), &mut app));
        assert!(app.should_quit);
    }

    #[test]
    fn enter_submits_typed_text() {
        let mut dispatcher = build_dispatcher();
        let mut app = app(SetupPhase::Ready, InputMode::Simple);
        type_text(&mut dispatcher, &mut app, "hi");
        assert!(dispatcher.dispatch(&KeyInput::key(KeyFlags::enter()), &mut app));
        assert_eq!(app.take_outbox(), vec!["hi".to_string()]);
        assert!(app.input.buffer().is_empty());
    }

    #[test]
    fn shortcut_keys_never_reach_the_buffer() {
        let mut dispatcher = build_dispatcher();
        let mut app = app(SetupPhase::Ready, InputMode::Auto);
        dispatcher.dispatch(&KeyInput::char('t').with_ctrl(), &mut app);
        assert!(app.input.buffer().is_empty());
    }

    #[test]
    fn escape_closes_help_before_editor_sees_it() {
        let mut dispatcher = build_dispatcher();
        let mut app = app(SetupPhase::Ready, InputMode::Multiline);
        dispatcher.dispatch(&KeyInput::char('h').with_ctrl(), &mut app);
        assert!(app.show_help);

        assert!(dispatcher.dispatch(&KeyInput::key(KeyFlags::escape()), &mut app));
        assert!(!app.show_help);
        assert_eq!(app.input.mode(), EditMode::Insert);

        dispatcher.dispatch(&KeyInput::key(KeyFlags::escape()), &mut app);
        assert_eq!(app.input.mode(), EditMode::Command);
    }

    #[test]
    fn typing_with_help_open_still_edits() {
        let mut dispatcher = build_dispatcher();
        let mut app = app(SetupPhase::Ready, InputMode::Auto);
        app.show_help = true;
        type_text(&mut dispatcher, &mut app, "ok");
        assert_eq!(app.input.buffer().content(), "ok");
    }
}
