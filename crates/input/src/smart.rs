//! Input that switches between single-line and modal multi-line presentation.

use proto::{EditMode, FocusTarget, InputMode, InputState, KeyInput, PresentationMode};
use tracing::debug;

use crate::buffer::TextBuffer;
use crate::modal::{KeyOutcome, ModalController};

/// Default content length above which `Auto` switches to multi-line.
pub const DEFAULT_MULTILINE_THRESHOLD: usize = 50;

/// Shared buffer rendered by whichever presentation the content calls for.
#[derive(Debug, Clone)]
pub struct SmartInput {
    editor: ModalController,
    requested: InputMode,
    threshold: usize,
    presentation: PresentationMode,
}

impl Default for SmartInput {
    fn default() -> Self {
        Self::new(InputMode::Auto, DEFAULT_MULTILINE_THRESHOLD)
    }
}

impl SmartInput {
    /// Creates an empty input with the given policy and `Auto` threshold.
    pub fn new(requested: InputMode, threshold: usize) -> Self {
        let mut input = Self {
            editor: ModalController::new(),
            requested,
            threshold,
            presentation: PresentationMode::Simple,
        };
        input.refresh_presentation();
        input
    }

    pub fn presentation(&self) -> PresentationMode {
        self.presentation
    }

    pub fn requested_mode(&self) -> InputMode {
        self.requested
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Current modal state of the multi-line editor.
    pub fn mode(&self) -> EditMode {
        self.editor.mode()
    }

    pub fn buffer(&self) -> &TextBuffer {
        self.editor.buffer()
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.editor.buffer_mut().set_disabled(disabled);
    }

    pub fn is_disabled(&self) -> bool {
        self.editor.buffer().is_disabled()
    }

    /// Changes the presentation policy and re-resolves the presentation.
    pub fn set_requested_mode(&mut self, requested: InputMode) {
        self.requested = requested;
        self.refresh_presentation();
    }

    /// Snapshot for presentational code.
    pub fn input_state(&self, focus_target: FocusTarget) -> InputState {
        InputState {
            focus_target,
            content: self.buffer().content().to_string(),
            cursor: self.buffer().cursor(),
            mode: self.mode(),
        }
    }

    /// Routes a key to the active presentation.
    pub fn handle_key(&mut self, event: &KeyInput) -> KeyOutcome {
        let outcome = match self.presentation {
            PresentationMode::Multiline => self.editor.handle_key(event),
            PresentationMode::Simple => self.handle_simple_key(event),
        };
        if matches!(outcome, KeyOutcome::Changed | KeyOutcome::Submitted(_)) {
            self.refresh_presentation();
        }
        outcome
    }

    /// Inserts text at the cursor regardless of presentation (pastes).
    pub fn insert_text(&mut self, text: &str) -> bool {
        let inserted = self.editor.buffer_mut().insert(text);
        if inserted {
            self.refresh_presentation();
        }
        inserted
    }

    /// Drops content and cursor without submitting.
    pub fn clear(&mut self) {
        self.editor.buffer_mut().clear();
        self.refresh_presentation();
    }

    fn handle_simple_key(&mut self, event: &KeyInput) -> KeyOutcome {
        let buffer = self.editor.buffer_mut();
        if buffer.is_disabled() {
            return KeyOutcome::Ignored;
        }
        let key = &event.key;
        if key.return_key {
            return match buffer.submit() {
                Some(text) => KeyOutcome::Submitted(text),
                None => KeyOutcome::Handled,
            };
        }
        if key.backspace || key.delete {
            return if buffer.delete_backward() {
                KeyOutcome::Changed
            } else {
                KeyOutcome::Handled
            };
        }
        match event.printable() {
            Some(text) if buffer.insert(text) => KeyOutcome::Changed,
            _ => KeyOutcome::Ignored,
        }
    }

    fn refresh_presentation(&mut self) {
        let next = match self.requested {
            InputMode::Simple => PresentationMode::Simple,
            InputMode::Multiline => PresentationMode::Multiline,
            InputMode::Auto => {
                let buffer = self.editor.buffer();
                if buffer.len() > self.threshold || buffer.is_multiline() {
                    PresentationMode::Multiline
                } else {
                    PresentationMode::Simple
                }
            }
        };
        if next != self.presentation {
            debug!(from = ?self.presentation, to = ?next, "Input presentation switched");
            self.presentation = next;
        }
    }
}
