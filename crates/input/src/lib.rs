//! Text editing and key routing for terminal chat surfaces.
//!
//! Everything here is synchronous: buffer edits, modal key handling, the
//! smart single/multi-line selector, and the priority dispatcher that lets
//! several UI regions share one key stream.

pub mod buffer;
pub mod dispatcher;
pub mod modal;
pub mod shortcuts;
pub mod smart;
pub mod terminal;
pub mod view;

/// Cursor-addressed text buffer.
pub use buffer::{TextBuffer, Vertical};
/// Priority-ordered handler registry.
pub use dispatcher::{FnHandler, InputDispatcher, InputHandler, handler_fn};
/// Insert/command modal editor.
pub use modal::{KeyOutcome, ModalAction, ModalController, transition};
/// Keyboard shortcut matching.
pub use shortcuts::{CommonAction, Shortcut, ShortcutSet, common_shortcuts};
/// Single/multi-line presentation selector.
pub use smart::{DEFAULT_MULTILINE_THRESHOLD, SmartInput};
/// crossterm event normalisation.
pub use terminal::key_input_from;
/// Render-ready buffer projections.
pub use view::{BufferView, CursorLine};
