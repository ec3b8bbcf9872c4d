//! Shared protocol types for the input subsystem, session lifecycle, and UI.
//!
//! This crate defines serializable message/session/input structures and
//! strongly-typed error enums shared across the workspace.

pub mod error;
pub mod input;
pub mod key;
pub mod message;
pub mod session;

/// Re-export of all protocol error types.
pub use error::*;
/// Re-export of editing/focus state types.
pub use input::{EditMode, FocusTarget, InputMode, InputState, PresentationMode};
/// Re-export of the keyboard event shape.
pub use key::{KeyFlags, KeyInput};
/// Re-export of transcript message types.
pub use message::{ChatMessage, MessageStatus, Role, ToolDisplayMode, UiVariant};
/// Re-export of session setup and configuration types.
pub use session::{
    ActorHandle, ActorSpec, ChatSession, DEFAULT_SERVER, SessionConfig, SetupPhase,
    ValidationReport, generate_actor_id,
};
