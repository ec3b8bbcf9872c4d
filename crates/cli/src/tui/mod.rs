//! Full-screen ratatui chat surface.

pub mod app;
pub mod event;
pub mod format;
pub mod handlers;
pub mod theme;
pub mod transcript;

pub use event::run_tui;
