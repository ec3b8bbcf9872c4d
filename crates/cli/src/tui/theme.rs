//! Centralized TUI theme built on ratatui's Tailwind CSS palette.

use ratatui::style::Color;
use ratatui::style::palette::tailwind;

/// The application theme — all visual tokens in one place.
pub struct Theme {
    // ── Base ──
    pub fg: Color,
    pub fg_dim: Color,
    pub fg_muted: Color,
    pub border: Color,
    /// Border of the input box while it accepts keys.
    pub border_active: Color,

    // ── Header ──
    pub title: Color,
    pub subtitle: Color,
    pub status_pending: Color,
    pub status_spinner: Color,
    pub error: Color,

    // ── Transcript roles ──
    pub user_text: Color,
    pub assistant_text: Color,
    pub system_text: Color,
    pub tool_text: Color,
    pub timestamp: Color,

    // ── Input ──
    /// Inverted cell under the cursor.
    pub cursor_bg: Color,
    pub cursor_fg: Color,
    pub mode_insert: Color,
    pub mode_command: Color,
    pub placeholder: Color,

    // ── Help panel ──
    pub help_border: Color,
    pub help_title: Color,
    pub help_key: Color,
    pub help_desc: Color,
}

impl Theme {
    /// The default dark theme using Tailwind palette.
    pub const fn default_dark() -> Self {
        Self {
            // Base
            fg: tailwind::SLATE.c100,
            fg_dim: tailwind::SLATE.c400,
            fg_muted: tailwind::SLATE.c500,
            border: tailwind::SLATE.c700,
            border_active: tailwind::EMERALD.c500,

            // Header
            title: tailwind::CYAN.c400,
            subtitle: tailwind::SLATE.c400,
            status_pending: tailwind::AMBER.c400,
            status_spinner: tailwind::AMBER.c400,
            error: tailwind::RED.c500,

            // Transcript
            user_text: tailwind::SLATE.c400,
            assistant_text: tailwind::SLATE.c50,
            system_text: tailwind::SLATE.c500,
            tool_text: tailwind::FUCHSIA.c400,
            timestamp: tailwind::SLATE.c600,

            // Input
            cursor_bg: tailwind::SLATE.c100,
            cursor_fg: tailwind::SLATE.c950,
            mode_insert: tailwind::EMERALD.c400,
            mode_command: tailwind::AMBER.c400,
            placeholder: tailwind::SLATE.c600,

            // Help
            help_border: tailwind::BLUE.c500,
            help_title: tailwind::CYAN.c400,
            help_key: tailwind::YELLOW.c400,
            help_desc: tailwind::SLATE.c400,
        }
    }
}

/// Global theme instance.
pub const THEME: Theme = Theme::default_dark();
