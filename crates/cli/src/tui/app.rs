//! Chat surface state and rendering.

use input::{BufferView, CommonAction, ShortcutSet, SmartInput, common_shortcuts};
use proto::{
    ChatMessage, EditMode, MessageStatus, PresentationMode, Role, SetupPhase, ToolDisplayMode,
    UiVariant,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use session::{ChannelPayload, SetupStatus, extract_message_content, parse_channel_payload};
use tracing::debug;

use super::format::{Prefixes, role_color, wrap_content};
use super::theme::THEME;
use super::transcript::Transcript;
use crate::config::UiConfig;

/// Spinner animation frames (Braille pattern).
const SPINNER: &[char] = &['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Placeholder content of the reply slot while the backend works.
const THINKING: &str = "Thinking...";

/// Full state of the interactive chat surface.
pub struct ChatApp {
    pub title: String,
    pub variant: UiVariant,
    pub tool_display: ToolDisplayMode,
    pub show_timestamps: bool,
    /// Visible lines of the multi-line editor.
    pub max_height: usize,
    pub transcript: Transcript,
    pub input: SmartInput,
    pub shortcuts: ShortcutSet<CommonAction>,
    /// Latest session setup status.
    pub status: SetupStatus,
    pub show_help: bool,
    /// The terminal reports modifiers on Enter, so Ctrl+Return can send.
    pub keyboard_enhanced: bool,
    pub should_quit: bool,
    /// Spinner animation tick counter.
    pub spinner_tick: usize,
    /// Submitted texts not yet handed to the session.
    outbox: Vec<String>,
}

impl ChatApp {
    pub fn new(ui: &UiConfig) -> Self {
        let mut input = SmartInput::new(ui.input_mode, ui.multiline_threshold);
        input.set_disabled(true);
        Self {
            title: ui.title.clone(),
            variant: ui.variant,
            tool_display: ui.tool_display,
            show_timestamps: ui.show_timestamps,
            max_height: ui.max_height.max(1),
            transcript: Transcript::new(),
            input,
            shortcuts: common_shortcuts(),
            status: SetupStatus {
                phase: SetupPhase::Connecting,
                message: SetupPhase::Connecting.status_message().to_string(),
            },
            show_help: false,
            keyboard_enhanced: false,
            should_quit: false,
            spinner_tick: 0,
            outbox: Vec::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status.phase == SetupPhase::Ready
    }

    // ── State mutations ──────────────────────────────────────

    /// Adopts a new setup status; the input accepts keys only once ready.
    pub fn apply_status(&mut self, status: SetupStatus) {
        debug!(phase = %status.phase, "Status applied");
        self.input.set_disabled(status.phase != SetupPhase::Ready);
        self.status = status;
    }

    /// Records a submitted message and queues it for sending.
    pub fn submit(&mut self, text: String) {
        self.transcript.add(ChatMessage::new(Role::User, text.clone()));
        self.transcript.add_pending(Role::Assistant, THINKING);
        self.outbox.push(text);
    }

    pub fn take_outbox(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbox)
    }

    /// Folds one inbound channel frame into the transcript.
    pub fn apply_payload(&mut self, payload: &ChannelPayload) {
        let Some(parsed) = parse_channel_payload(payload) else {
            return;
        };
        let extracted = extract_message_content(&parsed);
        // user messages are already shown locally on submit
        if extracted.is_user_message {
            return;
        }
        // replies arrive in send order, so they resolve the oldest slot
        for block in &extracted.tool_blocks {
            match self.transcript.oldest_pending() {
                Some(index) => self
                    .transcript
                    .insert(index, ChatMessage::tool(block.name.clone(), block.args())),
                None => self.transcript.add_tool(block.name.clone(), block.args()),
            }
        }
        if extracted.content.is_empty() {
            return;
        }
        if !self
            .transcript
            .update_first_pending(extracted.content.clone(), MessageStatus::Complete)
        {
            self.transcript
                .add(ChatMessage::new(Role::Assistant, extracted.content));
        }
    }

    /// Resolves the pending reply slot with a send failure.
    pub fn apply_send_error(&mut self, error: &str) {
        let text = format!("Error: {error}");
        if !self
            .transcript
            .update_first_pending(text.clone(), MessageStatus::Complete)
        {
            self.transcript.add(ChatMessage::new(Role::System, text));
        }
    }

    pub fn apply_action(&mut self, action: CommonAction) {
        debug!(?action, "Shortcut action");
        match action {
            CommonAction::Exit => self.should_quit = true,
            CommonAction::ClearHistory => self.transcript.clear(),
            CommonAction::ToggleTools => self.tool_display = self.tool_display.next(),
            CommonAction::ToggleHelp => self.show_help = !self.show_help,
        }
    }

    /// Pasted text goes straight into the buffer.
    pub fn paste(&mut self, text: &str) {
        self.input.insert_text(text);
    }

    // ── Rendering ────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let header_height = if self.is_ready() { 1 } else { 2 };
        let help_height = if self.show_help {
            self.help_lines().len() as u16 + 2
        } else {
            0
        };
        let input_height = self.input_lines().len() as u16 + 2;

        let [header, history, help, input] = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Min(3),
            Constraint::Length(help_height),
            Constraint::Length(input_height),
        ])
        .areas(area);

        self.render_header(frame, header);
        self.render_transcript(frame, history);
        if self.show_help {
            self.render_help(frame, help);
        }
        self.render_input(frame, input);
    }

    fn render_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut lines = vec![Line::from(Span::styled(
            format!(" {}", self.title),
            Style::default().fg(THEME.title),
        ))];
        if !self.is_ready() {
            lines.push(self.status_line());
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn status_line(&self) -> Line<'_> {
        if self.status.phase == SetupPhase::Error {
            return Line::from(Span::styled(
                format!(" {}", self.status.message),
                Style::default().fg(THEME.error),
            ));
        }
        let mut spans = vec![Span::raw(" ")];
        if self.status.phase.shows_spinner() {
            let frame_char = SPINNER[self.spinner_tick % SPINNER.len()];
            spans.push(Span::styled(
                format!("{frame_char} "),
                Style::default().fg(THEME.status_spinner),
            ));
        }
        spans.push(Span::styled(
            self.status.message.as_str(),
            Style::default().fg(THEME.status_pending),
        ));
        Line::from(spans)
    }

    /// Transcript as styled lines, honouring tool display and timestamps.
    pub fn transcript_lines(&self, width: usize) -> Vec<Line<'static>> {
        let prefixes = Prefixes::for_variant(self.variant);
        let mut lines = Vec::new();

        for message in self.transcript.messages() {
            match message.role {
                Role::Tool => {
                    let name = message.tool_name.as_deref().unwrap_or("unknown");
                    let args = message.tool_args.join(" ");
                    let dim = Style::default()
                        .fg(role_color(Role::Tool))
                        .add_modifier(Modifier::DIM);
                    match self.tool_display {
                        ToolDisplayMode::Hidden => continue,
                        ToolDisplayMode::Minimal => {
                            let suffix = if args.is_empty() {
                                String::new()
                            } else {
                                format!(": {args}")
                            };
                            lines.push(Line::from(Span::styled(
                                format!("{}{name}{suffix}", prefixes.tool),
                                dim,
                            )));
                        }
                        ToolDisplayMode::Full => {
                            lines.push(Line::from(Span::styled(
                                format!("{}{name}", prefixes.tool),
                                Style::default().fg(role_color(Role::Tool)),
                            )));
                            if !args.is_empty() {
                                lines.push(Line::from(Span::styled(format!("Args: {args}"), dim)));
                            }
                        }
                    }
                }
                Role::System if message.content.trim().is_empty() => continue,
                role => {
                    let style = Style::default().fg(role_color(role));
                    let prefix = prefixes.for_role(role);
                    let body = wrap_content(&message.content, width);
                    let body_lines: Vec<&str> = body.split('\n').collect();
                    let multi = body_lines.len() > 1;
                    for (index, line) in body_lines.iter().enumerate() {
                        let lead = if index == 0 {
                            prefix
                        } else if multi {
                            "   "
                        } else {
                            ""
                        };
                        let text = if line.is_empty() { " " } else { line };
                        let mut style = style;
                        if message.is_pending() {
                            style = style.add_modifier(Modifier::ITALIC);
                        }
                        lines.push(Line::from(Span::styled(format!("{lead}{text}"), style)));
                    }
                    if self.show_timestamps {
                        lines.push(Line::from(Span::styled(
                            message.timestamp.format("%H:%M:%S").to_string(),
                            Style::default()
                                .fg(THEME.timestamp)
                                .add_modifier(Modifier::DIM),
                        )));
                    }
                }
            }
            lines.push(Line::from(""));
        }
        lines
    }

    fn render_transcript(&self, frame: &mut Frame<'_>, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let lines = self.transcript_lines(inner_width);
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(visible) as u16;

        let history = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(THEME.border)),
            )
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(history, area);
    }

    fn help_lines(&self) -> Vec<Line<'static>> {
        let mut entries: Vec<(String, String)> = self
            .shortcuts
            .help_entries()
            .into_iter()
            .map(|(key, desc)| (key, desc.to_string()))
            .collect();
        entries.push(("Enter".into(), "Send message".into()));
        match self.variant {
            UiVariant::Chat => {
                let send_key = if self.keyboard_enhanced {
                    "Ctrl+Return"
                } else {
                    "Alt+Return"
                };
                entries.push((send_key.into(), "Send message (multiline mode)".into()));
                entries.push(("Esc".into(), "Switch to command mode".into()));
            }
            UiVariant::Git => {
                entries.push(("commit".into(), "Start commit workflow".into()));
                entries.push(("review".into(), "Start code review".into()));
                entries.push(("rebase".into(), "Interactive rebase helper".into()));
            }
            UiVariant::Default => {}
        }

        let mut lines = vec![Line::from(Span::styled(
            "💡 Keyboard Shortcuts",
            Style::default()
                .fg(THEME.help_title)
                .add_modifier(Modifier::BOLD),
        ))];
        for (key, desc) in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("{key:<14}"), Style::default().fg(THEME.help_key)),
                Span::styled(desc, Style::default().fg(THEME.help_desc)),
            ]));
        }
        lines
    }

    fn render_help(&self, frame: &mut Frame<'_>, area: Rect) {
        let panel = Paragraph::new(self.help_lines()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(THEME.help_border)),
        );
        frame.render_widget(panel, area);
    }

    /// Body lines of the input box for the current presentation.
    pub fn input_lines(&self) -> Vec<Line<'_>> {
        let buffer = self.input.buffer();
        let cursor_style = Style::default().fg(THEME.cursor_fg).bg(THEME.cursor_bg);

        if self.input.presentation() == PresentationMode::Simple {
            if buffer.is_empty() {
                let hint = if self.input.is_disabled() {
                    "Waiting for session..."
                } else {
                    "Type a message..."
                };
                return vec![Line::from(vec![
                    Span::raw("> "),
                    Span::styled(hint, Style::default().fg(THEME.placeholder)),
                ])];
            }
            let view = BufferView::new(buffer, 1);
            let mut spans = vec![Span::raw("> ")];
            match view.cursor_line() {
                Some(cursor) if !self.input.is_disabled() => {
                    spans.push(Span::raw(cursor.before));
                    spans.push(Span::styled(cursor.at.to_string(), cursor_style));
                    spans.push(Span::raw(cursor.after));
                }
                _ => spans.push(Span::raw(buffer.content())),
            }
            return vec![Line::from(spans)];
        }

        let view = BufferView::new(buffer, self.max_height);
        let mut lines = Vec::new();
        for (row, text) in view.lines.iter().enumerate() {
            if row == view.cursor_row
                && !self.input.is_disabled()
                && let Some(cursor) = view.cursor_line()
            {
                lines.push(Line::from(vec![
                    Span::raw(cursor.before),
                    Span::styled(cursor.at.to_string(), cursor_style),
                    Span::raw(cursor.after),
                ]));
            } else {
                lines.push(Line::from(Span::raw(*text)));
            }
        }
        if let Some(overflow) = view.overflow_text() {
            lines.push(Line::from(Span::styled(
                overflow,
                Style::default().fg(THEME.fg_muted),
            )));
        }
        let mode = self.input.mode();
        let mode_color = match mode {
            EditMode::Insert => THEME.mode_insert,
            EditMode::Command => THEME.mode_command,
        };
        lines.push(Line::from(vec![
            Span::styled(
                mode.label(),
                Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" • {}", view.status_text()),
                Style::default().fg(THEME.fg_dim),
            ),
        ]));
        lines
    }

    fn render_input(&self, frame: &mut Frame<'_>, area: Rect) {
        let border = if self.input.is_disabled() {
            THEME.border
        } else {
            THEME.border_active
        };
        let widget = Paragraph::new(self.input_lines()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(widget, area);
    }
}
