//! Async event loop for the TUI — interleaves crossterm, session status,
//! channel payloads, send results, and timer events.

use std::sync::Arc;

use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use futures_util::StreamExt;
use input::key_input_from;
use ratatui::{Terminal, backend::CrosstermBackend};
use session::{ChannelPayload, SessionLifecycle};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::app::ChatApp;
use super::handlers::build_dispatcher;
use crate::config::UiConfig;

/// Restores terminal state on drop.
struct TerminalGuard {
    /// Keyboard enhancement flags were pushed and must be popped.
    keyboard_enhanced: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
    }
}

/// Next payload from the session channel; pends forever without one.
async fn next_payload(
    rx: &mut Option<broadcast::Receiver<ChannelPayload>>,
) -> Option<ChannelPayload> {
    let Some(receiver) = rx.as_mut() else {
        return std::future::pending().await;
    };
    loop {
        match receiver.recv().await {
            Ok(payload) => return Some(payload),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Channel receiver lagged; payloads dropped");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

/// Run the full-screen chat until the user quits, then tear the session down.
pub async fn run_tui(lifecycle: Arc<SessionLifecycle>, ui: UiConfig) -> anyhow::Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    // Without the kitty protocol, Ctrl+Enter arrives as a bare Enter.
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false)
        && execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )
        .is_ok();
    let _guard = TerminalGuard { keyboard_enhanced }; // Drop restores terminal
    debug!(keyboard_enhanced, "Terminal initialised");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = ChatApp::new(&ui);
    app.keyboard_enhanced = keyboard_enhanced;
    let mut dispatcher = build_dispatcher();

    let setup_cancel = CancellationToken::new();
    let mut status_rx = lifecycle.subscribe();
    let setup_task = lifecycle.spawn_setup(setup_cancel.clone());
    debug!("TUI started");

    let mut crossterm_stream = EventStream::new();
    let mut channel_rx: Option<broadcast::Receiver<ChannelPayload>> = None;
    let (send_tx, mut send_rx) = mpsc::channel::<String>(16);

    // Spinner tick interval (100ms)
    let mut spinner_interval = tokio::time::interval(std::time::Duration::from_millis(100));
    spinner_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            maybe_event = crossterm_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if let Some(event) = key_input_from(&key) {
                            let handled = dispatcher.dispatch(&event, &mut app);
                            debug!(handled, "Key dispatched");
                        }
                    }
                    Some(Ok(Event::Paste(text))) => {
                        if app.is_ready() {
                            app.paste(&text);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal event error: {e}");
                        break;
                    }
                    None => break,
                }
            }

            changed = status_rx.changed() => {
                if changed.is_ok() {
                    let status = status_rx.borrow_and_update().clone();
                    if status.phase == proto::SetupPhase::Ready && channel_rx.is_none() {
                        channel_rx = lifecycle.channel().map(|channel| channel.subscribe());
                    }
                    app.apply_status(status);
                }
            }

            payload = next_payload(&mut channel_rx) => {
                match payload {
                    Some(payload) => app.apply_payload(&payload),
                    None => {
                        debug!("Session channel closed");
                        channel_rx = None;
                    }
                }
            }

            Some(error) = send_rx.recv() => {
                app.apply_send_error(&error);
            }

            _ = spinner_interval.tick(), if app.status.phase.shows_spinner() => {
                app.spinner_tick = app.spinner_tick.wrapping_add(1);
            }
        }

        for text in app.take_outbox() {
            let lifecycle = Arc::clone(&lifecycle);
            let errors = send_tx.clone();
            tokio::spawn(async move {
                if let Err(e) = lifecycle.send_message(&text).await {
                    warn!("Send failed: {e}");
                    let _ = errors.send(e.to_string()).await;
                }
            });
        }

        if app.should_quit {
            break;
        }
    }

    setup_cancel.cancel();
    if let Err(e) = setup_task.await {
        debug!("Setup task ended abnormally: {e}");
    }
    lifecycle.cleanup().await;
    // TerminalGuard::drop handles cleanup
    Ok(())
}
