//! `termchat` entrypoint: configuration, logging, and the chat surface.

mod config;
#[cfg(test)]
mod test_support;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use proto::InputMode;
use session::{LoopbackClient, SessionLifecycle};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, UiConfig};

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "termchat")]
#[command(about = "Terminal chat client for session-oriented backends", version)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug logging to ~/.termchat/logs/
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Backend address (host:port); overrides config and environment
    #[arg(long)]
    server: Option<String>,

    /// Actor manifest (.toml); overrides config and environment
    #[arg(long)]
    manifest: Option<String>,

    /// Input presentation: simple, multiline, or auto
    #[arg(long)]
    input_mode: Option<InputMode>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // WorkerGuard must outlive main() so buffered file writes are flushed on exit.
    let _file_guard = init_tracing(&cli.log_level, cli.debug);

    if cli.debug {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            log_level = %cli.log_level,
            "========== termchat session start =========="
        );
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => {
            return Err(e).context("failed to load the configuration given with --config");
        }
        Err(e) => {
            warn!("Failed to load config ({e}), using defaults");
            Config::default()
        }
    };
    let config = config.with_overrides(cli.server.clone(), cli.manifest.clone());

    let report = config.validate();
    if !report.valid {
        for error in &report.errors {
            eprintln!("Configuration error: {error}");
        }
        std::process::exit(2);
    }

    let ui = effective_ui(&config, cli.input_mode);
    info!(
        server = ?config.session.server,
        input_mode = ?ui.input_mode,
        "Starting chat session"
    );

    let client = Arc::new(LoopbackClient::new());
    let lifecycle = Arc::new(SessionLifecycle::new(client, config.session.clone()));
    tui::run_tui(lifecycle, ui).await
}

/// Installs the tracing subscriber. Console output goes to a sink so the
/// full-screen UI is not corrupted; `--debug` adds a daily-rotated file.
fn init_tracing(
    log_level: &str,
    debug: bool,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if !debug {
        fmt()
            .with_env_filter(console_filter)
            .with_writer(std::io::sink)
            .with_target(false)
            .init();
        return None;
    }

    let log_dir = Config::log_dir();
    std::fs::create_dir_all(&log_dir).ok();
    let appender = tracing_appender::rolling::daily(&log_dir, "debug.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let console = fmt::layer()
        .with_writer(std::io::sink)
        .with_target(false)
        .with_filter(console_filter);
    let file = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("debug"));
    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();
    Some(guard)
}

/// UI settings with the `--input-mode` flag applied.
fn effective_ui(config: &Config, input_mode: Option<InputMode>) -> UiConfig {
    let mut ui = config.ui.clone();
    if let Some(mode) = input_mode {
        ui.input_mode = mode;
    }
    ui
}
