//! Backroom application binary.
//!
//! Hosts the chat widget in a terminal:
//! 1. Parse CLI args and load configuration from TOML
//! 2. Load the dashboard statistics snapshot
//! 3. Read commands from stdin and drive the widget's timers

mod cli;
mod host;

use std::path::Path;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use backroom_chat::ChatWidget;
use backroom_core::config::BackroomConfig;
use backroom_core::types::StatisticsSnapshot;

use cli::CliArgs;
use host::{Command, Printer};

/// Load the snapshot at `path`, or the built-in sample when none is set.
fn load_stats(path: Option<&Path>) -> StatisticsSnapshot {
    let Some(path) = path else {
        return StatisticsSnapshot::sample();
    };
    match StatisticsSnapshot::load(path) {
        Ok(stats) => {
            tracing::info!(path = %path.display(), "Statistics snapshot loaded");
            stats
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load statistics, using sample data");
            StatisticsSnapshot::sample()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing so its log level can apply; the load
    // outcome is logged once the subscriber is up.
    let config_file = args.resolve_config_path();
    let loaded = BackroomConfig::load(&config_file);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => BackroomConfig::default(),
    };

    // Tracing. RUST_LOG wins, then --log-level, then the config file.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    tracing::info!("Starting Backroom v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
    }

    // Statistics.
    let stats_path = args.resolve_stats_path(&config.general.stats_path);
    let stats = load_stats(stats_path.as_deref());

    // Widget. The close handler only asks; the loop below decides.
    let (close_tx, mut close_rx) = mpsc::unbounded_channel::<()>();
    let mut widget = ChatWidget::new(config.chat.clone(), stats)?.with_close_handler(move || {
        let _ = close_tx.send(());
    });

    let mut printer = Printer::new(std::io::stdout());
    printer.line(
        widget.conversation(),
        "Backroom chat. /open, /close, /suggest <n>, /reload, /transcript, /quit",
    )?;
    if args.open {
        widget.set_visible(true)?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("Input closed");
                    break;
                };
                match Command::parse(&line) {
                    Command::Open => widget.set_visible(true)?,
                    Command::Close => widget.request_close(),
                    Command::Reload => {
                        widget.update_stats(load_stats(stats_path.as_deref()));
                        printer.note(widget.conversation(), "statistics reloaded")?;
                    }
                    Command::Suggest(index) => {
                        if !widget.is_visible() {
                            printer.note(widget.conversation(), "chat is closed, /open first")?;
                        } else if !widget.choose_suggestion(index)? {
                            printer.note(widget.conversation(), "no such suggestion")?;
                        } else {
                            printer.note(widget.conversation(), "backroom is typing...")?;
                        }
                    }
                    Command::Transcript => {
                        let json = serde_json::to_string_pretty(widget.conversation().transcript())?;
                        printer.line(widget.conversation(), &json)?;
                    }
                    Command::Quit => break,
                    Command::Say(text) => {
                        if !widget.is_visible() {
                            printer.note(widget.conversation(), "chat is closed, /open first")?;
                        } else if widget.send(&text)? {
                            printer.note(widget.conversation(), "backroom is typing...")?;
                        }
                    }
                    Command::Empty => {}
                    Command::Invalid(msg) => printer.note(widget.conversation(), &msg)?,
                }
            }
            Some(()) = close_rx.recv() => {
                printer.abandon()?;
                widget.set_visible(false)?;
                printer.note(widget.conversation(), "chat closed")?;
            }
            update = widget.step(), if widget.has_pending_timers() => {
                if let Some(update) = update? {
                    printer.update(widget.conversation(), &update)?;
                }
            }
        }
    }

    widget.set_visible(false)?;
    tracing::info!("Backroom stopped");
    Ok(())
}
