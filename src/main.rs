//! Keep a most-recently-used history of color schemes and switch between
//! them from a terminal picker.
//!
//! Run without arguments to open the picker.  Other subcommands inspect or
//! edit the history directly.

mod app;
mod config;
mod core;
mod host;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Terminal};

use crate::app::{
    commands::SchemeSwitcher,
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{PickerMode, PickerState},
};
use crate::config::AppConfig;
use crate::core::{store::HistoryStore, tracker::SchemeTracker};
use crate::host::settings::FileSettings;
use crate::ui::{layout::AppLayout, picker::PickerWidget, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Switch between recently used color schemes")]
struct Cli {
    /// History file (overrides the config file).
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Preferences file holding the active scheme (overrides the config file).
    #[arg(long, global = true)]
    preferences: Option<PathBuf>,

    /// Name of the watched setting.
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick a scheme to switch to (default).
    Pick,
    /// Pick a scheme to drop from the history.
    Forget,
    /// Print the history, most recent first.
    List,
    /// Print the active scheme.
    Current,
    /// Make VALUE the active scheme; new schemes enter the history.
    Set { value: String },
    /// Record the active scheme if it is not tracked yet.
    Sync,
    /// Move SCHEME to the front of the history.
    Promote { scheme: String },
    /// Switch to the entry at INDEX and move it to the front.
    Switch { index: usize },
    /// Remove the entry at INDEX.
    Remove { index: usize },
    /// Write the effective configuration to the config file.
    InitConfig,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `list` / `current` output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if let Some(path) = cli.history {
        config.history_file = Some(path);
    }
    if let Some(path) = cli.preferences {
        config.preferences_file = Some(path);
    }
    if let Some(key) = cli.key {
        config.setting_key = key;
    }

    if matches!(cli.command, Some(Command::InitConfig)) {
        config.save()?;
        println!("wrote {}", config::config_path().display());
        return Ok(());
    }

    let tracker = SchemeTracker::load(HistoryStore::new(config.history_path()));
    tracing::debug!("history file: {}", tracker.store_path().display());
    let tracker = tracker.into_shared();
    let preferences = config.preferences_path();
    let settings = FileSettings::open(&preferences)
        .with_context(|| format!("opening preferences {}", preferences.display()))?;
    let mut switcher = SchemeSwitcher::new(tracker, settings, config.setting_key.clone());

    match cli.command.unwrap_or(Command::Pick) {
        Command::Pick => run_picker(PickerMode::Switch, &mut switcher, config).await?,
        Command::Forget => run_picker(PickerMode::Remove, &mut switcher, config).await?,
        Command::List => {
            let active = switcher.active();
            let order = switcher.current_order();
            for (i, (path, label)) in order.iter().zip(switcher.list_display_items()).enumerate() {
                let marker = if active.as_deref() == Some(path.as_str()) { '*' } else { ' ' };
                println!("{marker}{i:>3}  {label}  {path}");
            }
        }
        Command::Current => match switcher.active() {
            Some(value) => println!("{value}"),
            None => anyhow::bail!("{} is not set", switcher.setting_key()),
        },
        Command::Set { value } => switcher.set_active(&value)?,
        Command::Sync => {
            if switcher.sync()? {
                println!("now tracking {}", switcher.active().unwrap_or_default());
            }
        }
        Command::Promote { scheme } => {
            anyhow::ensure!(!scheme.is_empty(), "scheme must not be empty");
            switcher.promote(&scheme)?;
        }
        Command::Switch { index } => switcher.switch(Some(index))?,
        Command::Remove { index } => {
            if let Some(removed) = switcher.remove(Some(index))? {
                println!("removed {removed}");
            }
        }
        Command::InitConfig => unreachable!("handled before loading state"),
    }

    Ok(())
}

// ───────────────────────────────────────── picker ───────────

async fn run_picker(
    mode: PickerMode,
    switcher: &mut SchemeSwitcher<FileSettings>,
    config: AppConfig,
) -> Result<()> {
    let mut state = PickerState::new(mode, config);
    state.refresh(switcher);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stderr(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr()))?;

    let result = event_loop(&mut terminal, &mut state, switcher).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut PickerState,
    switcher: &mut SchemeSwitcher<FileSettings>,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(250));

    while !state.should_quit {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area(), state.entries.len());
            frame.render_stateful_widget(PickerWidget, layout.picker_area, state);

            let status = match &state.status_message {
                Some(msg) => Paragraph::new(msg.as_str()).style(Theme::error_style()),
                None => Paragraph::new(state.config.status_bar_hint(state.mode.confirm_verb()))
                    .style(Theme::status_bar_style()),
            };
            frame.render_widget(status, layout.status_area);
        })?;

        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            AppEvent::Key(key) => handler::handle_key(state, switcher, key),
            AppEvent::Resize => {}
            AppEvent::Tick => {
                // Pick up edits made to the preferences file by other programs.
                match switcher.settings_mut().reload() {
                    Ok(changed) if changed.is_empty() => {}
                    Ok(_) => state.refresh(switcher),
                    Err(e) => tracing::warn!("{e}"),
                }
            }
        }
    }

    Ok(())
}
