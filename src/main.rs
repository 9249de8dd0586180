//! Memoization - turn any passage into flashcards and review them
//!
//! Paste some text, let a language model write question/answer cards for it,
//! then walk through them in the terminal marking each one remembered or forgot.

mod card;
mod config;
mod generate;
mod logging;
mod models;
mod presets;
mod session;
mod ui;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{info, warn};

use config::Config;
use generate::{parse_reply, ChatClient};
use ui::App;

// ══════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ══════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "memo")]
#[command(author, version, about = "Generate flashcards from any text and review them", long_about = None)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs here instead of the default location
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Prefill the editor with the contents of this file
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Review a saved model reply instead of generating new cards
    #[arg(short, long, conflicts_with = "parse")]
    reply: Option<PathBuf>,

    /// Print the cards a saved model reply parses into, then exit
    #[arg(long)]
    parse: Option<PathBuf>,
}

// ══════════════════════════════════════════════════════════════════════════
// Main Entry Point
// ══════════════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    let args = Args::parse();

    // Handle parse-only mode
    if let Some(path) = args.parse {
        let items = parse_reply(&read_file(&path)?);
        println!("✓ Parsed {} cards from {}", items.len(), path.display());
        for (i, item) in items.iter().enumerate() {
            println!("\n{}. {}\n   {}", i + 1, item.question, item.answer);
        }
        return Ok(());
    }

    let log_path = args.log_file.unwrap_or_else(logging::default_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }
    info!("memo v{} starting", env!("CARGO_PKG_VERSION"));

    // Load config
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "using default config");
        Config::default()
    });

    let generator = ChatClient::from_env(config.generation.clone())
        .context("Failed to set up the generation client")?;
    if !generator.enabled() {
        warn!("no API key in the environment; generation will fail until one is set");
    }

    let mut app = App::new(config, config_path, Arc::new(generator));

    if let Some(path) = args.source {
        app.draft = read_file(&path)?;
    }
    if let Some(path) = args.reply {
        let items = parse_reply(&read_file(&path)?);
        info!(count = items.len(), path = %path.display(), "loaded saved reply");
        app.load_items(items);
    }

    // Run TUI
    run_tui(app)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
        return Err(err);
    }

    info!("memo exiting");
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| app.render(frame))?;
        app.handle_events()?;
    }
    Ok(())
}
