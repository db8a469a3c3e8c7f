use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use tokio::time::{Duration, interval};
use tracing::{error, info};

use casebook::app::{App, handle_action, trigger_action};
use casebook::config::Config;
use casebook::{Catalog, editor, logging, ui};

/// Browse test cases and step through their execution.
#[derive(Debug, Parser)]
#[command(name = "casebook", version)]
struct Args {
    /// Workspace root holding casebook.toml and catalog files
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Config file to use instead of <workspace>/casebook.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Open this test case directly, e.g. TC-001
    #[arg(long = "case")]
    case_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let workspace = match args.workspace {
        Some(dir) => dir,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(&workspace)?,
    };

    let (_log_guard, log_path) = logging::init(&config.logging, &workspace)?;
    info!(workspace = %workspace.display(), log = %log_path.display(), "casebook starting");

    let catalog = load_catalog(&workspace, &config)?;
    let mut app = App::new(workspace, catalog);

    if let Some(id) = &args.case_id
        && !app.open_case(id)
    {
        anyhow::bail!("test case '{}' not found", id);
    }

    // Setup terminal
    terminal::enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &config).await;

    // Teardown terminal
    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    if let Err(e) = &result {
        error!(error = %e, "casebook exited with error");
    }
    result
}

fn load_catalog(workspace: &std::path::Path, config: &Config) -> Result<Catalog> {
    Catalog::load(
        workspace,
        &config.catalog.paths,
        config.catalog.include_builtin,
    )
    .context("failed to load test case catalog")
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &Config,
) -> Result<()> {
    let mut tick = interval(Duration::from_millis(100));
    let mut event_stream = EventStream::new();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    None => break,
                    Some(Err(e)) => return Err(e.into()),
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = trigger_action(key, app.screen, &app.mode) {
                            handle_action(app, action);
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }

            _ = tick.tick() => {
                app.notifier.prune_expired();
            }
        }

        if let Some((path, case_id)) = app.pending_editor.take() {
            match editor::open(terminal, config.editor.command.as_deref(), path, &case_id) {
                Ok(()) => match load_catalog(&app.workspace, config) {
                    Ok(catalog) => {
                        app.catalog = catalog;
                        app.refilter();
                        app.notifier.info("Catalog reloaded", 2);
                    }
                    Err(e) => app.notifier.error(format!("{:#}", e)),
                },
                Err(e) => app.notifier.error(e.to_string()),
            }
        }

        if let Some(text) = app.pending_copy.take() {
            match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                Ok(()) => app.notifier.info(format!("Copied {}", text), 2),
                Err(e) => app.notifier.error(format!("Clipboard unavailable: {}", e)),
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
