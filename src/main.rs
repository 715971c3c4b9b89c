mod ui;

use std::io;
use std::process::ExitCode;
use std::sync::OnceLock;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use tracing::{error, info, warn};

use pacpick::closure::compute_closure;
use pacpick::error::{Error, Result};
use pacpick::keep::{self, KeepList};
use pacpick::pacman::PacmanDb;
use pacpick::select::{SelectionEvent, SelectionState};
use pacpick::types::UpgradeCandidate;
use pacpick::upgrades::{collect_candidates, sort_candidates};

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(selected) => {
            for name in &selected {
                print!("{name} ");
            }
            if !selected.is_empty() {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, code = err.exit_code(), "aborting");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run() -> Result<Vec<String>> {
    let db = PacmanDb::open()?;
    info!(
        repos = db.repos().len(),
        installed = db.installed().len(),
        "database snapshot taken"
    );

    let keep_path = keep::default_path()?;
    let keep_list = KeepList::load(&keep_path)?;
    info!(
        path = %keep_path.display(),
        names = keep_list.names().len(),
        "keep list loaded"
    );

    let outcome = select_upgrades(&db, &keep_list);

    // Rewritten on every shutdown that got as far as reading it, so the
    // seeded defaults land on disk even when the run aborts later.
    if let Err(e) = keep_list.save() {
        warn!(error = %e, "failed to rewrite the keep list");
    }
    outcome
}

fn select_upgrades(db: &PacmanDb, keep_list: &KeepList) -> Result<Vec<String>> {
    let protected = compute_closure(keep_list.names(), db);
    for name in &protected.unfound {
        warn!(name = %name, "keep-list package not found in the local database");
        eprintln!("warning: keep-list package '{name}' was not found in the local database");
    }
    info!(members = protected.members.len(), "dependency closure computed");

    let mut candidates = collect_candidates(
        db.installed(),
        |record| db.best_available(record).cloned(),
        &protected.members,
    );
    if candidates.is_empty() {
        return Err(Error::NoCandidates);
    }
    sort_candidates(&mut candidates);
    info!(count = candidates.len(), "upgrade candidates ready");

    run_tui(candidates)
}

fn run_tui(candidates: Vec<UpgradeCandidate>) -> Result<Vec<String>> {
    enable_raw_mode().map_err(Error::Terminal)?;
    io::stdout()
        .execute(EnterAlternateScreen)
        .map_err(Error::Terminal)?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(io::stdout())).map_err(Error::Terminal)?;

    let height = terminal.size().map_or(24, |size| size.height as usize);
    let mut state = SelectionState::new(candidates, height);

    let outcome = event_loop(&mut terminal, &mut state);

    // Restore the terminal before surfacing any failure from the loop.
    if let Err(e) = disable_raw_mode() {
        warn!(error = %e, "failed to disable raw mode");
    }
    if let Err(e) = io::stdout().execute(LeaveAlternateScreen) {
        warn!(error = %e, "failed to leave the alternate screen");
    }

    outcome.map(|()| state.into_selected_names())
}

/// Render, block for exactly one event, apply exactly one transition.
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut SelectionState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, state)).map_err(Error::Terminal)?;

        match event::read().map_err(Error::EventSource)? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        state.apply(SelectionEvent::PageDown);
                    }
                    KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        state.apply(SelectionEvent::PageUp);
                    }
                    KeyCode::Down | KeyCode::Char('j') => state.apply(SelectionEvent::MoveDown),
                    KeyCode::Up | KeyCode::Char('k') => state.apply(SelectionEvent::MoveUp),
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        state.apply(SelectionEvent::ToggleSelect);
                    }
                    _ => {}
                }
            }
            Event::Resize(_, rows) => state.apply(SelectionEvent::Resize(rows as usize)),
            _ => {}
        }
    }
    Ok(())
}

fn init_logging() {
    let Some(dir) = keep::logs_dir() else {
        return;
    };
    let path = dir.join("pacpick.log");
    // Best effort only: the TUI owns the terminal, so there is no stderr
    // fallback worth having.
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    else {
        return;
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .init();
    LOG_GUARD.set(guard).ok();
    info!(path = %path.display(), "logging initialized");
}
