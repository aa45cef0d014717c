//! Stockcast TUI — six-panel terminal dashboard with vim-style navigation.
//!
//! Panels:
//! 1. Query — symbol picker, date range, horizon slider, run action
//! 2. Company — profile block and raw price table
//! 3. Chart — close price with volatility-band overlay
//! 4. Forecast — forecast line with uncertainty band, tail table
//! 5. Components — trend/weekly/yearly decomposition
//! 6. Help — keyboard shortcuts
//!
//! Pass `--synthetic` to run against generated data with no network.

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::{AppState, ErrorCategory};
use crate::worker::{ErrorKind, WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let synthetic = std::env::args().any(|a| a == "--synthetic");

    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockcast")
        .join("state.json");

    // Load persisted state
    let persisted = persistence::load(&state_path);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));

    // Spawn worker
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, cancel.clone());

    // Build app state
    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        cancel.clone(),
        state_path.clone(),
        synthetic,
    );

    // Apply persisted state, then ask the worker for the symbol catalog.
    persistence::apply(&mut app, persisted);
    let _ = cmd_tx.send(WorkerCommand::LoadCatalog { offline: synthetic });

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    let _ = persistence::save(&state_path, &persisted);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::CatalogReady { catalog } => {
            app.set_status(format!(
                "Symbol catalog loaded: {} tickers ({})",
                catalog.len(),
                catalog.source().label()
            ));
            app.query.catalog = catalog;
        }
        WorkerResponse::QuoteReady {
            generation,
            profile,
            series,
            bands,
        } => {
            if generation != app.generation {
                return; // superseded run
            }
            app.set_status(format!(
                "{}: {} trading days loaded, fitting model...",
                profile.name_display(),
                series.len()
            ));
            app.results.profile = Some(*profile);
            app.results.series = Some(*series);
            app.results.bands = Some(*bands);
            app.results.table_scroll = 0;
        }
        WorkerResponse::ForecastReady {
            generation,
            forecast,
        } => {
            if generation != app.generation {
                return;
            }
            app.run_in_progress = false;
            app.set_status(format!(
                "Forecast ready: {} days, through {}",
                forecast.future().len(),
                forecast
                    .last_date()
                    .map(|d| d.to_string())
                    .unwrap_or_default()
            ));
            app.results.forecast = Some(*forecast);
        }
        WorkerResponse::PipelineError {
            generation,
            category,
            message,
        } => {
            if generation != app.generation {
                return;
            }
            app.run_in_progress = false;
            let cat = match category {
                ErrorKind::Network => ErrorCategory::Network,
                ErrorKind::Data => ErrorCategory::Data,
                ErrorKind::Forecast => ErrorCategory::Forecast,
            };
            app.push_error(cat, message, app.query.symbol.clone());
        }
    }
}
