//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels;
//! each pipeline run carries a generation counter so responses from a
//! superseded run are dropped instead of clobbering newer state.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use stockcast_core::data::SymbolCatalog;
use stockcast_core::domain::{CompanyProfile, ForecastSeries, PriceSeries};
use stockcast_core::forecast::{MAX_HORIZON_YEARS, MIN_HORIZON_YEARS};
use stockcast_core::overlay::VolatilityBands;

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Query,
    Company,
    Chart,
    Forecast,
    Components,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Query => 0,
            Panel::Company => 1,
            Panel::Chart => 2,
            Panel::Forecast => 3,
            Panel::Components => 4,
            Panel::Help => 5,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Query),
            1 => Some(Panel::Company),
            2 => Some(Panel::Chart),
            3 => Some(Panel::Forecast),
            4 => Some(Panel::Components),
            5 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Query => "Query",
            Panel::Company => "Company",
            Panel::Chart => "Chart",
            Panel::Forecast => "Forecast",
            Panel::Components => "Components",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 6).unwrap()
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 5) % 6).unwrap()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for the history overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Forecast,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Forecast => "FCST",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Active overlay, drawn above the panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    SymbolPicker,
    ErrorHistory,
}

/// Rows of the query panel, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    Symbol,
    StartDate,
    EndDate,
    Horizon,
    Run,
}

impl QueryField {
    pub const ALL: [QueryField; 5] = [
        QueryField::Symbol,
        QueryField::StartDate,
        QueryField::EndDate,
        QueryField::Horizon,
        QueryField::Run,
    ];

    pub fn row(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap()
    }
}

/// The validated parameters of one pipeline run.
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizon_years: u32,
}

/// Query panel state — the input collector.
#[derive(Debug)]
pub struct QueryState {
    pub catalog: SymbolCatalog,
    pub symbol: String,
    pub start_input: String,
    pub end_input: String,
    pub horizon_years: u32,
    pub cursor: usize,
    /// Filter text typed into the symbol picker overlay.
    pub picker_input: String,
    pub picker_cursor: usize,
}

impl QueryState {
    pub fn new(catalog: SymbolCatalog) -> Self {
        let end = default_end_date();
        Self {
            catalog,
            symbol: "AAPL".to_string(),
            start_input: "2015-01-01".to_string(),
            end_input: end.format("%Y-%m-%d").to_string(),
            horizon_years: MIN_HORIZON_YEARS,
            cursor: 0,
            picker_input: String::new(),
            picker_cursor: 0,
        }
    }

    pub fn field(&self) -> QueryField {
        QueryField::ALL[self.cursor.min(QueryField::ALL.len() - 1)]
    }

    pub fn bump_horizon(&mut self, delta: i32) {
        let next = self.horizon_years as i64 + delta as i64;
        self.horizon_years = next.clamp(MIN_HORIZON_YEARS as i64, MAX_HORIZON_YEARS as i64) as u32;
    }

    /// Validate the widget values into run parameters.
    pub fn parse(&self) -> Result<QueryParams, String> {
        let symbol = self.symbol.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err("no symbol selected".into());
        }
        let start = NaiveDate::parse_from_str(self.start_input.trim(), "%Y-%m-%d")
            .map_err(|_| format!("bad start date '{}' (want YYYY-MM-DD)", self.start_input))?;
        let end = NaiveDate::parse_from_str(self.end_input.trim(), "%Y-%m-%d")
            .map_err(|_| format!("bad end date '{}' (want YYYY-MM-DD)", self.end_input))?;
        if start > end {
            return Err(format!("start {start} is after end {end}"));
        }
        Ok(QueryParams {
            symbol,
            start,
            end,
            horizon_years: self
                .horizon_years
                .clamp(MIN_HORIZON_YEARS, MAX_HORIZON_YEARS),
        })
    }
}

/// Everything the last successful run produced.
#[derive(Debug, Default)]
pub struct ResultState {
    pub profile: Option<CompanyProfile>,
    pub series: Option<PriceSeries>,
    pub bands: Option<VolatilityBands>,
    pub forecast: Option<ForecastSeries>,
    pub table_scroll: usize,
}

impl ResultState {
    /// Discard everything from the previous run.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub active_panel: Panel,
    pub overlay: Overlay,

    pub query: QueryState,
    pub results: ResultState,

    pub run_in_progress: bool,
    pub generation: u64,
    pub synthetic: bool,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,

    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    pub cancel: Arc<AtomicBool>,
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        cancel: Arc<AtomicBool>,
        state_path: PathBuf,
        synthetic: bool,
    ) -> Self {
        Self {
            running: true,
            active_panel: Panel::Query,
            overlay: Overlay::Welcome,
            query: QueryState::new(SymbolCatalog::builtin()),
            results: ResultState::default(),
            run_in_progress: false,
            generation: 0,
            synthetic,
            status_message: None,
            error_history: VecDeque::new(),
            error_scroll: 0,
            worker_tx,
            worker_rx,
            cancel,
            state_path,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }

    pub fn push_error(
        &mut self,
        category: ErrorCategory,
        message: impl Into<String>,
        context: impl Into<String>,
    ) {
        let message = message.into();
        self.set_error(message.clone());
        self.error_history.push_front(ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message,
            context: context.into(),
        });
        self.error_history.truncate(50);
    }

    /// Kick off a fresh pipeline run; results of any in-flight run are stale.
    pub fn start_run(&mut self) {
        match self.query.parse() {
            Ok(params) => {
                self.generation += 1;
                self.results.clear();
                self.run_in_progress = true;
                let _ = self.worker_tx.send(WorkerCommand::RunPipeline {
                    generation: self.generation,
                    params,
                    synthetic: self.synthetic,
                });
                self.set_status(format!("Fetching {}...", self.query.symbol));
            }
            Err(msg) => self.push_error(ErrorCategory::Data, msg, "query validation"),
        }
    }
}

/// Yesterday in local time — the last date with a complete trading day.
pub fn default_end_date() -> NaiveDate {
    chrono::Local::now().date_naive() - chrono::Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_state() -> AppState {
        // Worker ends are dropped; sends are fire-and-forget so that's fine.
        let (tx, _) = std::sync::mpsc::channel();
        let (_, rx) = std::sync::mpsc::channel::<WorkerResponse>();
        AppState::new(
            tx,
            rx,
            Arc::new(AtomicBool::new(false)),
            PathBuf::from("/tmp/stockcast-test-state.json"),
            true,
        )
    }

    #[test]
    fn panel_navigation_cycles() {
        assert_eq!(Panel::Query.next(), Panel::Company);
        assert_eq!(Panel::Help.next(), Panel::Query);
        assert_eq!(Panel::Query.prev(), Panel::Help);
        for i in 0..6 {
            assert_eq!(Panel::from_index(i).unwrap().index(), i);
        }
        assert!(Panel::from_index(6).is_none());
    }

    #[test]
    fn horizon_clamps_to_bounds() {
        let mut query = QueryState::new(SymbolCatalog::builtin());
        assert_eq!(query.horizon_years, 1);
        query.bump_horizon(-1);
        assert_eq!(query.horizon_years, 1);
        for _ in 0..10 {
            query.bump_horizon(1);
        }
        assert_eq!(query.horizon_years, 4);
    }

    #[test]
    fn query_parse_validates() {
        let mut query = QueryState::new(SymbolCatalog::builtin());
        query.symbol = "aapl".into();
        query.start_input = "2020-01-01".into();
        query.end_input = "2020-12-31".into();
        let params = query.parse().unwrap();
        assert_eq!(params.symbol, "AAPL");
        assert_eq!(params.start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());

        query.end_input = "2019-01-01".into();
        assert!(query.parse().unwrap_err().contains("after end"));

        query.end_input = "not-a-date".into();
        assert!(query.parse().unwrap_err().contains("bad end date"));
    }

    #[test]
    fn bad_query_pushes_error_instead_of_running() {
        let mut app = dummy_state();
        app.query.start_input = "garbage".into();
        app.start_run();
        assert!(!app.run_in_progress);
        assert_eq!(app.generation, 0);
        assert_eq!(app.error_history.len(), 1);
    }

    #[test]
    fn start_run_bumps_generation_and_clears_results() {
        let mut app = dummy_state();
        app.results.table_scroll = 17;
        app.start_run();
        assert!(app.run_in_progress);
        assert_eq!(app.generation, 1);
        assert_eq!(app.results.table_scroll, 0);
    }
}
