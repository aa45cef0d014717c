//! Background worker thread — fetching and fitting run here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Every
//! pipeline response echoes the generation of the run that produced it so
//! the main thread can drop results of superseded runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use stockcast_core::data::{
    DataError, QuoteProvider, SymbolCatalog, SyntheticProvider, YahooProvider,
};
use stockcast_core::domain::{CompanyProfile, ForecastSeries, PriceSeries};
use stockcast_core::forecast;
use stockcast_core::overlay::VolatilityBands;

use crate::app::QueryParams;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Load the symbol catalog (remote list, builtin fallback).
    LoadCatalog { offline: bool },
    /// Run the whole pipeline: fetch bars + profile, then fit + extend.
    RunPipeline {
        generation: u64,
        params: QueryParams,
        synthetic: bool,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    CatalogReady {
        catalog: SymbolCatalog,
    },
    /// Raw data arrived — rendered before the model fit finishes.
    QuoteReady {
        generation: u64,
        profile: Box<CompanyProfile>,
        series: Box<PriceSeries>,
        bands: Box<VolatilityBands>,
    },
    ForecastReady {
        generation: u64,
        forecast: Box<ForecastSeries>,
    },
    PipelineError {
        generation: u64,
        category: ErrorKind,
        message: String,
    },
}

/// Coarse error category for the TUI's error history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Data,
    Forecast,
}

fn classify(err: &DataError) -> ErrorKind {
    match err {
        DataError::NetworkUnreachable(_) | DataError::Http { .. } => ErrorKind::Network,
        _ => ErrorKind::Data,
    }
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    cancel: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("stockcast-worker".into())
        .spawn(move || {
            worker_loop(rx, tx, cancel);
        })
        .expect("failed to spawn worker thread")
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>, cancel: Arc<AtomicBool>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => {
                cancel.store(false, Ordering::Relaxed);
                handle_command(cmd, &tx, &cancel);
            }
        }
    }
}

fn handle_command(cmd: WorkerCommand, tx: &Sender<WorkerResponse>, cancel: &Arc<AtomicBool>) {
    match cmd {
        WorkerCommand::LoadCatalog { offline } => {
            let catalog = if offline {
                SymbolCatalog::builtin()
            } else {
                SymbolCatalog::fetch_remote().unwrap_or_else(|_| SymbolCatalog::builtin())
            };
            let _ = tx.send(WorkerResponse::CatalogReady { catalog });
        }
        WorkerCommand::RunPipeline {
            generation,
            params,
            synthetic,
        } => {
            if synthetic {
                run_pipeline(generation, &params, &SyntheticProvider::default(), tx, cancel);
            } else {
                run_pipeline(generation, &params, &YahooProvider::new(), tx, cancel);
            }
        }
        WorkerCommand::Shutdown => {} // handled in loop
    }
}

/// One pipeline run: fetch → report → fit → extend → report.
///
/// A failure at any stage sends a single `PipelineError` and aborts the
/// rest of the run — no partial forecast is produced.
fn run_pipeline(
    generation: u64,
    params: &QueryParams,
    provider: &dyn QuoteProvider,
    tx: &Sender<WorkerResponse>,
    cancel: &Arc<AtomicBool>,
) {
    let series = match provider.fetch_bars(&params.symbol, params.start, params.end) {
        Ok(series) => series,
        Err(e) => {
            let _ = tx.send(WorkerResponse::PipelineError {
                generation,
                category: classify(&e),
                message: e.to_string(),
            });
            return;
        }
    };

    let profile = match provider.fetch_profile(&params.symbol) {
        Ok(profile) => profile,
        Err(e) => {
            let _ = tx.send(WorkerResponse::PipelineError {
                generation,
                category: classify(&e),
                message: e.to_string(),
            });
            return;
        }
    };

    let bands = VolatilityBands::standard(&series);
    let _ = tx.send(WorkerResponse::QuoteReady {
        generation,
        profile: Box::new(profile),
        series: Box::new(series.clone()),
        bands: Box::new(bands),
    });

    if cancel.load(Ordering::Relaxed) {
        return;
    }

    match forecast::forecast(&series, params.horizon_years) {
        Ok(forecast) => {
            let _ = tx.send(WorkerResponse::ForecastReady {
                generation,
                forecast: Box::new(forecast),
            });
        }
        Err(e) => {
            let _ = tx.send(WorkerResponse::PipelineError {
                generation,
                category: ErrorKind::Forecast,
                message: e.to_string(),
            });
        }
    }
}
