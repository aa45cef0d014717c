//! App state persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay, Panel};

/// Serializable subset of app state that persists across restarts.
///
/// Only query inputs and navigation — fetched data and forecasts are
/// re-created fresh per run, never stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub symbol: String,
    pub start_input: String,
    pub end_input: String,
    pub horizon_years: u32,
    pub active_panel: Panel,
    pub welcome_dismissed: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            start_input: "2015-01-01".to_string(),
            end_input: crate::app::default_end_date()
                .format("%Y-%m-%d")
                .to_string(),
            horizon_years: 1,
            active_panel: Panel::Query,
            welcome_dismissed: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if the file is missing
/// or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        symbol: app.query.symbol.clone(),
        start_input: app.query.start_input.clone(),
        end_input: app.query.end_input.clone(),
        horizon_years: app.query.horizon_years,
        active_panel: app.active_panel,
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.query.symbol = state.symbol;
    app.query.start_input = state.start_input;
    app.query.end_input = state.end_input;
    app.query.horizon_years = state.horizon_years.clamp(1, 4);
    app.active_panel = state.active_panel;
    if state.welcome_dismissed {
        app.overlay = Overlay::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = std::env::temp_dir().join("stockcast_persist_test");
        let path = dir.join("state.json");

        let state = PersistedState {
            symbol: "MSFT".into(),
            start_input: "2018-06-01".into(),
            end_input: "2023-06-01".into(),
            horizon_years: 3,
            active_panel: Panel::Forecast,
            welcome_dismissed: true,
        };

        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.symbol, "MSFT");
        assert_eq!(loaded.horizon_years, 3);
        assert_eq!(loaded.active_panel, Panel::Forecast);
        assert!(loaded.welcome_dismissed);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded.symbol, "AAPL");
        assert!(!loaded.welcome_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = std::env::temp_dir().join("stockcast_persist_corrupt");
        let path = dir.join("state.json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.symbol, "AAPL");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn out_of_range_horizon_clamped_on_apply() {
        let (tx, _) = std::sync::mpsc::channel();
        let (_, rx) = std::sync::mpsc::channel();
        let mut app = AppState::new(
            tx,
            rx,
            std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false)),
            std::path::PathBuf::from("/tmp/stockcast-apply-test.json"),
            true,
        );

        let state = PersistedState {
            horizon_years: 99,
            ..Default::default()
        };
        apply(&mut app, state);
        assert_eq!(app.query.horizon_years, 4);
    }
}
