//! Keyboard input dispatch — global keys → overlays → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Panel, QueryField};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::SymbolPicker => {
            handle_picker_overlay(app, key);
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Keys typed into a date field take priority over global bindings
    //    (the field text can contain digits that collide with panel keys).
    if app.active_panel == Panel::Query && date_field_consumes(app, key) {
        return;
    }

    // 3. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Query; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Company; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::Chart; return; }
        KeyCode::Char('4') => { app.active_panel = Panel::Forecast; return; }
        KeyCode::Char('5') => { app.active_panel = Panel::Components; return; }
        KeyCode::Char('6') => { app.active_panel = Panel::Help; return; }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('r') => {
            if !app.run_in_progress {
                app.start_run();
            }
            return;
        }
        _ => {}
    }

    // 4. Panel-specific keys.
    match app.active_panel {
        Panel::Query => handle_query_key(app, key),
        Panel::Company => handle_company_key(app, key),
        Panel::Chart | Panel::Forecast | Panel::Components => {} // display only
        Panel::Help => handle_help_key(app, key),
    }
}

/// Digits, dashes, and backspace edit the date field under the cursor.
fn date_field_consumes(app: &mut AppState, key: KeyEvent) -> bool {
    let buffer = match app.query.field() {
        QueryField::StartDate => &mut app.query.start_input,
        QueryField::EndDate => &mut app.query.end_input,
        _ => return false,
    };

    match key.code {
        KeyCode::Char(c @ ('0'..='9' | '-')) => {
            if buffer.len() < 10 {
                buffer.push(c);
            }
            true
        }
        KeyCode::Backspace => {
            buffer.pop();
            true
        }
        _ => false,
    }
}

fn handle_query_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.query.cursor + 1 < QueryField::ALL.len() {
                app.query.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.query.cursor = app.query.cursor.saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left => match app.query.field() {
            QueryField::Symbol => step_symbol(app, -1),
            QueryField::Horizon => app.query.bump_horizon(-1),
            _ => {}
        },
        KeyCode::Char('l') | KeyCode::Right => match app.query.field() {
            QueryField::Symbol => step_symbol(app, 1),
            QueryField::Horizon => app.query.bump_horizon(1),
            _ => {}
        },
        KeyCode::Char('s') => {
            app.overlay = Overlay::SymbolPicker;
            app.query.picker_input.clear();
            app.query.picker_cursor = 0;
        }
        KeyCode::Enter => match app.query.field() {
            QueryField::Symbol => {
                app.overlay = Overlay::SymbolPicker;
                app.query.picker_input.clear();
                app.query.picker_cursor = 0;
            }
            _ => {
                if !app.run_in_progress {
                    app.start_run();
                }
            }
        },
        KeyCode::Esc => {
            if app.run_in_progress {
                app.cancel
                    .store(true, std::sync::atomic::Ordering::Relaxed);
                app.set_warning("Cancelling run...");
            }
        }
        _ => {}
    }
}

/// Move to the previous/next symbol in the catalog.
fn step_symbol(app: &mut AppState, direction: i64) {
    let symbols = app.query.catalog.symbols();
    if symbols.is_empty() {
        return;
    }
    let current = symbols
        .iter()
        .position(|s| *s == app.query.symbol)
        .unwrap_or(0);
    let next = (current as i64 + direction).rem_euclid(symbols.len() as i64) as usize;
    app.query.symbol = symbols[next].clone();
}

fn handle_picker_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.query.picker_input.clear();
        }
        KeyCode::Enter => {
            let matches = app.query.catalog.filter(&app.query.picker_input);
            let chosen = matches
                .get(app.query.picker_cursor.min(matches.len().saturating_sub(1)))
                .map(|s| s.to_string())
                .or_else(|| {
                    // No match — accept the typed text as a custom symbol.
                    let typed = app.query.picker_input.trim().to_ascii_uppercase();
                    (!typed.is_empty()).then_some(typed)
                });
            if let Some(symbol) = chosen {
                app.query.symbol = symbol;
            }
            app.overlay = Overlay::None;
            app.query.picker_input.clear();
        }
        KeyCode::Down => {
            let count = app.query.catalog.filter(&app.query.picker_input).len();
            if count > 0 && app.query.picker_cursor + 1 < count {
                app.query.picker_cursor += 1;
            }
        }
        KeyCode::Up => {
            app.query.picker_cursor = app.query.picker_cursor.saturating_sub(1);
        }
        KeyCode::Backspace => {
            app.query.picker_input.pop();
            app.query.picker_cursor = 0;
        }
        KeyCode::Char(c) if c.is_ascii_alphanumeric() || c == '.' || c == '-' => {
            app.query.picker_input.push(c.to_ascii_uppercase());
            app.query.picker_cursor = 0;
        }
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_company_key(app: &mut AppState, key: KeyEvent) {
    let row_count = app
        .results
        .series
        .as_ref()
        .map(|s| s.len())
        .unwrap_or(0);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if row_count > 0 && app.results.table_scroll + 1 < row_count {
                app.results.table_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.results.table_scroll = app.results.table_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => {
            app.results.table_scroll = 0;
        }
        KeyCode::Char('G') => {
            app.results.table_scroll = row_count.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_help_key(app: &mut AppState, key: KeyEvent) {
    if let KeyCode::Char('e') = key.code {
        app.overlay = Overlay::ErrorHistory;
        app.error_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::WorkerResponse;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    fn test_app() -> AppState {
        let (tx, _) = std::sync::mpsc::channel();
        let (_, rx) = std::sync::mpsc::channel::<WorkerResponse>();
        let mut app = AppState::new(
            tx,
            rx,
            Arc::new(AtomicBool::new(false)),
            PathBuf::from("/tmp/stockcast-input-test.json"),
            true,
        );
        app.overlay = Overlay::None;
        app
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn tab_cycles_panels() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Company);
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_panel, Panel::Query);
    }

    #[test]
    fn welcome_dismissed_by_any_key() {
        let mut app = test_app();
        app.overlay = Overlay::Welcome;
        handle_key(&mut app, press(KeyCode::Char('x')));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);
    }

    #[test]
    fn digits_edit_date_field_not_panels() {
        let mut app = test_app();
        app.query.cursor = QueryField::StartDate.row();
        app.query.start_input.clear();
        for c in "2020-01-02".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(app.query.start_input, "2020-01-02");
        // '2' keys did not switch panels.
        assert_eq!(app.active_panel, Panel::Query);

        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.query.start_input, "2020-01-0");
    }

    #[test]
    fn horizon_adjusts_with_h_l() {
        let mut app = test_app();
        app.query.cursor = QueryField::Horizon.row();
        handle_key(&mut app, press(KeyCode::Char('l')));
        assert_eq!(app.query.horizon_years, 2);
        handle_key(&mut app, press(KeyCode::Char('h')));
        handle_key(&mut app, press(KeyCode::Char('h')));
        assert_eq!(app.query.horizon_years, 1);
    }

    #[test]
    fn symbol_steps_through_catalog() {
        let mut app = test_app();
        app.query.cursor = QueryField::Symbol.row();
        let first = app.query.symbol.clone();
        handle_key(&mut app, press(KeyCode::Char('l')));
        assert_ne!(app.query.symbol, first);
        handle_key(&mut app, press(KeyCode::Char('h')));
        assert_eq!(app.query.symbol, first);
    }

    #[test]
    fn picker_accepts_typed_symbol() {
        let mut app = test_app();
        app.overlay = Overlay::SymbolPicker;
        for c in "TSLA".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        handle_key(&mut app, press(KeyCode::Enter));
        // TSLA is not in the builtin catalog, so the typed text wins.
        assert_eq!(app.query.symbol, "TSLA");
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn picker_prefix_selects_first_match() {
        let mut app = test_app();
        app.overlay = Overlay::SymbolPicker;
        handle_key(&mut app, press(KeyCode::Char('A')));
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.query.symbol.starts_with('A'));
    }

    #[test]
    fn run_from_run_row() {
        let mut app = test_app();
        app.query.cursor = QueryField::Run.row();
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.run_in_progress);
        assert_eq!(app.generation, 1);
    }
}
