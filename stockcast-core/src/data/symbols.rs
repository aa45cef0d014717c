//! Symbol catalog — the list of tickers offered by the query panel.
//!
//! Sources, in the order the binaries try them:
//! 1. an explicit TOML catalog file (`[catalog] symbols = [...]`),
//! 2. the remote S&P 500 constituents list (one symbol per line),
//! 3. a built-in default so the dashboard still opens offline.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::provider::DataError;

/// Remote text resource with one ticker per line.
pub const DEFAULT_SYMBOL_LIST_URL: &str =
    "https://raw.githubusercontent.com/dataprofessor/s-and-p-500-companies/master/data/constituents_symbols.txt";

/// Where the catalog came from, for the status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogSource {
    ConfigFile,
    Remote,
    Builtin,
}

impl CatalogSource {
    pub fn label(self) -> &'static str {
        match self {
            CatalogSource::ConfigFile => "config file",
            CatalogSource::Remote => "remote list",
            CatalogSource::Builtin => "built-in",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    catalog: CatalogSection,
}

#[derive(Debug, Deserialize)]
struct CatalogSection {
    symbols: Vec<String>,
}

/// The selectable ticker symbols, sorted and deduplicated.
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    symbols: Vec<String>,
    source: CatalogSource,
}

impl SymbolCatalog {
    /// Load from a TOML catalog file.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Catalog(format!("read {}: {e}", path.display())))?;
        let file: CatalogFile =
            toml::from_str(&content).map_err(|e| DataError::Catalog(format!("parse TOML: {e}")))?;
        Ok(Self::from_symbols(file.catalog.symbols, CatalogSource::ConfigFile))
    }

    /// Fetch the remote one-symbol-per-line list.
    pub fn fetch_remote() -> Result<Self, DataError> {
        Self::fetch_remote_from(DEFAULT_SYMBOL_LIST_URL)
    }

    pub fn fetch_remote_from(url: &str) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| DataError::Catalog(format!("build client: {e}")))?;

        let body = client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?
            .error_for_status()
            .map_err(|e| DataError::Catalog(format!("fetch symbol list: {e}")))?
            .text()
            .map_err(|e| DataError::Catalog(format!("read symbol list: {e}")))?;

        let symbols = parse_symbol_list(&body);
        if symbols.is_empty() {
            return Err(DataError::Catalog("remote symbol list was empty".into()));
        }
        Ok(Self::from_symbols(symbols, CatalogSource::Remote))
    }

    /// Compiled-in fallback, so the picker is never empty.
    pub fn builtin() -> Self {
        let symbols = [
            "AAPL", "ABBV", "ABT", "ADBE", "AMZN", "AVGO", "AXP", "BAC", "BLK", "C", "COP",
            "COST", "CRM", "CVX", "DIA", "EOG", "GOOGL", "GS", "HD", "JNJ", "JPM", "KO", "LLY",
            "MCD", "META", "MRK", "MS", "MSFT", "NKE", "NVDA", "ORCL", "PEP", "PFE", "PG", "QQQ",
            "SBUX", "SCHW", "SLB", "SPY", "TGT", "TMO", "UNH", "V", "VLO", "WFC", "WMT", "XOM",
        ];
        Self::from_symbols(
            symbols.iter().map(|s| s.to_string()).collect(),
            CatalogSource::Builtin,
        )
    }

    fn from_symbols(mut symbols: Vec<String>, source: CatalogSource) -> Self {
        symbols.sort();
        symbols.dedup();
        Self { symbols, source }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.binary_search_by(|s| s.as_str().cmp(symbol)).is_ok()
    }

    /// Case-insensitive prefix filter for the picker.
    pub fn filter(&self, prefix: &str) -> Vec<&str> {
        let needle = prefix.to_ascii_uppercase();
        self.symbols
            .iter()
            .filter(|s| s.to_ascii_uppercase().starts_with(&needle))
            .map(|s| s.as_str())
            .collect()
    }
}

/// Parse a one-symbol-per-line text body, tolerating a header line and blanks.
fn parse_symbol_list(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            // The published list leads with a "Symbol" header.
            !line.eq_ignore_ascii_case("symbol")
        })
        .filter(|line| line.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-'))
        .map(|line| line.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_header_and_blanks() {
        let body = "Symbol\nAAPL\n\nmsft\nBRK.B\n";
        let symbols = parse_symbol_list(body);
        assert_eq!(symbols, vec!["AAPL", "MSFT", "BRK.B"]);
    }

    #[test]
    fn rejects_junk_lines() {
        let body = "AAPL\n<html>\nMSFT\n";
        let symbols = parse_symbol_list(body);
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn builtin_is_sorted_and_nonempty() {
        let catalog = SymbolCatalog::builtin();
        assert!(catalog.len() > 30);
        assert_eq!(catalog.source(), CatalogSource::Builtin);
        assert!(catalog.contains("AAPL"));
        assert!(catalog.contains("SPY"));
        assert!(!catalog.contains("ZZZZZZ"));
        let mut sorted = catalog.symbols().to_vec();
        sorted.sort();
        assert_eq!(sorted, catalog.symbols());
    }

    #[test]
    fn prefix_filter() {
        let catalog = SymbolCatalog::builtin();
        let hits = catalog.filter("a");
        assert!(hits.contains(&"AAPL"));
        assert!(hits.iter().all(|s| s.starts_with('A')));
        assert!(catalog.filter("").len() == catalog.len());
    }

    #[test]
    fn toml_catalog_roundtrip() {
        let toml_str = "[catalog]\nsymbols = [\"SPY\", \"AAPL\", \"SPY\"]\n";
        let file: CatalogFile = toml::from_str(toml_str).unwrap();
        let catalog = SymbolCatalog::from_symbols(file.catalog.symbols, CatalogSource::ConfigFile);
        // Deduplicated and sorted.
        assert_eq!(catalog.symbols(), &["AAPL".to_string(), "SPY".to_string()]);
        assert_eq!(catalog.source().label(), "config file");
    }
}
