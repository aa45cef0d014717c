//! Quote provider trait and structured error types.
//!
//! The trait abstracts over data sources (Yahoo Finance live, synthetic
//! offline) so the pipeline and the TUI worker can swap implementations and
//! tests can run without a network.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{CompanyProfile, PriceSeries, SeriesError};

/// Structured errors for data operations.
///
/// Nothing in the core catches these — they propagate raw to the CLI
/// (anyhow exit) or the TUI (status bar + error history).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("no observations for {symbol} in {start}..={end}")]
    EmptyRange {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("HTTP {status} from provider for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("symbol catalog unavailable: {0}")]
    Catalog(String),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Trait for market-data sources.
///
/// One fetch is one request — no retry loop, no caching. A failed call
/// surfaces the raw provider error to the caller.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over an inclusive date range.
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError>;

    /// Fetch the descriptive metadata block for a symbol.
    fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, DataError>;
}

/// Reject inverted ranges before any I/O happens.
pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), DataError> {
    if start > end {
        return Err(DataError::InvalidRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_range_rejected() {
        let start = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(matches!(
            check_range(start, end),
            Err(DataError::InvalidRange { .. })
        ));
        assert!(check_range(end, start).is_ok());
        assert!(check_range(start, start).is_ok());
    }
}
