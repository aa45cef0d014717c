//! PriceSeries — a validated, chronologically ordered run of daily bars.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::PriceBar;

/// Violations of the series invariants.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("series for {symbol} is empty")]
    Empty { symbol: String },

    #[error("dates out of order at row {index}: {prev} then {next}")]
    OutOfOrder {
        index: usize,
        prev: NaiveDate,
        next: NaiveDate,
    },

    #[error("date {date} outside requested range {start}..={end}")]
    OutOfRange {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Historical daily prices for one symbol over one query range.
///
/// Invariants, enforced at construction:
/// - at least one bar;
/// - dates strictly increasing (unique within the series);
/// - every date inside the `[start, end]` range of the query that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    start: NaiveDate,
    end: NaiveDate,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(
        symbol: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        bars: Vec<PriceBar>,
    ) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(SeriesError::Empty { symbol });
        }
        for (i, window) in bars.windows(2).enumerate() {
            if window[1].date <= window[0].date {
                return Err(SeriesError::OutOfOrder {
                    index: i + 1,
                    prev: window[0].date,
                    next: window[1].date,
                });
            }
        }
        for bar in &bars {
            if bar.date < start || bar.date > end {
                return Err(SeriesError::OutOfRange {
                    date: bar.date,
                    start,
                    end,
                });
            }
        }
        Ok(Self {
            symbol,
            start,
            end,
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// First observed date. The series is never empty.
    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    /// Last observed date.
    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    /// The close column, in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// The date column, in date order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: NaiveDate, close: f64) -> PriceBar {
        PriceBar {
            date,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
            adj_close: close,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn valid_series_accepted() {
        let bars = vec![bar(d(2020, 1, 2), 100.0), bar(d(2020, 1, 3), 101.0)];
        let series = PriceSeries::new("AAPL", d(2020, 1, 1), d(2020, 1, 31), bars).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), d(2020, 1, 2));
        assert_eq!(series.last_date(), d(2020, 1, 3));
        assert_eq!(series.closes(), vec![100.0, 101.0]);
    }

    #[test]
    fn empty_series_rejected() {
        let err = PriceSeries::new("AAPL", d(2020, 1, 1), d(2020, 1, 31), vec![]).unwrap_err();
        assert!(matches!(err, SeriesError::Empty { .. }));
    }

    #[test]
    fn unordered_dates_rejected() {
        let bars = vec![bar(d(2020, 1, 3), 100.0), bar(d(2020, 1, 2), 101.0)];
        let err = PriceSeries::new("AAPL", d(2020, 1, 1), d(2020, 1, 31), bars).unwrap_err();
        assert!(matches!(err, SeriesError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn duplicate_dates_rejected() {
        let bars = vec![bar(d(2020, 1, 2), 100.0), bar(d(2020, 1, 2), 101.0)];
        let err = PriceSeries::new("AAPL", d(2020, 1, 1), d(2020, 1, 31), bars).unwrap_err();
        assert!(matches!(err, SeriesError::OutOfOrder { .. }));
    }

    #[test]
    fn out_of_range_date_rejected() {
        let bars = vec![bar(d(2020, 2, 1), 100.0)];
        let err = PriceSeries::new("AAPL", d(2020, 1, 1), d(2020, 1, 31), bars).unwrap_err();
        assert!(matches!(err, SeriesError::OutOfRange { .. }));
    }

    #[test]
    fn single_row_range_boundary() {
        // start == end with one observation is valid; the forecaster is the
        // layer that rejects it as too short to fit.
        let bars = vec![bar(d(2020, 1, 2), 100.0)];
        let series = PriceSeries::new("AAPL", d(2020, 1, 2), d(2020, 1, 2), bars).unwrap();
        assert_eq!(series.len(), 1);
    }
}
