//! ForecastSeries — the forecaster's output, consumed only by presenters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecasted day: point prediction, uncertainty bounds, and the
/// additive component breakdown (yhat = trend + weekly + yearly).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub trend: f64,
    pub weekly: f64,
    pub yearly: f64,
}

/// Chronologically ordered forecast spanning the historical range plus the
/// future extension. `history_len` marks where the future begins: points
/// `[0, history_len)` are in-sample, `[history_len, len)` are the extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
    history_len: usize,
}

impl ForecastSeries {
    pub fn new(points: Vec<ForecastPoint>, history_len: usize) -> Self {
        debug_assert!(history_len <= points.len());
        Self {
            points,
            history_len,
        }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// In-sample points (the fitted history).
    pub fn history(&self) -> &[ForecastPoint] {
        &self.points[..self.history_len]
    }

    /// The future extension past the last historical date.
    pub fn future(&self) -> &[ForecastPoint] {
        &self.points[self.history_len..]
    }

    /// Last forecasted date, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// The last `n` points, for the tail table.
    pub fn tail(&self, n: usize) -> &[ForecastPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: NaiveDate, yhat: f64) -> ForecastPoint {
        ForecastPoint {
            date,
            yhat,
            yhat_lower: yhat - 1.0,
            yhat_upper: yhat + 1.0,
            trend: yhat,
            weekly: 0.0,
            yearly: 0.0,
        }
    }

    fn series() -> ForecastSeries {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let points = (0..10)
            .map(|i| point(base + chrono::Duration::days(i), 100.0 + i as f64))
            .collect();
        ForecastSeries::new(points, 7)
    }

    #[test]
    fn history_future_split() {
        let s = series();
        assert_eq!(s.history().len(), 7);
        assert_eq!(s.future().len(), 3);
        // Future starts the day after the last in-sample date.
        let last_hist = s.history().last().unwrap().date;
        assert_eq!(s.future()[0].date, last_hist + chrono::Duration::days(1));
    }

    #[test]
    fn tail_clamps_to_len() {
        let s = series();
        assert_eq!(s.tail(5).len(), 5);
        assert_eq!(s.tail(100).len(), 10);
        assert_eq!(s.tail(5)[4].date, s.last_date().unwrap());
    }
}
