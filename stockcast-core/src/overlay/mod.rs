//! Volatility-band overlay — rolling mean ± stddev multiplier of close.
//!
//! Three aligned series:
//! - middle: rolling mean(close, window)
//! - upper: middle + mult * stddev(close, window)
//! - lower: middle - mult * stddev(close, window)
//!
//! Uses population stddev (divide by N). The first `window - 1` slots are
//! NaN, and any window containing a NaN close yields NaN.

use crate::domain::PriceSeries;

/// Computed bands, index-aligned with the series bars.
#[derive(Debug, Clone)]
pub struct VolatilityBands {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub window: usize,
    pub multiplier: f64,
}

impl VolatilityBands {
    /// Chart default: 20-day window, 2 standard deviations.
    pub fn standard(series: &PriceSeries) -> Self {
        Self::compute(series, 20, 2.0)
    }

    pub fn compute(series: &PriceSeries, window: usize, multiplier: f64) -> Self {
        assert!(window >= 1, "band window must be >= 1");

        let closes = series.closes();
        let n = closes.len();
        let mut middle = vec![f64::NAN; n];
        let mut upper = vec![f64::NAN; n];
        let mut lower = vec![f64::NAN; n];

        if n >= window {
            for i in (window - 1)..n {
                let slice = &closes[i + 1 - window..=i];

                if slice.iter().any(|c| c.is_nan()) {
                    continue;
                }

                let mean = slice.iter().sum::<f64>() / window as f64;
                let variance = slice
                    .iter()
                    .map(|c| {
                        let diff = c - mean;
                        diff * diff
                    })
                    .sum::<f64>()
                    / window as f64;
                let stddev = variance.sqrt();

                middle[i] = mean;
                upper[i] = mean + multiplier * stddev;
                lower[i] = mean - multiplier * stddev;
            }
        }

        Self {
            middle,
            upper,
            lower,
            window,
            multiplier,
        }
    }

    /// Bars before this index have no band value.
    pub fn warmup(&self) -> usize {
        self.window.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PriceBar, PriceSeries};
    use chrono::NaiveDate;

    fn make_series(closes: &[f64]) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars: Vec<PriceBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                PriceBar {
                    date: base + chrono::Duration::days(i as i64),
                    open,
                    high: open.max(close) + 1.0,
                    low: open.min(close) - 1.0,
                    close,
                    volume: 1000,
                    adj_close: close,
                }
            })
            .collect();
        let end = bars.last().unwrap().date;
        PriceSeries::new("TEST", base, end, bars).unwrap()
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "actual={actual}, expected={expected}"
        );
    }

    #[test]
    fn middle_is_rolling_mean() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let bands = VolatilityBands::compute(&series, 3, 2.0);

        assert!(bands.middle[0].is_nan());
        assert!(bands.middle[1].is_nan());
        assert_approx(bands.middle[2], 11.0);
        assert_approx(bands.middle[3], 12.0);
        assert_approx(bands.middle[4], 13.0);
    }

    #[test]
    fn bands_symmetric_about_middle() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let bands = VolatilityBands::compute(&series, 3, 2.0);

        for i in 2..5 {
            let half_width = bands.upper[i] - bands.middle[i];
            assert_approx(bands.middle[i] - bands.lower[i], half_width);
            assert!(half_width > 0.0);
        }
    }

    #[test]
    fn constant_price_collapses_bands() {
        let series = make_series(&[100.0, 100.0, 100.0, 100.0]);
        let bands = VolatilityBands::compute(&series, 3, 2.0);

        assert_approx(bands.upper[2], 100.0);
        assert_approx(bands.middle[2], 100.0);
        assert_approx(bands.lower[2], 100.0);
    }

    #[test]
    fn short_series_is_all_nan() {
        let series = make_series(&[10.0, 11.0]);
        let bands = VolatilityBands::compute(&series, 20, 2.0);
        assert!(bands.middle.iter().all(|v| v.is_nan()));
        assert_eq!(bands.warmup(), 19);
    }
}
