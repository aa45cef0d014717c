//! Additive trend + seasonality model.
//!
//! Decomposes close prices into a piecewise-linear trend with changepoints
//! plus yearly and weekly Fourier seasonality, fitted jointly by
//! ridge-regularized least squares:
//!
//! ```text
//! y(t) = trend(t) + yearly(t) + weekly(t)
//! trend(t) = m + k*t + sum_j delta_j * max(0, t - s_j)
//! ```
//!
//! Changepoints are spread uniformly over the first 80% of the history, so
//! the extension past the last observation continues the final segment's
//! slope. Uncertainty bounds come from the in-sample residual spread (80%
//! central interval), widening with distance past the last observation.

use chrono::NaiveDate;
use statrs::distribution::{ContinuousCDF, Normal};

use super::linalg::ridge_least_squares;
use super::{FittedModel, ForecastError, TrendModel};
use crate::domain::{ForecastPoint, ForecastSeries, PriceSeries};

const YEARLY_PERIOD_DAYS: f64 = 365.25;
const WEEKLY_PERIOD_DAYS: f64 = 7.0;

/// Model configuration. `Default` mirrors the usual additive-model
/// defaults: 25 changepoints over 80% of the history, yearly order 10,
/// weekly order 3, 80% uncertainty interval.
#[derive(Debug, Clone)]
pub struct SeasonalTrend {
    pub n_changepoints: usize,
    pub changepoint_range: f64,
    pub yearly_order: usize,
    pub weekly_order: usize,
    pub interval_width: f64,
    changepoint_ridge: f64,
    seasonal_ridge: f64,
}

impl Default for SeasonalTrend {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            yearly_order: 10,
            weekly_order: 3,
            interval_width: 0.8,
            changepoint_ridge: 1.0,
            seasonal_ridge: 0.05,
        }
    }
}

impl SeasonalTrend {
    /// Changepoint locations in scaled time, uniform over the first
    /// `changepoint_range` of the history. Capped so short series keep at
    /// least two plain-trend degrees of freedom.
    fn changepoints(&self, n_obs: usize) -> Vec<f64> {
        let count = self.n_changepoints.min(n_obs.saturating_sub(2));
        (1..=count)
            .map(|j| self.changepoint_range * j as f64 / (count + 1) as f64)
            .collect()
    }

    /// One design-matrix row for a day offset from the series start.
    fn design_row(&self, day: f64, span: f64, changepoints: &[f64]) -> Vec<f64> {
        let t = day / span;
        let mut row = Vec::with_capacity(
            2 + changepoints.len() + 2 * self.yearly_order + 2 * self.weekly_order,
        );
        row.push(1.0);
        row.push(t);
        for &s in changepoints {
            row.push((t - s).max(0.0));
        }
        fourier_terms(&mut row, day, YEARLY_PERIOD_DAYS, self.yearly_order);
        fourier_terms(&mut row, day, WEEKLY_PERIOD_DAYS, self.weekly_order);
        row
    }

    /// Per-column ridge penalties: free offset/slope, penalized changepoint
    /// deltas (sparse-trend prior), lightly penalized seasonality.
    fn ridge(&self, n_changepoints: usize) -> Vec<f64> {
        let mut ridge = vec![1e-8, 1e-8];
        ridge.extend(std::iter::repeat(self.changepoint_ridge).take(n_changepoints));
        ridge.extend(
            std::iter::repeat(self.seasonal_ridge)
                .take(2 * self.yearly_order + 2 * self.weekly_order),
        );
        ridge
    }
}

fn fourier_terms(row: &mut Vec<f64>, day: f64, period: f64, order: usize) {
    for k in 1..=order {
        let arg = 2.0 * std::f64::consts::PI * k as f64 * day / period;
        row.push(arg.sin());
        row.push(arg.cos());
    }
}

impl TrendModel for SeasonalTrend {
    type Fitted = FittedSeasonalTrend;

    fn name(&self) -> &str {
        "seasonal_trend"
    }

    fn fit(&self, series: &PriceSeries) -> Result<Self::Fitted, ForecastError> {
        let closes = series.closes();
        let n = closes.len();
        if n < 2 {
            return Err(ForecastError::TooFewObservations { got: n });
        }
        if let Some(index) = closes.iter().position(|c| !c.is_finite()) {
            return Err(ForecastError::NonFiniteValue { index });
        }

        let first_date = series.first_date();
        let last_date = series.last_date();
        // PriceSeries guarantees strictly increasing dates, so span >= 1.
        let span = (last_date - first_date).num_days() as f64;

        // Normalize the target so the ridge penalties are scale-free.
        let y_scale = closes
            .iter()
            .fold(0.0f64, |acc, c| acc.max(c.abs()))
            .max(1e-12);
        let y_scaled: Vec<f64> = closes.iter().map(|c| c / y_scale).collect();

        let changepoints = self.changepoints(n);
        let rows: Vec<Vec<f64>> = series
            .dates()
            .iter()
            .map(|date| {
                let day = (*date - first_date).num_days() as f64;
                self.design_row(day, span, &changepoints)
            })
            .collect();

        let beta = ridge_least_squares(&rows, &y_scaled, &self.ridge(changepoints.len()))
            .ok_or(ForecastError::Singular)?;

        // In-sample residual spread, back in price units.
        let mut sse = 0.0;
        for (row, &y) in rows.iter().zip(&y_scaled) {
            let fitted: f64 = row.iter().zip(&beta).map(|(x, b)| x * b).sum();
            let resid = y - fitted;
            sse += resid * resid;
        }
        let sigma = (sse / n as f64).sqrt() * y_scale;

        let z = Normal::new(0.0, 1.0)
            .expect("standard normal")
            .inverse_cdf(0.5 + self.interval_width / 2.0);

        Ok(FittedSeasonalTrend {
            config: self.clone(),
            first_date,
            last_date,
            span,
            y_scale,
            changepoints,
            beta,
            sigma,
            z,
            history_dates: series.dates(),
        })
    }
}

/// A fitted seasonal trend model.
#[derive(Debug, Clone)]
pub struct FittedSeasonalTrend {
    config: SeasonalTrend,
    first_date: NaiveDate,
    last_date: NaiveDate,
    span: f64,
    y_scale: f64,
    changepoints: Vec<f64>,
    beta: Vec<f64>,
    sigma: f64,
    z: f64,
    history_dates: Vec<NaiveDate>,
}

impl FittedSeasonalTrend {
    /// Evaluate the additive components for one date, in price units.
    fn components(&self, date: NaiveDate) -> (f64, f64, f64) {
        let day = (date - self.first_date).num_days() as f64;
        let row = self.config.design_row(day, self.span, &self.changepoints);

        let trend_cols = 2 + self.changepoints.len();
        let yearly_cols = 2 * self.config.yearly_order;

        let dot = |range: std::ops::Range<usize>| -> f64 {
            range.map(|i| row[i] * self.beta[i]).sum()
        };

        let trend = dot(0..trend_cols) * self.y_scale;
        let yearly = dot(trend_cols..trend_cols + yearly_cols) * self.y_scale;
        let weekly = dot(trend_cols + yearly_cols..row.len()) * self.y_scale;
        (trend, yearly, weekly)
    }

    /// Interval half-width for one date; widens past the last observation.
    fn half_width(&self, date: NaiveDate) -> f64 {
        let ahead = (date - self.last_date).num_days();
        let growth = if ahead <= 0 {
            1.0
        } else {
            (1.0 + ahead as f64 / self.span.max(1.0)).sqrt()
        };
        self.z * self.sigma * growth
    }
}

impl FittedModel for FittedSeasonalTrend {
    fn extend(&self, horizon_days: u32) -> Result<ForecastSeries, ForecastError> {
        let history_len = self.history_dates.len();
        let mut points = Vec::with_capacity(history_len + horizon_days as usize);

        let future = (1..=horizon_days as i64).map(|d| self.last_date + chrono::Duration::days(d));

        for date in self.history_dates.iter().copied().chain(future) {
            let (trend, yearly, weekly) = self.components(date);
            let yhat = trend + yearly + weekly;
            let half_width = self.half_width(date);
            points.push(ForecastPoint {
                date,
                yhat,
                yhat_lower: yhat - half_width,
                yhat_upper: yhat + half_width,
                trend,
                weekly,
                yearly,
            });
        }

        Ok(ForecastSeries::new(points, history_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceBar;
    use chrono::{Datelike, Weekday};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Weekday bars starting 2020-01-02 with closes from a function of the
    /// bar index.
    fn make_series(n: usize, f: impl Fn(usize) -> f64) -> PriceSeries {
        let mut bars = Vec::new();
        let mut date = d(2020, 1, 2);
        let mut i = 0;
        while bars.len() < n {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let close = f(i);
                bars.push(PriceBar {
                    date,
                    open: close,
                    high: close + 1.0,
                    low: (close - 1.0).max(0.01),
                    close,
                    volume: 1000,
                    adj_close: close,
                });
                i += 1;
            }
            date += chrono::Duration::days(1);
        }
        let end = bars.last().unwrap().date;
        PriceSeries::new("TEST", d(2020, 1, 1), end, bars).unwrap()
    }

    #[test]
    fn too_few_observations_fails() {
        let series = make_series(1, |_| 100.0);
        let err = SeasonalTrend::default().fit(&series).unwrap_err();
        assert!(matches!(err, ForecastError::TooFewObservations { got: 1 }));
    }

    #[test]
    fn non_finite_close_fails() {
        let mut series = make_series(50, |i| 100.0 + i as f64);
        // Rebuild with one NaN close.
        let mut bars = series.bars().to_vec();
        bars[10].close = f64::NAN;
        series = PriceSeries::new("TEST", series.start(), series.end(), bars).unwrap();

        let err = SeasonalTrend::default().fit(&series).unwrap_err();
        assert!(matches!(err, ForecastError::NonFiniteValue { index: 10 }));
    }

    #[test]
    fn horizon_end_date_is_exact() {
        let series = make_series(120, |i| 100.0 + 0.3 * i as f64);
        let last = series.last_date();

        for years in 1..=4u32 {
            let forecast = crate::forecast::forecast(&series, years).unwrap();
            assert_eq!(
                forecast.last_date().unwrap(),
                last + chrono::Duration::days((years * 365) as i64),
                "horizon {years}y"
            );
        }
    }

    #[test]
    fn future_starts_day_after_last_observation() {
        let series = make_series(80, |i| 100.0 + 0.2 * i as f64);
        let forecast = crate::forecast::forecast(&series, 1).unwrap();

        assert_eq!(forecast.history().len(), series.len());
        assert_eq!(
            forecast.future()[0].date,
            series.last_date() + chrono::Duration::days(1)
        );
        // Future extension is every calendar day, no gaps.
        for w in forecast.future().windows(2) {
            assert_eq!(w[1].date, w[0].date + chrono::Duration::days(1));
        }
    }

    #[test]
    fn constant_series_forecasts_the_constant() {
        let series = make_series(100, |_| 250.0);
        let forecast = crate::forecast::forecast(&series, 1).unwrap();

        for p in forecast.points() {
            assert!(
                (p.yhat - 250.0).abs() < 0.5,
                "yhat {} strayed from constant at {}",
                p.yhat,
                p.date
            );
        }
    }

    #[test]
    fn upward_trend_extends_upward() {
        let series = make_series(250, |i| 100.0 + 0.5 * i as f64);
        let last_close = series.closes()[series.len() - 1];
        let forecast = crate::forecast::forecast(&series, 1).unwrap();

        let final_point = forecast.points().last().unwrap();
        assert!(
            final_point.yhat > last_close,
            "trend should continue upward: {} vs {last_close}",
            final_point.yhat
        );
    }

    #[test]
    fn components_sum_to_yhat() {
        let series = make_series(150, |i| 100.0 + 0.2 * i as f64 + (i as f64 / 5.0).sin());
        let forecast = crate::forecast::forecast(&series, 2).unwrap();

        for p in forecast.points() {
            let sum = p.trend + p.weekly + p.yearly;
            assert!(
                (p.yhat - sum).abs() < 1e-9,
                "components must sum to yhat at {}",
                p.date
            );
        }
    }

    #[test]
    fn bounds_bracket_yhat_and_widen() {
        let series = make_series(200, |i| 100.0 + 0.1 * i as f64 + ((i % 7) as f64));
        let forecast = crate::forecast::forecast(&series, 1).unwrap();

        for p in forecast.points() {
            assert!(p.yhat_lower <= p.yhat && p.yhat <= p.yhat_upper);
        }

        let in_sample_width = {
            let p = &forecast.history()[forecast.history().len() - 1];
            p.yhat_upper - p.yhat_lower
        };
        let far_future_width = {
            let p = forecast.points().last().unwrap();
            p.yhat_upper - p.yhat_lower
        };
        assert!(far_future_width > in_sample_width);
    }

    #[test]
    fn changepoints_capped_for_short_series() {
        let model = SeasonalTrend::default();
        assert_eq!(model.changepoints(4).len(), 2);
        assert_eq!(model.changepoints(2).len(), 0);
        assert_eq!(model.changepoints(500).len(), 25);
        // All within the changepoint range.
        assert!(model
            .changepoints(500)
            .iter()
            .all(|&s| s > 0.0 && s < model.changepoint_range));
    }
}
