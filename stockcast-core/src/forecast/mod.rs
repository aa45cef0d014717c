//! Price forecasting — model traits and the built-in seasonal trend model.
//!
//! The forecaster is a pluggable capability behind a narrow interface:
//! `TrendModel::fit` learns from a `PriceSeries`, the resulting
//! `FittedModel::extend` emits a `ForecastSeries` covering the history plus
//! `horizon` future days. The pipeline (`forecast`) wires the two together
//! with the default model so presenters never see model internals.

pub mod linalg;
pub mod seasonal;

pub use seasonal::{FittedSeasonalTrend, SeasonalTrend};

use thiserror::Error;

use crate::domain::{ForecastSeries, PriceSeries};

/// Forecast horizon bounds offered by the query surfaces.
pub const MIN_HORIZON_YEARS: u32 = 1;
pub const MAX_HORIZON_YEARS: u32 = 4;

/// Calendar days added per horizon year.
pub const DAYS_PER_YEAR: u32 = 365;

/// Failures of the model fit or extension. Never caught inside the core.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("cannot fit a model to {got} observation(s); need at least 2")]
    TooFewObservations { got: usize },

    #[error("series contains a non-finite close at index {index}")]
    NonFiniteValue { index: usize },

    #[error("model fit failed: normal equations are singular")]
    Singular,
}

/// A forecasting model that can be fitted to a historical series.
pub trait TrendModel {
    type Fitted: FittedModel;

    fn name(&self) -> &str;

    fn fit(&self, series: &PriceSeries) -> Result<Self::Fitted, ForecastError>;
}

/// A fitted model, ready to be extended past the last observation.
pub trait FittedModel {
    /// Predict every day of the history plus `horizon_days` calendar days
    /// beyond the last observed date.
    fn extend(&self, horizon_days: u32) -> Result<ForecastSeries, ForecastError>;
}

/// The whole forecast stage: fit the default model, extend by
/// `horizon_years * 365` days.
pub fn forecast(
    series: &PriceSeries,
    horizon_years: u32,
) -> Result<ForecastSeries, ForecastError> {
    let model = SeasonalTrend::default();
    let fitted = model.fit(series)?;
    fitted.extend(horizon_years * DAYS_PER_YEAR)
}
