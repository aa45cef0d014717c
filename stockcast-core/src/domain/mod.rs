//! Domain types shared by every pipeline stage.

pub mod bar;
pub mod forecast_series;
pub mod profile;
pub mod series;

pub use bar::PriceBar;
pub use forecast_series::{ForecastPoint, ForecastSeries};
pub use profile::CompanyProfile;
pub use series::{PriceSeries, SeriesError};
