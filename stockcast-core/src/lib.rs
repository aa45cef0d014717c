//! Stockcast Core — domain types, market data, overlay, and the forecaster.
//!
//! This crate contains everything below the presentation layer:
//! - Domain types (price bars, price series, company profiles, forecast series)
//! - The `QuoteProvider` trait with Yahoo Finance and synthetic implementations
//! - The symbol catalog (remote list, TOML file, or built-in fallback)
//! - The volatility-band overlay (rolling mean ± stddev)
//! - The `TrendModel`/`FittedModel` traits and the built-in additive
//!   trend + seasonality model

pub mod data;
pub mod domain;
pub mod forecast;
pub mod overlay;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types that cross the TUI worker channel are Send.
    #[allow(dead_code)]
    fn assert_send() {
        fn require_send<T: Send>() {}

        require_send::<domain::PriceBar>();
        require_send::<domain::PriceSeries>();
        require_send::<domain::CompanyProfile>();
        require_send::<domain::ForecastPoint>();
        require_send::<domain::ForecastSeries>();
        require_send::<data::DataError>();
        require_send::<data::SymbolCatalog>();
        require_send::<forecast::ForecastError>();
    }
}
