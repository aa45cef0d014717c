//! Synthetic data provider — seeded random-walk prices for offline use.
//!
//! Serves the `--synthetic` CLI flag and every test that needs a series
//! without touching the network. Deterministic per (symbol, seed).

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{check_range, DataError, QuoteProvider};
use crate::domain::{CompanyProfile, PriceBar, PriceSeries};

/// Geometric-Brownian-style daily bars on weekdays.
pub struct SyntheticProvider {
    seed: u64,
    initial_price: f64,
    drift: f64,
    volatility: f64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            initial_price: 100.0,
            // ~12% annual drift, ~19% annual vol
            drift: 0.0005,
            volatility: 0.012,
        }
    }

    /// Mix the symbol into the seed so different tickers get different paths.
    fn symbol_seed(&self, symbol: &str) -> u64 {
        symbol
            .bytes()
            .fold(self.seed, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(42)
    }
}

impl QuoteProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        check_range(start, end)?;

        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        let mut close = self.initial_price;
        let mut bars = Vec::new();

        let mut date = start;
        while date <= end {
            // Weekdays only, like an exchange calendar without holidays.
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let noise: f64 = rng.gen_range(-1.0..1.0);
                let ret = self.drift + self.volatility * noise;
                let open = close;
                close = (close * (1.0 + ret)).max(0.01);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.005));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.005));
                let volume = rng.gen_range(500_000..5_000_000);

                bars.push(PriceBar {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                    adj_close: close,
                });
            }
            date += chrono::Duration::days(1);
        }

        if bars.is_empty() {
            return Err(DataError::EmptyRange {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        Ok(PriceSeries::new(symbol, start, end, bars)?)
    }

    fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, DataError> {
        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        Ok(CompanyProfile {
            symbol: symbol.to_string(),
            long_name: Some(format!("{symbol} (synthetic)")),
            current_price: Some(self.initial_price * rng.gen_range(0.5..2.0)),
            sector: Some("Synthetic".to_string()),
            summary: Some(format!(
                "Synthetic random-walk series for {symbol}; generated offline, not market data."
            )),
        })
    }
}
