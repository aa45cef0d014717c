//! Yahoo Finance provider.
//!
//! Daily OHLCV bars come from the v8 chart API; the company profile comes
//! from the v10 quoteSummary API (`price` + `assetProfile` modules).
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; parse failures surface as `DataError::ResponseFormatChanged`.
//! Each fetch is a single attempt with a 30 s client timeout — a failure is
//! the caller's problem, not retried here.

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

use super::provider::{check_range, DataError, QuoteProvider};
use crate::domain::{CompanyProfile, PriceBar, PriceSeries};

// ── v8 chart API response ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

// ── v10 quoteSummary API response ───────────────────────────────────

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<SummaryData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct SummaryData {
    price: Option<PriceModule>,
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfileModule>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 187.5, "fmt": "187.50"}`.
#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AssetProfileModule {
    sector: Option<String>,
    #[serde(rename = "longBusinessSummary")]
    long_business_summary: Option<String>,
}

// ── Provider ────────────────────────────────────────────────────────

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new() -> Self {
        Self::with_base_url("https://query2.finance.yahoo.com")
    }

    /// Point the provider at a different host (tests use a local server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        format!(
            "{base}/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true",
            base = self.base_url
        )
    }

    fn summary_url(&self, symbol: &str) -> String {
        format!(
            "{base}/v10/finance/quoteSummary/{symbol}?modules=price,assetProfile",
            base = self.base_url
        )
    }

    fn get(&self, url: &str, symbol: &str) -> Result<reqwest::blocking::Response, DataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }
        Ok(resp)
    }

    /// Parse the chart API response into bars.
    fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<PriceBar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();
            let adj_close = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());

            // Rows where every field is null are holidays/non-trading days.
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
                adj_close: adj_close.unwrap_or(f64::NAN),
            });
        }

        Ok(bars)
    }

    fn parse_summary(symbol: &str, resp: SummaryResponse) -> Result<CompanyProfile, DataError> {
        let result = resp.quote_summary.result.ok_or_else(|| {
            if let Some(err) = resp.quote_summary.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty quoteSummary with no error".into())
            }
        })?;

        let data = result.into_iter().next().ok_or_else(|| {
            DataError::ResponseFormatChanged("quoteSummary result array is empty".into())
        })?;

        let mut profile = CompanyProfile::new(symbol);
        if let Some(price) = data.price {
            profile.long_name = price.long_name;
            profile.current_price = price.regular_market_price.and_then(|v| v.raw);
        }
        if let Some(asset) = data.asset_profile {
            profile.sector = asset.sector;
            profile.summary = asset.long_business_summary;
        }
        Ok(profile)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        check_range(start, end)?;

        let url = self.chart_url(symbol, start, end);
        let chart: ChartResponse = self
            .get(&url, symbol)?
            .json()
            .map_err(|e| DataError::ResponseFormatChanged(format!("chart parse: {e}")))?;

        let bars = Self::parse_chart(symbol, chart)?;
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
        let url = self.summary_url(symbol);
        let summary: SummaryResponse = self
            .get(&url, symbol)?
            .json()
            .map_err(|e| DataError::ResponseFormatChanged(format!("quoteSummary parse: {e}")))?;

        Self::parse_summary(symbol, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const CHART_FIXTURE: &str = r#"{
      "chart": {
        "result": [{
          "timestamp": [1577975400, 1578061800, 1578320200],
          "indicators": {
            "quote": [{
              "open":   [74.06, 74.29, null],
              "high":   [75.15, 75.14, null],
              "low":    [73.80, 74.13, null],
              "close":  [75.09, 74.36, null],
              "volume": [135480400, 146322800, null]
            }],
            "adjclose": [{ "adjclose": [72.88, 72.17, null] }]
          }
        }],
        "error": null
      }
    }"#;

    const NOT_FOUND_FIXTURE: &str = r#"{
      "chart": {
        "result": null,
        "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
      }
    }"#;

    const SUMMARY_FIXTURE: &str = r#"{
      "quoteSummary": {
        "result": [{
          "price": {
            "longName": "Apple Inc.",
            "regularMarketPrice": { "raw": 187.5, "fmt": "187.50" }
          },
          "assetProfile": {
            "sector": "Technology",
            "longBusinessSummary": "Apple Inc. designs, manufactures, and markets smartphones."
          }
        }],
        "error": null
      }
    }"#;

    #[test]
    fn chart_fixture_parses_and_skips_null_rows() {
        let resp: ChartResponse = serde_json::from_str(CHART_FIXTURE).unwrap();
        let bars = YahooProvider::parse_chart("AAPL", resp).unwrap();

        // Third row is all-null (holiday) and is dropped.
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, d(2020, 1, 2));
        assert!((bars[0].close - 75.09).abs() < 1e-9);
        assert!((bars[1].adj_close - 72.17).abs() < 1e-9);
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn chart_not_found_maps_to_symbol_not_found() {
        let resp: ChartResponse = serde_json::from_str(NOT_FOUND_FIXTURE).unwrap();
        let err = YahooProvider::parse_chart("ZZZZZZ", resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { symbol } if symbol == "ZZZZZZ"));
    }

    #[test]
    fn summary_fixture_parses() {
        let resp: SummaryResponse = serde_json::from_str(SUMMARY_FIXTURE).unwrap();
        let profile = YahooProvider::parse_summary("AAPL", resp).unwrap();

        assert_eq!(profile.name_display(), "Apple Inc.");
        assert_eq!(profile.sector_display(), "Technology");
        assert_eq!(profile.current_price, Some(187.5));
        assert!(profile.summary.unwrap().starts_with("Apple Inc."));
    }

    #[test]
    fn summary_tolerates_missing_modules() {
        let json = r#"{"quoteSummary":{"result":[{}],"error":null}}"#;
        let resp: SummaryResponse = serde_json::from_str(json).unwrap();
        let profile = YahooProvider::parse_summary("SPY", resp).unwrap();
        assert_eq!(profile.name_display(), "SPY");
        assert_eq!(profile.current_price, None);
    }

    #[test]
    fn chart_url_encodes_range() {
        let provider = YahooProvider::new();
        let url = provider.chart_url("AAPL", d(2020, 1, 1), d(2020, 12, 31));
        assert!(url.contains("/v8/finance/chart/AAPL"));
        assert!(url.contains("interval=1d"));
        assert!(url.contains("period1=1577836800"));
    }

    #[test]
    fn inverted_range_fails_before_io() {
        // base_url is unroutable; the range check must fire first.
        let provider = YahooProvider::with_base_url("http://127.0.0.1:1");
        let err = provider
            .fetch_bars("AAPL", d(2021, 1, 1), d(2020, 1, 1))
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidRange { .. }));
    }
}
