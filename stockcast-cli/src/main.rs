//! Stockcast CLI — the dashboard pipeline without the dashboard.
//!
//! Commands:
//! - `symbols` — print the symbol catalog and where it came from
//! - `quote` — fetch and print the profile block and price table
//! - `forecast` — run fetch + fit + extend, print the forecast tail

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use stockcast_core::data::{
    QuoteProvider, SymbolCatalog, SyntheticProvider, YahooProvider,
};
use stockcast_core::domain::{CompanyProfile, ForecastSeries, PriceSeries};
use stockcast_core::forecast;
use stockcast_core::overlay::VolatilityBands;

#[derive(Parser)]
#[command(
    name = "stockcast",
    about = "Stockcast CLI — stock history and price forecasts in the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the symbol catalog.
    Symbols {
        /// TOML catalog file instead of the remote list.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Skip the network and use the built-in list.
        #[arg(long, default_value_t = false)]
        offline: bool,
    },
    /// Fetch and print company metadata and the price history.
    Quote {
        /// Ticker symbol (e.g. AAPL).
        symbol: String,

        /// Start date (YYYY-MM-DD). Defaults to 2015-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to yesterday.
        #[arg(long)]
        end: Option<String>,

        /// Use generated data instead of the live provider.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Write the full series to a CSV file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fetch history and print a 1-4 year price forecast.
    Forecast {
        /// Ticker symbol (e.g. AAPL).
        symbol: String,

        /// Start date (YYYY-MM-DD). Defaults to 2015-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to yesterday.
        #[arg(long)]
        end: Option<String>,

        /// Horizon in years (1-4).
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=4))]
        years: u32,

        /// Use generated data instead of the live provider.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Write the full forecast to a CSV file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Symbols { catalog, offline } => run_symbols(catalog, offline),
        Commands::Quote {
            symbol,
            start,
            end,
            synthetic,
            out,
        } => run_quote(&symbol, start.as_deref(), end.as_deref(), synthetic, out),
        Commands::Forecast {
            symbol,
            start,
            end,
            years,
            synthetic,
            out,
        } => run_forecast(
            &symbol,
            start.as_deref(),
            end.as_deref(),
            years,
            synthetic,
            out,
        ),
    }
}

fn provider_for(synthetic: bool) -> Box<dyn QuoteProvider> {
    if synthetic {
        Box::new(SyntheticProvider::default())
    } else {
        Box::new(YahooProvider::new())
    }
}

fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<(NaiveDate, NaiveDate)> {
    let start = start
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --start (want YYYY-MM-DD)")?
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
    let end = end
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --end (want YYYY-MM-DD)")?
        .unwrap_or_else(|| chrono::Local::now().date_naive() - chrono::Duration::days(1));
    Ok((start, end))
}

fn run_symbols(catalog_path: Option<PathBuf>, offline: bool) -> Result<()> {
    let catalog = match catalog_path {
        Some(path) => SymbolCatalog::from_file(&path)?,
        None if offline => SymbolCatalog::builtin(),
        None => SymbolCatalog::fetch_remote().unwrap_or_else(|e| {
            eprintln!("WARNING: {e}; falling back to the built-in list");
            SymbolCatalog::builtin()
        }),
    };

    println!(
        "{} symbols ({})",
        catalog.len(),
        catalog.source().label()
    );
    for chunk in catalog.symbols().chunks(10) {
        println!("{}", chunk.join(" "));
    }
    Ok(())
}

fn run_quote(
    symbol: &str,
    start: Option<&str>,
    end: Option<&str>,
    synthetic: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let (start, end) = parse_range(start, end)?;
    let provider = provider_for(synthetic);

    let series = provider.fetch_bars(symbol, start, end)?;
    let profile = provider.fetch_profile(symbol)?;

    print_profile(&profile);
    print_series_tail(&series, 10);

    let bands = VolatilityBands::standard(&series);
    if let Some(last) = bands
        .middle
        .iter()
        .zip(&bands.upper)
        .zip(&bands.lower)
        .rev()
        .find(|((m, _), _)| m.is_finite())
    {
        let ((mid, up), lo) = last;
        println!();
        println!(
            "{}d volatility band: {lo:.2} .. {mid:.2} .. {up:.2}",
            bands.window
        );
    }

    if let Some(path) = out {
        write_series_csv(&series, &path)?;
        println!("Series written to {}", path.display());
    }
    Ok(())
}

fn run_forecast(
    symbol: &str,
    start: Option<&str>,
    end: Option<&str>,
    years: u32,
    synthetic: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let (start, end) = parse_range(start, end)?;
    let provider = provider_for(synthetic);

    let series = provider.fetch_bars(symbol, start, end)?;
    let profile = provider.fetch_profile(symbol)?;
    print_profile(&profile);

    println!(
        "{} trading days, {} to {}",
        series.len(),
        series.first_date(),
        series.last_date()
    );
    println!();

    let result = forecast::forecast(&series, years)?;

    println!("=== Forecast ({years}y horizon) ===");
    println!(
        "{:<12} {:>10} {:>10} {:>10}",
        "Date", "Forecast", "Lower", "Upper"
    );
    for p in result.tail(5) {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2}",
            p.date.to_string(),
            p.yhat,
            p.yhat_lower,
            p.yhat_upper
        );
    }

    let last_close = series.closes()[series.len() - 1];
    if let Some(final_point) = result.points().last() {
        let change = (final_point.yhat / last_close - 1.0) * 100.0;
        println!();
        println!(
            "Last close {last_close:.2} -> predicted {:.2} on {} ({change:+.1}%)",
            final_point.yhat, final_point.date
        );
    }

    if let Some(path) = out {
        write_forecast_csv(&result, &path)?;
        println!("Forecast written to {}", path.display());
    }
    Ok(())
}

fn print_profile(profile: &CompanyProfile) {
    println!("=== {} ===", profile.name_display());
    println!("Current price: {}", profile.price_display());
    println!("Sector:        {}", profile.sector_display());
    if let Some(summary) = &profile.summary {
        println!();
        println!("{summary}");
    }
    println!();
}

fn print_series_tail(series: &PriceSeries, n: usize) {
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    let skip = series.len().saturating_sub(n);
    for bar in series.bars().iter().skip(skip) {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}",
            bar.date.to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        );
    }
    println!("({} rows total)", series.len());
}

fn write_series_csv(series: &PriceSeries, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    writer.write_record(["date", "open", "high", "low", "close", "volume", "adj_close"])?;
    for bar in series.bars() {
        writer.write_record([
            bar.date.to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
            bar.adj_close.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_forecast_csv(forecast: &ForecastSeries, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    writer.write_record([
        "date",
        "yhat",
        "yhat_lower",
        "yhat_upper",
        "trend",
        "weekly",
        "yearly",
    ])?;
    for p in forecast.points() {
        writer.write_record([
            p.date.to_string(),
            p.yhat.to_string(),
            p.yhat_lower.to_string(),
            p.yhat_upper.to_string(),
            p.trend.to_string(),
            p.weekly.to_string(),
            p.yearly.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn range_defaults_and_parsing() {
        let (start, end) = parse_range(Some("2020-01-01"), Some("2020-12-31")).unwrap();
        assert_eq!(start, d(2020, 1, 1));
        assert_eq!(end, d(2020, 12, 31));

        let (start, _) = parse_range(None, None).unwrap();
        assert_eq!(start, d(2015, 1, 1));

        assert!(parse_range(Some("01/01/2020"), None).is_err());
    }

    #[test]
    fn series_csv_roundtrips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");

        let provider = SyntheticProvider::default();
        let series = provider
            .fetch_bars("TEST", d(2020, 1, 1), d(2020, 2, 1))
            .unwrap();
        write_series_csv(&series, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), series.len());
        assert_eq!(&rows[0][0], series.first_date().to_string().as_str());
    }

    #[test]
    fn forecast_csv_has_component_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forecast.csv");

        let provider = SyntheticProvider::default();
        let series = provider
            .fetch_bars("TEST", d(2020, 1, 1), d(2020, 12, 31))
            .unwrap();
        let result = forecast::forecast(&series, 1).unwrap();
        write_forecast_csv(&result, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "date");
        assert_eq!(&headers[4], "trend");
        assert_eq!(reader.records().count(), result.len());
    }
}
