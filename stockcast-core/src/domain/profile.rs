//! CompanyProfile — descriptive metadata for the company behind a ticker.

use serde::{Deserialize, Serialize};

/// Metadata block rendered above the price table.
///
/// Everything except the symbol is provider-dependent and may be missing
/// (index funds have no sector, some listings carry no summary). Presenters
/// use the `*_display` helpers instead of unwrapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub long_name: Option<String>,
    pub current_price: Option<f64>,
    pub sector: Option<String>,
    pub summary: Option<String>,
}

impl CompanyProfile {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Display name, falling back to the raw symbol.
    pub fn name_display(&self) -> &str {
        self.long_name.as_deref().unwrap_or(&self.symbol)
    }

    pub fn sector_display(&self) -> &str {
        self.sector.as_deref().unwrap_or("n/a")
    }

    /// Current price formatted as `$123.45`, or `n/a`.
    pub fn price_display(&self) -> String {
        match self.current_price {
            Some(p) => format!("${p:.2}"),
            None => "n/a".to_string(),
        }
    }
}
