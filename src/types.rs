use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker { pub symbol: String, pub name: String }

impl Ticker {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint { pub timestamp: DateTime<Utc>, pub close: f64 }

/// Closing prices in ascending time order, one entry per elapsed interval.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries { pub points: Vec<PricePoint> }

impl PriceSeries {
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize { self.points.len() }

    pub fn is_empty(&self) -> bool { self.points.is_empty() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Interval { Daily, Weekly, #[default] Monthly }

impl Interval {
    /// Interval code understood by the chart endpoint.
    pub fn code(&self) -> &'static str {
        match self { Self::Daily => "1d", Self::Weekly => "1wk", Self::Monthly => "1mo" }
    }

    /// Identifies the bar a timestamp belongs to, read in the exchange's local time.
    pub fn period_key<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> (i32, u32) {
        match self {
            Self::Daily => (at.year(), at.ordinal()),
            Self::Weekly => {
                let week = at.iso_week();
                (week.year(), week.week())
            }
            Self::Monthly => (at.year(), at.month()),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self { Self::Daily => "Daily", Self::Weekly => "Weekly", Self::Monthly => "Monthly" })
    }
}

/// Trailing window of history requested from the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookback { pub months: u32 }

impl Lookback {
    pub fn years(years: u32) -> Self { Self { months: years * 12 } }

    pub fn months(months: u32) -> Self { Self { months } }
}

impl Default for Lookback {
    fn default() -> Self { Self::years(3) }
}

/// A symbol whose latest RSI cleared the threshold. Field names double as the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "Stock Name")]
    pub name: String,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "RSI", serialize_with = "two_decimals")]
    pub rsi: f64,
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.2}", value))
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchWarning { pub symbol: String, pub reason: String }

/// Outcome of one pass over the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    /// Sorted by RSI descending; ties keep registry order.
    pub matches: Vec<Match>,
    pub warnings: Vec<FetchWarning>,
    pub insufficient_history: Vec<String>,
    pub scanned: usize,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool { self.matches.is_empty() }
}
