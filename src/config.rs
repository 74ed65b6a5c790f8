use crate::error::ConfigError;
use crate::fetcher::DEFAULT_BASE_URL;
use crate::report::default_file_name;
use crate::scanner::ScanParams;
use crate::types::{Interval, Lookback};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "rsi-scanner")]
#[command(about = "Scan a watchlist for symbols whose latest RSI is above a threshold", long_about = None)]
pub struct Settings {
    /// CSV file with a `Symbol,Name` header; the built-in NSE watchlist when omitted
    #[arg(long, env = "RSI_SCANNER_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Export path; defaults to RSI_above_<threshold>.csv
    #[arg(short, long, env = "RSI_SCANNER_OUTPUT")]
    pub output: Option<PathBuf>,

    #[arg(long, env = "RSI_WINDOW", default_value_t = 14)]
    pub window: usize,

    #[arg(long, env = "RSI_THRESHOLD", default_value_t = 60.0)]
    pub threshold: f64,

    #[arg(long, env = "RSI_LOOKBACK_MONTHS", default_value_t = 36)]
    pub lookback_months: u32,

    #[arg(long, env = "RSI_INTERVAL", value_enum, default_value_t = Interval::Monthly)]
    pub interval: Interval,

    #[arg(long, env = "RSI_FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, env = "RSI_SOURCE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Print the table only
    #[arg(long)]
    pub no_export: bool,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if !self.threshold.is_finite() {
            return Err(ConfigError::Threshold(self.threshold));
        }
        if self.lookback_months == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn scan_params(&self) -> ScanParams {
        ScanParams {
            window: self.window,
            threshold: self.threshold,
            lookback: Lookback::months(self.lookback_months),
            interval: self.interval,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_file_name(self.threshold)))
    }
}
