use crate::error::DataUnavailable;
use crate::fetcher::SeriesFetcher;
use crate::instruments::Registry;
use crate::rsi::Rsi;
use crate::types::{FetchWarning, Interval, Lookback, Match, ScanResult};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanParams {
    pub window: usize,
    pub threshold: f64,
    pub lookback: Lookback,
    pub interval: Interval,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            window: 14,
            threshold: 60.0,
            lookback: Lookback::years(3),
            interval: Interval::Monthly,
        }
    }
}

/// Receives per-symbol status while a scan runs.
pub trait ScanObserver {
    fn on_fetch(&mut self, _symbol: &str, _position: usize, _total: usize) {}
    fn on_warning(&mut self, _symbol: &str, _reason: &DataUnavailable) {}
    fn on_progress(&mut self, _done: usize, _total: usize) {}
}

/// Writes scan status as tracing events.
#[derive(Default)]
pub struct LogObserver;

impl ScanObserver for LogObserver {
    fn on_fetch(&mut self, symbol: &str, position: usize, total: usize) {
        info!("Fetching data for {} ({}/{})...", symbol, position, total);
    }

    fn on_warning(&mut self, symbol: &str, reason: &DataUnavailable) {
        warn!("Error fetching {}: {}", symbol, reason);
    }

    fn on_progress(&mut self, done: usize, total: usize) {
        debug!("Progress {:.0}%", done as f64 / total as f64 * 100.0);
    }
}

pub struct MarketScanner<F> {
    fetcher: F,
    params: ScanParams,
}

impl<F: SeriesFetcher> MarketScanner<F> {
    pub fn new(fetcher: F, params: ScanParams) -> Self {
        Self { fetcher, params }
    }

    pub async fn scan(&self, registry: &Registry, observer: &mut impl ScanObserver) -> ScanResult {
        let rsi = Rsi::new(self.params.window);
        let total = registry.len();
        let mut result = ScanResult { scanned: total, ..Default::default() };

        for (i, ticker) in registry.iter().enumerate() {
            observer.on_fetch(&ticker.symbol, i + 1, total);

            match self.fetcher.fetch(&ticker.symbol, self.params.lookback, self.params.interval).await {
                Ok(series) => match rsi.latest(&series.closes()).filter(|v| v.is_finite()) {
                    Some(last) if last > self.params.threshold => {
                        debug!("{}: RSI {:.2} above {}", ticker.symbol, last, self.params.threshold);
                        result.matches.push(Match {
                            name: ticker.name.clone(),
                            symbol: ticker.symbol.clone(),
                            rsi: round2(last),
                        });
                    }
                    Some(last) => debug!("{}: RSI {:.2}", ticker.symbol, last),
                    None => {
                        debug!("{}: {} points, not enough history for RSI({})", ticker.symbol, series.len(), rsi.window());
                        result.insufficient_history.push(ticker.symbol.clone());
                    }
                },
                Err(reason) => {
                    observer.on_warning(&ticker.symbol, &reason);
                    result.warnings.push(FetchWarning {
                        symbol: ticker.symbol.clone(),
                        reason: reason.to_string(),
                    });
                }
            }

            observer.on_progress(i + 1, total);
        }

        // Stable: equal RSI keeps registry order
        result.matches.sort_by(|a, b| b.rsi.total_cmp(&a.rsi));
        info!(
            "Scan complete: {} match(es), {} fetch error(s), {} short series out of {}",
            result.matches.len(),
            result.warnings.len(),
            result.insufficient_history.len(),
            total
        );
        result
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
