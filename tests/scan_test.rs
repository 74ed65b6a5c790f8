use chrono::{Months, TimeZone, Utc};
use rsi_scanner::error::DataUnavailable;
use rsi_scanner::fetcher::SeriesFetcher;
use rsi_scanner::instruments::Registry;
use rsi_scanner::report;
use rsi_scanner::types::{Interval, Lookback, Match, PricePoint, PriceSeries};
use rsi_scanner::{MarketScanner, ScanObserver, ScanParams};
use std::collections::HashMap;
use std::future::Future;

enum Canned {
    Closes(Vec<f64>),
    Empty,
    Unknown,
}

#[derive(Default)]
struct StaticFetcher {
    data: HashMap<String, Canned>,
}

impl StaticFetcher {
    fn with(mut self, symbol: &str, canned: Canned) -> Self {
        self.data.insert(symbol.to_string(), canned);
        self
    }

    fn lookup(&self, symbol: &str) -> Result<PriceSeries, DataUnavailable> {
        match self.data.get(symbol) {
            Some(Canned::Closes(closes)) => {
                let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
                let points = closes
                    .iter()
                    .enumerate()
                    .map(|(i, &close)| PricePoint {
                        timestamp: start + Months::new(i as u32),
                        close,
                    })
                    .collect();
                Ok(PriceSeries { points })
            }
            Some(Canned::Empty) => Err(DataUnavailable::EmptySeries),
            Some(Canned::Unknown) | None => Err(DataUnavailable::Source(format!("{} not found", symbol))),
        }
    }
}

impl SeriesFetcher for StaticFetcher {
    fn fetch(
        &self,
        symbol: &str,
        _lookback: Lookback,
        _interval: Interval,
    ) -> impl Future<Output = Result<PriceSeries, DataUnavailable>> + Send {
        let result = self.lookup(symbol);
        async move { result }
    }
}

#[derive(Default)]
struct Recorder {
    fetches: Vec<(String, usize, usize)>,
    warnings: Vec<String>,
    progress: Vec<(usize, usize)>,
}

impl ScanObserver for Recorder {
    fn on_fetch(&mut self, symbol: &str, position: usize, total: usize) {
        self.fetches.push((symbol.to_string(), position, total));
    }

    fn on_warning(&mut self, symbol: &str, reason: &DataUnavailable) {
        self.warnings.push(format!("Error fetching {}: {}", symbol, reason));
    }

    fn on_progress(&mut self, done: usize, total: usize) {
        self.progress.push((done, total));
    }
}

fn rising() -> Vec<f64> {
    (10..=25).map(|v| v as f64).collect()
}

fn falling() -> Vec<f64> {
    (0..20).map(|i| 100.0 - i as f64).collect()
}

/// 15 closes whose RSI(14) seed is exactly 75: gains 3 of every 4 units moved.
fn seventy_five() -> Vec<f64> {
    let mut closes = vec![100.0];
    for i in 0..14 {
        let step = if i < 7 { 3.0 } else { -1.0 };
        closes.push(closes[i] + step);
    }
    closes
}

#[tokio::test]
async fn test_rising_series_matches_at_100() {
    let registry = Registry::from_pairs([("AAA", "Alpha Co")]);
    let fetcher = StaticFetcher::default().with("AAA", Canned::Closes(rising()));
    let scanner = MarketScanner::new(fetcher, ScanParams::default());

    let result = scanner.scan(&registry, &mut Recorder::default()).await;

    assert_eq!(
        result.matches,
        vec![Match { name: "Alpha Co".into(), symbol: "AAA".into(), rsi: 100.0 }]
    );
    assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn test_empty_series_warns_once_and_is_skipped() {
    let registry = Registry::from_pairs([("BBB", "Beta Co")]);
    let fetcher = StaticFetcher::default().with("BBB", Canned::Empty);
    let scanner = MarketScanner::new(fetcher, ScanParams::default());
    let mut recorder = Recorder::default();

    let result = scanner.scan(&registry, &mut recorder).await;

    assert!(result.is_empty());
    assert_eq!(recorder.warnings, vec!["Error fetching BBB: no price data returned".to_string()]);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].symbol, "BBB");
}

#[tokio::test]
async fn test_short_series_is_silent() {
    let registry = Registry::from_pairs([("CCC", "Short Co")]);
    let short: Vec<f64> = (1..=14).map(|v| v as f64).collect();
    let fetcher = StaticFetcher::default().with("CCC", Canned::Closes(short));
    let scanner = MarketScanner::new(fetcher, ScanParams::default());
    let mut recorder = Recorder::default();

    let result = scanner.scan(&registry, &mut recorder).await;

    assert!(result.is_empty());
    assert!(recorder.warnings.is_empty());
    assert!(result.warnings.is_empty());
    assert_eq!(result.insufficient_history, vec!["CCC".to_string()]);
}

#[tokio::test]
async fn test_threshold_is_strict() {
    let registry = Registry::from_pairs([("EQ", "Exactly"), ("DN", "Down")]);
    let fetcher = StaticFetcher::default()
        .with("EQ", Canned::Closes(seventy_five()))
        .with("DN", Canned::Closes(falling()));

    let at_75 = ScanParams { threshold: 75.0, ..ScanParams::default() };
    let result = MarketScanner::new(fetcher, at_75).scan(&registry, &mut Recorder::default()).await;
    assert!(result.is_empty());

    let fetcher = StaticFetcher::default().with("EQ", Canned::Closes(seventy_five()));
    let result = MarketScanner::new(fetcher, ScanParams::default())
        .scan(&registry, &mut Recorder::default())
        .await;
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].rsi, 75.0);
}

#[tokio::test]
async fn test_sorted_descending_with_stable_ties() {
    let registry = Registry::from_pairs([
        ("MID", "Middle"),
        ("X", "Ex"),
        ("LOW", "Below"),
        ("Y", "Why"),
        ("TOP", "Top"),
    ]);
    let fetcher = StaticFetcher::default()
        .with("MID", Canned::Closes(seventy_five()))
        .with("X", Canned::Closes(rising()))
        .with("LOW", Canned::Closes(falling()))
        .with("Y", Canned::Closes(vec![5.0; 16]))
        .with("TOP", Canned::Unknown);
    let scanner = MarketScanner::new(fetcher, ScanParams::default());
    let mut recorder = Recorder::default();

    let result = scanner.scan(&registry, &mut recorder).await;

    let symbols: Vec<&str> = result.matches.iter().map(|m| m.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["X", "Y", "MID"]);
    assert_eq!(recorder.warnings, vec!["Error fetching TOP: TOP not found".to_string()]);
}

#[tokio::test]
async fn test_progress_reported_for_every_symbol() {
    let registry = Registry::from_pairs([("AAA", "Alpha"), ("BBB", "Beta"), ("CCC", "Gamma")]);
    let fetcher = StaticFetcher::default()
        .with("AAA", Canned::Closes(rising()))
        .with("BBB", Canned::Empty);
    let scanner = MarketScanner::new(fetcher, ScanParams::default());
    let mut recorder = Recorder::default();

    let result = scanner.scan(&registry, &mut recorder).await;

    assert_eq!(result.scanned, 3);
    assert_eq!(recorder.progress, vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(
        recorder.fetches,
        vec![
            ("AAA".to_string(), 1, 3),
            ("BBB".to_string(), 2, 3),
            ("CCC".to_string(), 3, 3),
        ]
    );
    assert_eq!(recorder.warnings.len(), 2);
}

#[tokio::test]
async fn test_scan_is_deterministic_and_exports_round_trip() {
    let registry = Registry::from_pairs([("MID", "Middle, Ltd"), ("X", "Ex"), ("Y", "Why")]);
    let build = || {
        StaticFetcher::default()
            .with("MID", Canned::Closes(seventy_five()))
            .with("X", Canned::Closes(rising()))
            .with("Y", Canned::Closes(rising()))
    };

    let first = MarketScanner::new(build(), ScanParams::default())
        .scan(&registry, &mut Recorder::default())
        .await;
    let second = MarketScanner::new(build(), ScanParams::default())
        .scan(&registry, &mut Recorder::default())
        .await;
    assert_eq!(first, second);

    let mut buf = Vec::new();
    report::write_csv(&first.matches, &mut buf).unwrap();
    assert!(String::from_utf8_lossy(&buf).starts_with("Stock Name,Symbol,RSI\nEx,X,100.00\nWhy,Y,100.00\n"));
    assert_eq!(report::read_csv(buf.as_slice()).unwrap(), first.matches);
}
