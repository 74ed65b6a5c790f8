use crate::error::{ClientError, DataUnavailable};
use crate::types::{Interval, Lookback, PricePoint, PriceSeries};
use chrono::{DateTime, FixedOffset, Months, Offset, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Source of historical closes for one symbol.
pub trait SeriesFetcher {
    fn fetch(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> impl Future<Output = Result<PriceSeries, DataUnavailable>> + Send;
}

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i32>,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize)]
struct AdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

/// Fetches bars from the Yahoo Finance v8 chart endpoint.
#[derive(Clone)]
pub struct YahooFetcher {
    client: Client,
    base_url: Url,
}

impl YahooFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| ClientError::BaseUrl(base_url.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rsi-scanner/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    async fn request(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<PriceSeries, DataUnavailable> {
        let (start, end) = window_bounds(Utc::now(), lookback);

        let response = self
            .client
            .get(chart_url(&self.base_url, symbol))
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", interval.code().to_string()),
                ("events", "div,splits".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("{}: HTTP {} ({} bytes)", symbol, status, body.len());

        classify(status, &body, interval)
    }
}

impl SeriesFetcher for YahooFetcher {
    fn fetch(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> impl Future<Output = Result<PriceSeries, DataUnavailable>> + Send {
        self.request(symbol, lookback, interval)
    }
}

/// Chart endpoint for `symbol`, percent-encoded as a single path segment.
pub fn chart_url(base: &Url, symbol: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["v8", "finance", "chart", symbol]);
    }
    url
}

/// Maps a chart response to a series. Unknown symbols come back as 404 with a
/// chart error body; its description wins over the bare status.
pub fn classify(status: StatusCode, body: &str, interval: Interval) -> Result<PriceSeries, DataUnavailable> {
    match parse_chart(body, interval) {
        Err(err @ DataUnavailable::Source(_)) => Err(err),
        _ if !status.is_success() => Err(DataUnavailable::Status(status)),
        other => other,
    }
}

/// Start and end of the trailing window ending at `now`.
pub fn window_bounds(now: DateTime<Utc>, lookback: Lookback) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .checked_sub_months(Months::new(lookback.months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    (start, now)
}

/// Converts a chart response body into a series of adjusted closes, one per
/// `interval` period. A trailing live bar inside the last period replaces it.
pub fn parse_chart(body: &str, interval: Interval) -> Result<PriceSeries, DataUnavailable> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(err) = envelope.chart.error {
        return Err(DataUnavailable::Source(err.description.unwrap_or(err.code)));
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or(DataUnavailable::EmptySeries)?;

    let timestamps = match result.timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Err(DataUnavailable::EmptySeries),
    };

    let adjusted = result.indicators.adjclose.into_iter().next().and_then(|a| a.adjclose);
    let raw = result.indicators.quote.into_iter().next().and_then(|q| q.close);
    let closes = adjusted.or(raw).ok_or(DataUnavailable::MissingClose)?;

    let offset = result
        .meta
        .and_then(|m| m.gmtoffset)
        .and_then(FixedOffset::east_opt)
        .unwrap_or(Utc.fix());

    let mut bars: Vec<PricePoint> = timestamps
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| {
            let close = close.filter(|c| c.is_finite())?;
            let timestamp = DateTime::from_timestamp(ts, 0)?;
            Some(PricePoint { timestamp, close })
        })
        .collect();

    if bars.is_empty() {
        return Err(DataUnavailable::EmptySeries);
    }
    bars.sort_by_key(|p| p.timestamp);

    let key = |p: &PricePoint| interval.period_key(&p.timestamp.with_timezone(&offset));
    let mut points: Vec<PricePoint> = Vec::with_capacity(bars.len());
    for bar in bars {
        match points.last_mut() {
            Some(last) if key(last) == key(&bar) => last.close = bar.close,
            _ => points.push(bar),
        }
    }

    Ok(PriceSeries { points })
}
