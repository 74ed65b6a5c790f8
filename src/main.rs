use clap::Parser;
use rsi_scanner::{
    config::Settings,
    fetcher::YahooFetcher,
    instruments::{default_registry, Registry},
    report,
    scanner::{LogObserver, MarketScanner},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rsi_scanner=info")),
        )
        .init();

    let settings = Settings::parse();
    settings.validate()?;
    let params = settings.scan_params();

    let registry = match &settings.registry {
        Some(path) => Registry::from_path(path)?,
        None => default_registry().clone(),
    };

    info!("==================================================");
    info!("  RSI > {} Stock Scanner ({} Data)", params.threshold, params.interval);
    info!("==================================================");
    info!(
        "{} symbols, RSI({}), {} months of history from {}",
        registry.len(),
        params.window,
        params.lookback.months,
        settings.base_url
    );

    let fetcher = YahooFetcher::new(&settings.base_url, settings.timeout())?;
    let scanner = MarketScanner::new(fetcher, params);
    let result = scanner.scan(&registry, &mut LogObserver).await;

    let message = report::outcome_message(&result, params.threshold, params.interval);
    if result.is_empty() {
        error!("{}", message);
        return Ok(());
    }

    info!("{}", message);
    println!("{}", report::render_table(&result.matches));

    if !settings.no_export {
        let path = settings.output_path();
        report::export_csv(&result.matches, &path)?;
        info!("Wrote {} row(s) to {}", result.matches.len(), path.display());
    }

    Ok(())
}
