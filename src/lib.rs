pub mod config;
pub mod error;
pub mod fetcher;
pub mod instruments;
pub mod report;
pub mod rsi;
pub mod scanner;
pub mod types;

// Re-export for tests
pub use scanner::{MarketScanner, ScanObserver, ScanParams};
