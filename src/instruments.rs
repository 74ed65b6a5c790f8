use crate::error::RegistryError;
use crate::types::Ticker;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

const NSE_WATCHLIST: &[(&str, &str)] = &[
    ("SONACOMS.NS", "SONACOMS"),
    ("BPCL.NS", "BPCL"),
    ("OBEROIRLTY.NS", "OBEROIRLTY"),
    ("CONCOR.NS", "CONCOR"),
    ("LAURUSLABS.NS", "LAURUSLABS"),
    ("NTPC.NS", "NTPC"),
    ("HINDPETRO.NS", "HINDPETRO"),
    ("TECHM.NS", "TECHM"),
    ("FORTIS.NS", "FORTIS"),
    ("INFY.NS", "INFY"),
    ("HDFCBANK.NS", "HDFCBANK"),
    ("PFC.NS", "PFC"),
    ("POWERGRID.NS", "POWERGRID"),
    ("ASHOKLEY.NS", "ASHOKLEY"),
    ("IOC.NS", "IOC"),
    ("JSWSTEEL.NS", "JSWSTEEL"),
    ("CANBK.NS", "CANBK"),
    ("TATATECH.NS", "TATATECH"),
];

lazy_static! {
    static ref DEFAULT_REGISTRY: Registry = Registry::from_pairs(NSE_WATCHLIST.iter().copied());
}

#[derive(Deserialize)]
struct RegistryRow {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Name")]
    name: String,
}

/// Ordered symbol → display name table. Scan order follows insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registry {
    tickers: Vec<Ticker>,
}

impl Registry {
    /// Builds a registry keeping the first position of a repeated symbol and its latest name.
    pub fn from_pairs<S, N>(pairs: impl IntoIterator<Item = (S, N)>) -> Self
    where
        S: Into<String>,
        N: Into<String>,
    {
        let mut registry = Self::default();
        for (symbol, name) in pairs {
            registry.insert(Ticker::new(symbol, name));
        }
        registry
    }

    pub fn insert(&mut self, ticker: Ticker) {
        match self.tickers.iter_mut().find(|t| t.symbol == ticker.symbol) {
            Some(existing) => existing.name = ticker.name,
            None => self.tickers.push(ticker),
        }
    }

    /// Reads a CSV table with a `Symbol,Name` header.
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self, RegistryError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut registry = Self::default();

        for (i, row) in reader.deserialize::<RegistryRow>().enumerate() {
            let row = row.map_err(|source| RegistryError::Read { path: origin.to_string(), source })?;
            if row.symbol.is_empty() {
                return Err(RegistryError::EmptySymbol { row: i + 1 });
            }
            let name = if row.name.is_empty() { row.symbol.clone() } else { row.name };
            registry.insert(Ticker::new(row.symbol, name));
        }

        if registry.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(registry)
    }

    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let origin = path.display().to_string();
        let file = std::fs::File::open(path)
            .map_err(|e| RegistryError::Read { path: origin.clone(), source: e.into() })?;
        Self::from_reader(file, &origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ticker> {
        self.tickers.iter()
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

/// The built-in NSE watchlist.
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}
