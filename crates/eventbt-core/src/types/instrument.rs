//! Closed instrument universe.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::DataError;

/// The fixed, ordered set of instruments tracked during a run.
///
/// Ledgers are indexed by an instrument's position in this set, so the
/// order is also the deterministic valuation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    symbols: Vec<String>,
}

impl Universe {
    /// Create a universe, rejecting empty or duplicate symbol lists.
    pub fn new<I, S>(symbols: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() {
            return Err(DataError::InvalidUniverse(
                "at least one instrument required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for symbol in &symbols {
            if symbol.trim().is_empty() {
                return Err(DataError::InvalidUniverse("empty symbol".into()));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(DataError::InvalidUniverse(format!(
                    "duplicate symbol {}",
                    symbol
                )));
            }
        }

        Ok(Self { symbols })
    }

    /// Position of `symbol` in the universe.
    pub fn index_of(&self, symbol: &str) -> Result<usize, DataError> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .ok_or_else(|| DataError::UnknownInstrument(symbol.to_string()))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}
