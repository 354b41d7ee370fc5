use serde::{Deserialize, Serialize};

/// A single held position: how many shares of one ticker, valued at the
/// most recently observed market price.
///
/// The share count is unsigned, so a position can never go negative.
/// Selling a position down to zero removes it from the portfolio instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    /// Ticker symbol, uppercased (e.g., "AAPL", "GOOGL")
    pub symbol: String,

    /// Number of shares held
    pub shares: u64,

    /// Most recently observed market price per share
    pub current_price: f64,
}

impl Stock {
    pub fn new(symbol: impl Into<String>, shares: u64, current_price: f64) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            shares,
            current_price,
        }
    }

    /// Market value of this position at the stored price.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.shares as f64 * self.current_price
    }
}
