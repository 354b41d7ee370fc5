use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    /// Buying shares
    Buy,
    /// Selling shares
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "Buy"),
            OrderSide::Sell => write!(f, "Sell"),
        }
    }
}

/// A buy/sell request as entered by the user.
///
/// Orders are ephemeral: constructed from user input, validated, then
/// either applied to the portfolio or rejected. They are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier (for logs and receipts)
    pub id: Uuid,

    /// Ticker symbol, trimmed and uppercased
    pub symbol: String,

    /// Requested share count. Kept signed so validation can observe and
    /// reject non-positive input instead of silently wrapping it.
    pub shares: i64,

    /// Buy or Sell
    pub side: OrderSide,

    /// When the order was constructed
    pub placed_at: DateTime<Utc>,
}

impl Order {
    pub fn new(symbol: impl Into<String>, shares: i64, side: OrderSide) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into().trim().to_uppercase(),
            shares,
            side,
            placed_at: Utc::now(),
        }
    }

    /// Convenience constructors for the two sides
    pub fn buy(symbol: impl Into<String>, shares: i64) -> Self {
        Self::new(symbol, shares, OrderSide::Buy)
    }

    pub fn sell(symbol: impl Into<String>, shares: i64) -> Self {
        Self::new(symbol, shares, OrderSide::Sell)
    }

    /// Signed share delta this order applies to a portfolio
    /// (positive for buys, negative for sells).
    #[must_use]
    pub fn delta(&self) -> i64 {
        match self.side {
            OrderSide::Buy => self.shares,
            OrderSide::Sell => -self.shares,
        }
    }
}
