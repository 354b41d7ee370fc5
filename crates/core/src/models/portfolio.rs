use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

use super::stock::Stock;

/// Absolute and percentage change of the portfolio's value relative to
/// the session's valuation snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyChange {
    pub absolute: f64,
    pub percent: f64,
}

/// All positions held by one user, keyed by uppercase ticker symbol.
///
/// The UI holds a read-only view; every mutation flows through
/// `apply_delta`, which keeps `last_updated` current. A portfolio lives
/// for one authenticated session; there is no cross-process persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    /// Held positions, one entry per symbol
    pub stocks: HashMap<String, Stock>,

    /// When the portfolio was last mutated or repriced
    pub last_updated: DateTime<Utc>,

    /// Valuation snapshot backing `daily_change()`. Taken when the
    /// portfolio is loaded for a session; `None` means no prior reference
    /// exists and daily change reports zero.
    #[serde(default)]
    pub previous_close: Option<f64>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            stocks: HashMap::new(),
            last_updated: Utc::now(),
            previous_close: None,
        }
    }
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a portfolio from a list of positions (e.g., holdings fetched
    /// from the backend). A later duplicate of a symbol replaces the
    /// earlier entry.
    pub fn from_stocks(stocks: Vec<Stock>) -> Self {
        let mut map = HashMap::new();
        for stock in stocks {
            map.insert(stock.symbol.clone(), stock);
        }
        Self {
            stocks: map,
            last_updated: Utc::now(),
            previous_close: None,
        }
    }

    /// Sum of all held position values. 0.0 for an empty portfolio.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.stocks.values().map(Stock::value).sum()
    }

    /// Look up a position by symbol (exact match on the uppercase form).
    #[must_use]
    pub fn find(&self, symbol: &str) -> Option<&Stock> {
        self.stocks.get(symbol)
    }

    /// All positions in deterministic order (sorted by symbol).
    #[must_use]
    pub fn holdings(&self) -> Vec<&Stock> {
        let mut stocks: Vec<&Stock> = self.stocks.values().collect();
        stocks.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        stocks
    }

    /// Number of distinct positions held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    /// Change relative to the session's valuation snapshot. Zero while no
    /// snapshot has been taken.
    #[must_use]
    pub fn daily_change(&self) -> DailyChange {
        let Some(reference) = self.previous_close else {
            return DailyChange {
                absolute: 0.0,
                percent: 0.0,
            };
        };
        let absolute = self.total_value() - reference;
        let percent = if reference > 0.0 {
            absolute / reference * 100.0
        } else {
            0.0
        };
        DailyChange { absolute, percent }
    }

    /// Record the current valuation as the reference for daily change.
    pub fn take_snapshot(&mut self) {
        self.previous_close = Some(self.total_value());
    }

    /// Adjust the held shares of `symbol` by `delta_shares` at the given
    /// execution price.
    ///
    /// Creates the position when absent and the delta is positive; removes
    /// it when the resulting share count reaches zero; fails without
    /// mutating anything when the result would go negative. The surviving
    /// entry's price is updated to the execution price, and `last_updated`
    /// is refreshed on every successful call.
    pub fn apply_delta(
        &mut self,
        symbol: &str,
        delta_shares: i64,
        price: f64,
    ) -> Result<(), CoreError> {
        let symbol = symbol.trim().to_uppercase();
        let held = self.stocks.get(&symbol).map_or(0, |s| s.shares);

        let new_shares = if delta_shares >= 0 {
            held.checked_add(delta_shares as u64)
                .ok_or(CoreError::InvalidQuantity(delta_shares))?
        } else {
            let requested = delta_shares.unsigned_abs();
            held.checked_sub(requested)
                .ok_or_else(|| CoreError::InsufficientShares {
                    symbol: symbol.clone(),
                    held,
                    requested,
                })?
        };

        if new_shares == 0 {
            self.stocks.remove(&symbol);
        } else {
            let entry = self
                .stocks
                .entry(symbol.clone())
                .or_insert_with(|| Stock::new(symbol.as_str(), 0, price));
            entry.shares = new_shares;
            entry.current_price = price;
        }

        self.last_updated = Utc::now();
        Ok(())
    }
}
