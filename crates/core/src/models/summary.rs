use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::portfolio::Portfolio;

/// Valuation snapshot of the whole portfolio, shaped for the frontend's
/// summary card and holdings table.
///
/// The core computes these — the frontend just renders them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// When the underlying portfolio was last mutated or repriced
    pub as_of: DateTime<Utc>,

    /// Total market value of all held positions
    pub total_value: f64,

    /// Change since the session's valuation snapshot (absolute)
    pub daily_change: f64,

    /// Change since the session's valuation snapshot (percent)
    pub daily_change_pct: f64,

    /// Per-position breakdown, sorted by symbol
    pub holdings: Vec<HoldingSummary>,
}

/// One row of the holdings table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingSummary {
    /// Ticker symbol
    pub symbol: String,

    /// Shares held
    pub shares: u64,

    /// Price per share used in the valuation
    pub current_price: f64,

    /// Market value of the position
    pub value: f64,

    /// This position's share of total portfolio value × 100
    pub allocation_pct: f64,
}

impl PortfolioSummary {
    /// Compute the summary for a portfolio's current state.
    #[must_use]
    pub fn of(portfolio: &Portfolio) -> Self {
        let total_value = portfolio.total_value();
        let change = portfolio.daily_change();

        let holdings = portfolio
            .holdings()
            .into_iter()
            .map(|stock| HoldingSummary {
                symbol: stock.symbol.clone(),
                shares: stock.shares,
                current_price: stock.current_price,
                value: stock.value(),
                allocation_pct: if total_value > 0.0 {
                    stock.value() / total_value * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            as_of: portfolio.last_updated,
            total_value,
            daily_change: change.absolute,
            daily_change_pct: change.percent,
            holdings,
        }
    }
}
