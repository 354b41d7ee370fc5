use crate::errors::CoreError;
use crate::models::order::{Order, OrderSide};
use crate::models::portfolio::Portfolio;

/// Decides whether an order is admissible against a portfolio.
///
/// Pure decision logic — no I/O, no mutation. PortfolioService runs it
/// before touching any state, and it can be exercised on its own.
pub struct OrderValidator;

impl OrderValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check an order against the current portfolio.
    ///
    /// Rules, in order (the first failing rule is the reported reason):
    /// 1. The share count must be positive.
    /// 2. The symbol must be non-empty.
    /// 3. Sells must be covered by held shares.
    ///
    /// Buys have no quantity ceiling; funds sufficiency belongs to the
    /// backing account, which is not part of this model.
    pub fn validate(&self, portfolio: &Portfolio, order: &Order) -> Result<(), CoreError> {
        if order.shares <= 0 {
            return Err(CoreError::InvalidQuantity(order.shares));
        }

        if order.symbol.is_empty() {
            return Err(CoreError::InvalidSymbol);
        }

        if order.side == OrderSide::Sell {
            let held = portfolio.find(&order.symbol).map_or(0, |s| s.shares);
            let requested = order.shares as u64;
            if held < requested {
                return Err(CoreError::InsufficientShares {
                    symbol: order.symbol.clone(),
                    held,
                    requested,
                });
            }
        }

        Ok(())
    }
}

impl Default for OrderValidator {
    fn default() -> Self {
        Self::new()
    }
}
