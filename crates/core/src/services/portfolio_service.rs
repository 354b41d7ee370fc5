use chrono::Utc;
use log::debug;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::chart::ValuePoint;
use crate::models::order::Order;
use crate::models::portfolio::Portfolio;
use crate::models::summary::PortfolioSummary;
use crate::services::order_validator::OrderValidator;
use crate::services::pricing_service::PricingService;

/// Holds each user's portfolio for the session and orchestrates order
/// execution: validate → price → apply → store.
///
/// One portfolio per user, last write wins. `&mut self` on every mutating
/// path is the mutual-exclusion scope around execution, so there is never
/// a partially applied order to observe.
pub struct PortfolioService {
    portfolios: HashMap<String, Portfolio>,
    history: HashMap<String, Vec<ValuePoint>>,
    validator: OrderValidator,
}

impl PortfolioService {
    pub fn new() -> Self {
        Self {
            portfolios: HashMap::new(),
            history: HashMap::new(),
            validator: OrderValidator::new(),
        }
    }

    /// Seed or replace a user's portfolio (e.g., holdings fetched from the
    /// backend at login). Takes the valuation snapshot that daily change
    /// is measured against, unless the portfolio already carries one, and
    /// records the opening value point.
    pub fn load_portfolio(&mut self, user_id: impl Into<String>, mut portfolio: Portfolio) {
        let user_id = user_id.into();
        if portfolio.previous_close.is_none() {
            portfolio.take_snapshot();
        }
        self.record_value(&user_id, &portfolio);
        self.portfolios.insert(user_id, portfolio);
    }

    /// The current portfolio for a user.
    pub fn get_portfolio(&self, user_id: &str) -> Result<&Portfolio, CoreError> {
        self.portfolios
            .get(user_id)
            .ok_or_else(|| CoreError::PortfolioNotFound(user_id.to_string()))
    }

    /// Validate and execute one order, returning the updated portfolio.
    ///
    /// A rejected order leaves the stored portfolio untouched, and the
    /// rejection is idempotent: re-submitting yields the same reason and
    /// still no mutation. The market price is resolved only after the
    /// order passes validation, and the mutation happens on a working copy
    /// that replaces the stored portfolio only once everything succeeded.
    pub async fn execute_order(
        &mut self,
        pricing: &PricingService,
        user_id: &str,
        order: &Order,
    ) -> Result<Portfolio, CoreError> {
        let portfolio = self.get_portfolio(user_id)?;
        self.validator.validate(portfolio, order)?;

        let price = pricing.current_price(&order.symbol).await?;

        let mut updated = portfolio.clone();
        updated.apply_delta(&order.symbol, order.delta(), price)?;

        debug!(
            "executed {} {} x{} for {user_id} at {price} (order {})",
            order.side, order.symbol, order.shares, order.id
        );

        self.record_value(user_id, &updated);
        self.portfolios.insert(user_id.to_string(), updated.clone());
        Ok(updated)
    }

    /// Re-resolve the current price of every held position and store the
    /// repriced portfolio. Returns the updated portfolio.
    pub async fn refresh_prices(
        &mut self,
        pricing: &PricingService,
        user_id: &str,
    ) -> Result<Portfolio, CoreError> {
        let mut updated = self.get_portfolio(user_id)?.clone();

        let symbols: Vec<String> = updated.stocks.keys().cloned().collect();
        for symbol in symbols {
            let price = pricing.current_price(&symbol).await?;
            if let Some(stock) = updated.stocks.get_mut(&symbol) {
                stock.current_price = price;
            }
        }
        updated.last_updated = Utc::now();

        self.record_value(user_id, &updated);
        self.portfolios.insert(user_id.to_string(), updated.clone());
        Ok(updated)
    }

    /// Valuation summary for the UI (summary card + holdings table).
    pub fn summarize(&self, user_id: &str) -> Result<PortfolioSummary, CoreError> {
        Ok(PortfolioSummary::of(self.get_portfolio(user_id)?))
    }

    /// Session value history for the performance chart. Empty for users
    /// with no loaded portfolio.
    pub fn value_history(&self, user_id: &str) -> &[ValuePoint] {
        self.history.get(user_id).map_or(&[], Vec::as_slice)
    }

    /// Drop a user's portfolio and history (session end).
    /// Returns whether a portfolio existed.
    pub fn unload(&mut self, user_id: &str) -> bool {
        self.history.remove(user_id);
        self.portfolios.remove(user_id).is_some()
    }

    fn record_value(&mut self, user_id: &str, portfolio: &Portfolio) {
        self.history
            .entry(user_id.to_string())
            .or_default()
            .push(ValuePoint {
                at: Utc::now(),
                total_value: portfolio.total_value(),
            });
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
