use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CoreError;

use super::traits::{CredentialSource, PriceSource};

/// Fixed in-memory price table: the backend the desktop client runs
/// against until a real brokerage connection is configured, and the
/// fixture tests inject.
pub struct StaticPriceSource {
    prices: HashMap<String, f64>,
}

impl StaticPriceSource {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    /// Table pre-seeded with the demo tickers.
    pub fn with_demo_prices() -> Self {
        let mut source = Self::new();
        source.set_price("AAPL", 150.00);
        source.set_price("GOOGL", 2800.00);
        source.set_price("MSFT", 305.50);
        source.set_price("AMZN", 3300.00);
        source.set_price("TSLA", 725.00);
        source
    }

    /// Insert or replace the quoted price for a symbol.
    pub fn set_price(&mut self, symbol: impl Into<String>, price: f64) {
        self.prices.insert(symbol.into().to_uppercase(), price);
    }
}

impl Default for StaticPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    fn name(&self) -> &str {
        "Static"
    }

    async fn current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let symbol = symbol.to_uppercase();
        self.prices
            .get(&symbol)
            .copied()
            .ok_or(CoreError::PriceUnavailable(symbol))
    }
}

/// Fixed credential table for offline/demo use.
pub struct MockCredentialSource {
    credentials: HashMap<String, String>,
}

impl MockCredentialSource {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            credentials: HashMap::new(),
        }
    }

    /// Table pre-seeded with the demo account.
    pub fn with_demo_users() -> Self {
        let mut source = Self::new();
        source.add_user("admin", "password123");
        source
    }

    /// Insert or replace a username/password pair.
    pub fn add_user(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.credentials.insert(username.into(), password.into());
    }
}

impl Default for MockCredentialSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialSource for MockCredentialSource {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn verify(&self, username: &str, password: &str) -> Result<bool, CoreError> {
        // Exact match on both fields; an unknown user and a wrong password
        // produce the same answer.
        Ok(self
            .credentials
            .get(username)
            .is_some_and(|expected| expected == password))
    }
}
