use async_trait::async_trait;

use crate::errors::CoreError;

/// Trait abstraction for market-data backends.
///
/// Each backend (static demo table, remote brokerage API, Yahoo Finance)
/// implements this trait. If one backend stops working or changes, only
/// that implementation is replaced; the rest of the codebase is untouched.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Current market price for one share of `symbol`.
    async fn current_price(&self, symbol: &str) -> Result<f64, CoreError>;
}

/// Trait abstraction for credential backends.
///
/// A single query method: does this username/password pair check out.
/// The mock keeps a fixed table; the remote implementation asks the
/// brokerage API.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Verify a username/password pair. `Ok(false)` covers both an
    /// unknown user and a wrong password; callers cannot tell the two
    /// apart.
    async fn verify(&self, username: &str, password: &str) -> Result<bool, CoreError>;
}
