use thiserror::Error;

/// Unified error type for the entire portfolio-manager-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Order admissibility ─────────────────────────────────────────
    #[error("Order quantity must be a positive number of shares (got {0})")]
    InvalidQuantity(i64),

    #[error("Order symbol must not be empty")]
    InvalidSymbol,

    #[error("Cannot sell {requested} shares of {symbol} — only {held} held")]
    InsufficientShares {
        symbol: String,
        held: u64,
        requested: u64,
    },

    // ── Account / session ───────────────────────────────────────────
    #[error("No portfolio found for user: {0}")]
    PortfolioNotFound(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    // ── Pricing / API / Network ─────────────────────────────────────
    #[error("Price not available for {0}")]
    PriceUnavailable(String),

    #[error("No price source registered")]
    NoPriceSource,

    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so
        // credentials or tokens embedded in request URLs never reach logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}
