use async_trait::async_trait;

use crate::errors::CoreError;

use super::traits::PriceSource;

/// Yahoo Finance source for live equity quotes.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, indices.
///
/// Uses the `yahoo_finance_api` crate which wraps Yahoo Finance's public
/// endpoints. Quotes come back in the stock's native currency (typically
/// USD).
pub struct YahooFinanceSource {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceSource {
    pub fn new() -> Result<Self, CoreError> {
        let connector =
            yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to create connector: {e}"),
            })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl PriceSource for YahooFinanceSource {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch latest quote for {symbol}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("No quote data for {symbol}: {e}"),
        })?;

        Ok(quote.close)
    }
}
