use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

use super::traits::{CredentialSource, PriceSource};

/// HTTP client for a remote brokerage backend.
///
/// Expected endpoints:
/// - `GET {base}/quotes/{symbol}` → `{"symbol": "AAPL", "price": 150.0}`
/// - `POST {base}/login` with `{"username": …, "password": …}`
///   → `{"authenticated": true}`
///
/// Implements both `PriceSource` and `CredentialSource`, so one
/// configured backend serves quotes and logins.
pub struct RemoteBrokerage {
    base_url: String,
    client: Client,
}

impl RemoteBrokerage {
    pub fn new(base_url: impl Into<String>) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

// ── Brokerage API request/response types ────────────────────────────

#[derive(Deserialize)]
struct QuoteResponse {
    price: f64,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    authenticated: bool,
}

#[async_trait]
impl PriceSource for RemoteBrokerage {
    fn name(&self) -> &str {
        "Remote Brokerage"
    }

    async fn current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let symbol = symbol.to_uppercase();
        let url = format!("{}/quotes/{symbol}", self.base_url);
        debug!("fetching quote for {symbol}");

        let resp = self.client.get(&url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CoreError::PriceUnavailable(symbol));
        }

        let quote: QuoteResponse = resp.json().await.map_err(|e| CoreError::Api {
            provider: "Remote Brokerage".into(),
            message: format!("Failed to parse quote for {symbol}: {e}"),
        })?;

        Ok(quote.price)
    }
}

#[async_trait]
impl CredentialSource for RemoteBrokerage {
    fn name(&self) -> &str {
        "Remote Brokerage"
    }

    async fn verify(&self, username: &str, password: &str) -> Result<bool, CoreError> {
        let url = format!("{}/login", self.base_url);

        let resp: LoginResponse = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Remote Brokerage".into(),
                message: format!("Failed to parse login response: {e}"),
            })?;

        Ok(resp.authenticated)
    }
}
