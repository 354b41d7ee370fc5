use log::{debug, warn};

use crate::errors::CoreError;
use crate::providers::registry::PriceSourceRegistry;

/// Resolves current market prices through the registered sources.
///
/// Sources are tried in registration order. If the primary fails (API
/// down, unknown symbol, rate limited), the next one answers. Quotes must
/// be finite and non-negative; anything else counts as a source failure
/// and the fallback continues.
pub struct PricingService {
    registry: PriceSourceRegistry,
}

impl PricingService {
    pub fn new(registry: PriceSourceRegistry) -> Self {
        Self { registry }
    }

    /// Names of the registered sources, in fallback order.
    pub fn source_names(&self) -> Vec<String> {
        self.registry.source_names()
    }

    /// Current market price for one share of `symbol`.
    pub async fn current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        if self.registry.is_empty() {
            return Err(CoreError::NoPriceSource);
        }

        let mut last_error = None;
        for source in self.registry.sources() {
            match source.current_price(symbol).await {
                Ok(price) => {
                    if !price.is_finite() || price < 0.0 {
                        warn!("{} returned invalid quote {price} for {symbol}", source.name());
                        last_error = Some(CoreError::Api {
                            provider: source.name().to_string(),
                            message: format!(
                                "Invalid quote for {symbol}: {price} (must be finite and non-negative)"
                            ),
                        });
                        continue;
                    }
                    debug!("{} quoted {symbol} at {price}", source.name());
                    return Ok(price);
                }
                Err(e) => {
                    last_error = Some(e);
                    // Try next source
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoPriceSource))
    }
}
