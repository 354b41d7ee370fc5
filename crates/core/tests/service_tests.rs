// ═══════════════════════════════════════════════════════════════════
//  Service Tests — PricingService fallback, PortfolioService
//  orchestration (validate → price → apply → store)
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::collections::HashMap;

use portfolio_manager_core::errors::CoreError;
use portfolio_manager_core::models::order::Order;
use portfolio_manager_core::models::portfolio::Portfolio;
use portfolio_manager_core::models::stock::Stock;
use portfolio_manager_core::providers::mock::StaticPriceSource;
use portfolio_manager_core::providers::registry::PriceSourceRegistry;
use portfolio_manager_core::providers::traits::PriceSource;
use portfolio_manager_core::services::portfolio_service::PortfolioService;
use portfolio_manager_core::services::pricing_service::PricingService;

// ═══════════════════════════════════════════════════════════════════
//  Mock Sources
// ═══════════════════════════════════════════════════════════════════

/// A source that always fails (for testing fallback behavior).
struct FailingPriceSource;

#[async_trait]
impl PriceSource for FailingPriceSource {
    fn name(&self) -> &str {
        "FailingMock"
    }

    async fn current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        Err(CoreError::Api {
            provider: "FailingMock".into(),
            message: format!("Simulated failure for {symbol}"),
        })
    }
}

/// A source that answers every symbol with one fixed (possibly bogus)
/// quote — used to exercise the quote sanity check.
struct FixedQuoteSource {
    quote: f64,
}

#[async_trait]
impl PriceSource for FixedQuoteSource {
    fn name(&self) -> &str {
        "FixedQuote"
    }

    async fn current_price(&self, _symbol: &str) -> Result<f64, CoreError> {
        Ok(self.quote)
    }
}

fn demo_prices() -> HashMap<String, f64> {
    let mut prices = HashMap::new();
    prices.insert("AAPL".into(), 150.00);
    prices.insert("GOOGL".into(), 2800.00);
    prices.insert("MSFT".into(), 305.50);
    prices
}

fn make_pricing_with_table(prices: HashMap<String, f64>) -> PricingService {
    let mut source = StaticPriceSource::new();
    for (symbol, price) in prices {
        source.set_price(symbol, price);
    }
    let mut registry = PriceSourceRegistry::new();
    registry.register(Box::new(source));
    PricingService::new(registry)
}

fn make_pricing() -> PricingService {
    make_pricing_with_table(demo_prices())
}

fn sample_portfolio() -> Portfolio {
    Portfolio::from_stocks(vec![
        Stock::new("AAPL", 10, 150.00),
        Stock::new("GOOGL", 5, 2800.00),
    ])
}

/// A service pre-loaded with the sample portfolio for one user.
fn make_service(user_id: &str) -> PortfolioService {
    let mut service = PortfolioService::new();
    service.load_portfolio(user_id, sample_portfolio());
    service
}

// ═══════════════════════════════════════════════════════════════════
//  PricingService
// ═══════════════════════════════════════════════════════════════════

mod pricing {
    use super::*;

    #[tokio::test]
    async fn resolves_known_symbol() {
        let pricing = make_pricing();
        assert_eq!(pricing.current_price("AAPL").await.unwrap(), 150.0);
    }

    #[tokio::test]
    async fn resolves_lowercase_symbol() {
        let pricing = make_pricing();
        assert_eq!(pricing.current_price("aapl").await.unwrap(), 150.0);
    }

    #[tokio::test]
    async fn unknown_symbol_is_price_unavailable() {
        let pricing = make_pricing();
        let result = pricing.current_price("ZZZZ").await;
        match result.unwrap_err() {
            CoreError::PriceUnavailable(symbol) => assert_eq!(symbol, "ZZZZ"),
            other => panic!("Expected PriceUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_registry_fails() {
        let pricing = PricingService::new(PriceSourceRegistry::new());
        let result = pricing.current_price("AAPL").await;
        assert!(matches!(result.unwrap_err(), CoreError::NoPriceSource));
    }

    #[tokio::test]
    async fn falls_back_when_primary_fails() {
        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(FailingPriceSource));
        registry.register(Box::new(StaticPriceSource::with_demo_prices()));

        let pricing = PricingService::new(registry);
        assert_eq!(pricing.current_price("AAPL").await.unwrap(), 150.0);
    }

    #[tokio::test]
    async fn all_sources_failing_returns_last_error() {
        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(FailingPriceSource));
        registry.register(Box::new(FailingPriceSource));

        let pricing = PricingService::new(registry);
        let result = pricing.current_price("AAPL").await;
        assert!(matches!(result.unwrap_err(), CoreError::Api { .. }));
    }

    #[tokio::test]
    async fn negative_quote_is_skipped() {
        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(FixedQuoteSource { quote: -1.0 }));
        registry.register(Box::new(StaticPriceSource::with_demo_prices()));

        let pricing = PricingService::new(registry);
        assert_eq!(pricing.current_price("AAPL").await.unwrap(), 150.0);
    }

    #[tokio::test]
    async fn non_finite_quote_is_skipped() {
        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(FixedQuoteSource { quote: f64::NAN }));
        registry.register(Box::new(StaticPriceSource::with_demo_prices()));

        let pricing = PricingService::new(registry);
        assert_eq!(pricing.current_price("AAPL").await.unwrap(), 150.0);
    }

    #[tokio::test]
    async fn invalid_quote_with_no_fallback_is_an_api_error() {
        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(FixedQuoteSource { quote: -1.0 }));

        let pricing = PricingService::new(registry);
        let result = pricing.current_price("AAPL").await;
        assert!(matches!(result.unwrap_err(), CoreError::Api { .. }));
    }

    #[tokio::test]
    async fn zero_quote_is_accepted() {
        // Delisted / worthless is a valid market answer.
        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(FixedQuoteSource { quote: 0.0 }));

        let pricing = PricingService::new(registry);
        assert_eq!(pricing.current_price("AAPL").await.unwrap(), 0.0);
    }

    #[test]
    fn source_names_in_fallback_order() {
        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(FailingPriceSource));
        registry.register(Box::new(StaticPriceSource::new()));

        let pricing = PricingService::new(registry);
        assert_eq!(pricing.source_names(), vec!["FailingMock", "Static"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioService — loading & lookup
// ═══════════════════════════════════════════════════════════════════

mod portfolio_lookup {
    use super::*;

    #[test]
    fn unknown_user_fails() {
        let service = PortfolioService::new();
        let result = service.get_portfolio("nobody");
        match result.unwrap_err() {
            CoreError::PortfolioNotFound(user) => assert_eq!(user, "nobody"),
            other => panic!("Expected PortfolioNotFound, got {other:?}"),
        }
    }

    #[test]
    fn load_then_get() {
        let service = make_service("alice");
        let portfolio = service.get_portfolio("alice").unwrap();
        assert_eq!(portfolio.total_value(), 15_500.0);
    }

    #[test]
    fn load_takes_daily_change_snapshot() {
        let service = make_service("alice");
        let portfolio = service.get_portfolio("alice").unwrap();
        assert_eq!(portfolio.previous_close, Some(15_500.0));
    }

    #[test]
    fn load_preserves_existing_snapshot() {
        let mut service = PortfolioService::new();
        let mut portfolio = sample_portfolio();
        portfolio.previous_close = Some(12_000.0);
        service.load_portfolio("alice", portfolio);

        assert_eq!(
            service.get_portfolio("alice").unwrap().previous_close,
            Some(12_000.0)
        );
    }

    #[test]
    fn portfolios_are_per_user() {
        let mut service = make_service("alice");
        service.load_portfolio("bob", Portfolio::default());

        assert_eq!(service.get_portfolio("alice").unwrap().len(), 2);
        assert!(service.get_portfolio("bob").unwrap().is_empty());
    }

    #[test]
    fn unload_removes_portfolio() {
        let mut service = make_service("alice");
        assert!(service.unload("alice"));
        assert!(service.get_portfolio("alice").is_err());
        assert!(!service.unload("alice"));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioService — execute_order
// ═══════════════════════════════════════════════════════════════════

mod execute_order {
    use super::*;

    #[tokio::test]
    async fn buy_adds_to_existing_position() {
        let mut service = make_service("alice");
        let pricing = make_pricing();

        let updated = service
            .execute_order(&pricing, "alice", &Order::buy("AAPL", 5))
            .await
            .unwrap();

        assert_eq!(updated.find("AAPL").unwrap().shares, 15);
        // No other symbol's shares changed
        assert_eq!(updated.find("GOOGL").unwrap().shares, 5);
        // 15 * 150 + 5 * 2800 = 16_250
        assert_eq!(updated.total_value(), 16_250.0);
    }

    #[tokio::test]
    async fn buy_opens_new_position() {
        let mut service = make_service("alice");
        let pricing = make_pricing();

        let updated = service
            .execute_order(&pricing, "alice", &Order::buy("MSFT", 2))
            .await
            .unwrap();

        let msft = updated.find("MSFT").unwrap();
        assert_eq!(msft.shares, 2);
        assert_eq!(msft.current_price, 305.5);
    }

    #[tokio::test]
    async fn buy_executes_at_market_price_not_stored_price() {
        let mut service = make_service("alice");
        // The market has moved since the portfolio was loaded.
        let mut prices = demo_prices();
        prices.insert("AAPL".into(), 155.00);
        let pricing = make_pricing_with_table(prices);

        let updated = service
            .execute_order(&pricing, "alice", &Order::buy("AAPL", 5))
            .await
            .unwrap();

        assert_eq!(updated.find("AAPL").unwrap().current_price, 155.0);
    }

    #[tokio::test]
    async fn sell_reduces_position() {
        let mut service = make_service("alice");
        let pricing = make_pricing();

        let updated = service
            .execute_order(&pricing, "alice", &Order::sell("AAPL", 4))
            .await
            .unwrap();

        assert_eq!(updated.find("AAPL").unwrap().shares, 6);
    }

    #[tokio::test]
    async fn sell_entire_position_removes_entry() {
        let mut service = make_service("alice");
        let pricing = make_pricing();
        let before = service.get_portfolio("alice").unwrap().total_value();

        let updated = service
            .execute_order(&pricing, "alice", &Order::sell("GOOGL", 5))
            .await
            .unwrap();

        assert!(updated.find("GOOGL").is_none());
        assert_eq!(updated.total_value(), before - 5.0 * 2800.0);
    }

    #[tokio::test]
    async fn oversell_is_rejected_without_mutation() {
        let mut service = make_service("alice");
        let pricing = make_pricing();

        let result = service
            .execute_order(&pricing, "alice", &Order::sell("GOOGL", 10))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            CoreError::InsufficientShares { .. }
        ));
        let stored = service.get_portfolio("alice").unwrap();
        assert_eq!(stored.find("GOOGL").unwrap().shares, 5);
        assert_eq!(stored.total_value(), 15_500.0);
    }

    #[tokio::test]
    async fn rejection_is_idempotent() {
        let mut service = make_service("alice");
        let pricing = make_pricing();

        for _ in 0..2 {
            let result = service
                .execute_order(&pricing, "alice", &Order::sell("GOOGL", 10))
                .await;
            assert!(matches!(
                result.unwrap_err(),
                CoreError::InsufficientShares { .. }
            ));
            assert_eq!(
                service.get_portfolio("alice").unwrap().total_value(),
                15_500.0
            );
        }
    }

    #[tokio::test]
    async fn validation_runs_before_price_resolution() {
        // With a failing price source, an invalid quantity must still be
        // reported as InvalidQuantity — the order never reaches pricing.
        let mut service = make_service("alice");
        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(FailingPriceSource));
        let pricing = PricingService::new(registry);

        let result = service
            .execute_order(&pricing, "alice", &Order::buy("AAPL", 0))
            .await;

        assert!(matches!(result.unwrap_err(), CoreError::InvalidQuantity(0)));
    }

    #[tokio::test]
    async fn unavailable_price_fails_without_mutation() {
        let mut service = make_service("alice");
        let pricing = make_pricing();

        let result = service
            .execute_order(&pricing, "alice", &Order::buy("ZZZZ", 1))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            CoreError::PriceUnavailable(_)
        ));
        assert_eq!(service.get_portfolio("alice").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_user_fails() {
        let mut service = PortfolioService::new();
        let pricing = make_pricing();

        let result = service
            .execute_order(&pricing, "nobody", &Order::buy("AAPL", 1))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            CoreError::PortfolioNotFound(_)
        ));
    }

    #[tokio::test]
    async fn order_symbol_is_normalized() {
        let mut service = make_service("alice");
        let pricing = make_pricing();

        let updated = service
            .execute_order(&pricing, "alice", &Order::buy(" aapl ", 5))
            .await
            .unwrap();

        assert_eq!(updated.find("AAPL").unwrap().shares, 15);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioService — refresh, summary, history
// ═══════════════════════════════════════════════════════════════════

mod refresh_and_reporting {
    use super::*;

    #[tokio::test]
    async fn refresh_reprices_all_positions() {
        let mut service = make_service("alice");
        let mut prices = demo_prices();
        prices.insert("AAPL".into(), 160.00);
        prices.insert("GOOGL".into(), 2750.00);
        let pricing = make_pricing_with_table(prices);

        let updated = service.refresh_prices(&pricing, "alice").await.unwrap();

        assert_eq!(updated.find("AAPL").unwrap().current_price, 160.0);
        assert_eq!(updated.find("GOOGL").unwrap().current_price, 2750.0);
        assert_eq!(updated.total_value(), 10.0 * 160.0 + 5.0 * 2750.0);
    }

    #[tokio::test]
    async fn refresh_keeps_share_counts() {
        let mut service = make_service("alice");
        let pricing = make_pricing();

        let updated = service.refresh_prices(&pricing, "alice").await.unwrap();

        assert_eq!(updated.find("AAPL").unwrap().shares, 10);
        assert_eq!(updated.find("GOOGL").unwrap().shares, 5);
    }

    #[tokio::test]
    async fn refresh_with_dead_feed_fails() {
        let mut service = make_service("alice");
        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(FailingPriceSource));
        let pricing = PricingService::new(registry);

        assert!(service.refresh_prices(&pricing, "alice").await.is_err());
    }

    #[test]
    fn summarize_known_user() {
        let service = make_service("alice");
        let summary = service.summarize("alice").unwrap();
        assert_eq!(summary.total_value, 15_500.0);
        assert_eq!(summary.holdings.len(), 2);
    }

    #[test]
    fn summarize_unknown_user_fails() {
        let service = PortfolioService::new();
        assert!(service.summarize("nobody").is_err());
    }

    #[tokio::test]
    async fn value_history_grows_with_each_mutation() {
        let mut service = make_service("alice");
        let pricing = make_pricing();

        // Load recorded the opening point.
        assert_eq!(service.value_history("alice").len(), 1);
        assert_eq!(service.value_history("alice")[0].total_value, 15_500.0);

        service
            .execute_order(&pricing, "alice", &Order::buy("AAPL", 5))
            .await
            .unwrap();

        let history = service.value_history("alice");
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].total_value, 16_250.0);
    }

    #[tokio::test]
    async fn rejected_orders_leave_history_untouched() {
        let mut service = make_service("alice");
        let pricing = make_pricing();

        let _ = service
            .execute_order(&pricing, "alice", &Order::sell("GOOGL", 10))
            .await;

        assert_eq!(service.value_history("alice").len(), 1);
    }

    #[test]
    fn value_history_empty_for_unknown_user() {
        let service = PortfolioService::new();
        assert!(service.value_history("nobody").is_empty());
    }
}
