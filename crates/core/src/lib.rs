pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use models::chart::ValuePoint;
use models::order::{Order, OrderSide};
use models::portfolio::Portfolio;
use models::stock::Stock;
use models::summary::PortfolioSummary;
use providers::mock::{MockCredentialSource, StaticPriceSource};
use providers::registry::PriceSourceRegistry;
use providers::remote::RemoteBrokerage;
use providers::traits::CredentialSource;
use providers::yahoo_finance::YahooFinanceSource;
use services::auth_service::AuthService;
use services::portfolio_service::PortfolioService;
use services::pricing_service::PricingService;

use errors::CoreError;

/// Account that `with_mock_backend` seeds with sample holdings.
const DEMO_USER: &str = "admin";

/// Session state: who, if anyone, is logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Session {
    Unauthenticated,
    Authenticated { user_id: String },
}

/// Main entry point for the portfolio manager core library.
/// Owns the services, the session state, and every portfolio the frontend
/// can see; the UI treats it as a function library with a few awaitable
/// calls and re-renders from the returned values.
#[must_use]
pub struct PortfolioManager {
    auth_service: AuthService,
    portfolio_service: PortfolioService,
    pricing_service: PricingService,
    session: Session,
}

impl std::fmt::Debug for PortfolioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioManager")
            .field("session", &self.session)
            .field("price_sources", &self.pricing_service.source_names())
            .finish()
    }
}

impl PortfolioManager {
    /// Wire the core against explicit backends.
    pub fn new(credentials: Box<dyn CredentialSource>, registry: PriceSourceRegistry) -> Self {
        Self {
            auth_service: AuthService::new(credentials),
            portfolio_service: PortfolioService::new(),
            pricing_service: PricingService::new(registry),
            session: Session::Unauthenticated,
        }
    }

    /// Fully mocked wiring: demo credentials, a static price table, and a
    /// sample portfolio for the demo account. This is what the desktop
    /// client runs until a real brokerage backend is configured.
    pub fn with_mock_backend() -> Self {
        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(StaticPriceSource::with_demo_prices()));

        let mut manager = Self::new(Box::new(MockCredentialSource::with_demo_users()), registry);
        manager.load_portfolio(
            DEMO_USER,
            Portfolio::from_stocks(vec![
                Stock::new("AAPL", 10, 150.00),
                Stock::new("GOOGL", 5, 2800.00),
            ]),
        );
        manager
    }

    /// Live wiring against a brokerage backend: the backend serves both
    /// logins and quotes, with Yahoo Finance as the quote fallback.
    /// Portfolios are loaded separately once the user is authenticated.
    pub fn with_remote_backend(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();

        let mut registry = PriceSourceRegistry::new();
        registry.register(Box::new(RemoteBrokerage::new(api_url.clone())));
        if let Ok(yahoo) = YahooFinanceSource::new() {
            registry.register(Box::new(yahoo));
        }

        Self::new(Box::new(RemoteBrokerage::new(api_url)), registry)
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Verify credentials and, on success, open a session for that user.
    /// A failed attempt closes any existing session.
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        if self.auth_service.authenticate(username, password).await {
            self.session = Session::Authenticated {
                user_id: username.to_string(),
            };
            true
        } else {
            self.session = Session::Unauthenticated;
            false
        }
    }

    /// Close the current session.
    pub fn logout(&mut self) {
        self.session = Session::Unauthenticated;
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        match &self.session {
            Session::Authenticated { user_id } => Some(user_id),
            Session::Unauthenticated => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Seed or replace a user's portfolio (e.g., holdings fetched from
    /// the backend at login).
    pub fn load_portfolio(&mut self, user_id: impl Into<String>, portfolio: Portfolio) {
        self.portfolio_service.load_portfolio(user_id, portfolio);
    }

    /// Read-only view of a user's portfolio.
    pub fn get_portfolio(&self, user_id: &str) -> Result<&Portfolio, CoreError> {
        self.portfolio_service.get_portfolio(user_id)
    }

    /// Valuation summary for the UI (summary card + holdings table).
    pub fn summary(&self, user_id: &str) -> Result<PortfolioSummary, CoreError> {
        self.portfolio_service.summarize(user_id)
    }

    /// Session value history for the performance chart.
    #[must_use]
    pub fn value_history(&self, user_id: &str) -> &[ValuePoint] {
        self.portfolio_service.value_history(user_id)
    }

    // ── Orders ──────────────────────────────────────────────────────

    /// Validate and execute a buy/sell order against the logged-in user's
    /// account, returning the updated valuation for the UI to render.
    ///
    /// Requires an open session for `user_id`; a rejected or failed order
    /// leaves the portfolio untouched.
    pub async fn execute_order(
        &mut self,
        user_id: &str,
        symbol: &str,
        shares: i64,
        side: OrderSide,
    ) -> Result<PortfolioSummary, CoreError> {
        self.require_session(user_id)?;
        let order = Order::new(symbol, shares, side);
        let updated = self
            .portfolio_service
            .execute_order(&self.pricing_service, user_id, &order)
            .await?;
        Ok(PortfolioSummary::of(&updated))
    }

    /// Re-quote every held position from the price sources and return the
    /// refreshed valuation.
    pub async fn refresh_prices(&mut self, user_id: &str) -> Result<PortfolioSummary, CoreError> {
        self.require_session(user_id)?;
        let updated = self
            .portfolio_service
            .refresh_prices(&self.pricing_service, user_id)
            .await?;
        Ok(PortfolioSummary::of(&updated))
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export a user's holdings as a pretty-printed JSON string
    /// (unencrypted snapshot for debugging/display).
    pub fn export_holdings_to_json(&self, user_id: &str) -> Result<String, CoreError> {
        let portfolio = self.get_portfolio(user_id)?;
        serde_json::to_string_pretty(&portfolio.holdings())
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize holdings: {e}")))
    }

    /// Export a user's holdings as a CSV string.
    /// Columns: symbol, shares, price, value
    pub fn export_holdings_to_csv(&self, user_id: &str) -> Result<String, CoreError> {
        let portfolio = self.get_portfolio(user_id)?;
        let mut csv = String::from("symbol,shares,price,value\n");
        for stock in portfolio.holdings() {
            csv.push_str(&format!(
                "{},{},{:.2},{:.2}\n",
                stock.symbol,
                stock.shares,
                stock.current_price,
                stock.value(),
            ));
        }
        Ok(csv)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Mutating account operations require an open session for that user.
    fn require_session(&self, user_id: &str) -> Result<(), CoreError> {
        match &self.session {
            Session::Authenticated { user_id: current } if current == user_id => Ok(()),
            _ => Err(CoreError::AuthenticationFailed),
        }
    }
}
