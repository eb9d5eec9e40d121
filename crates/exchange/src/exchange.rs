use chrono::Duration;
use indexmap::IndexMap;
use log::{debug, info, warn};
use parking_lot::RwLock;
use rust_decimal::{Decimal, MathematicalOps};
use std::fmt;
use std::sync::Arc;
use stocks_clock::{Clock, SystemClock};
use stocks_core::{Price, Side, Symbol, Timestamp, Trade, validate_member};

use crate::config::ExchangeConfig;
use crate::error::{ExchangeError, Result};
use crate::ledger::TradeLedger;
use crate::stock::Stock;

/// Default window for volume-weighted prices, in minutes
pub const DEFAULT_PRICE_WINDOW_MINUTES: u32 = 5;

/// A stock exchange for trading individual stocks
///
/// The exchange owns the registry of listed stocks and the trade ledger.
/// Both live behind a single lock per exchange: listing and trade recording
/// take it exclusively, metric queries share it.
pub struct Exchange {
    name: String,
    /// Time source for trade stamps and price windows
    clock: Arc<dyn Clock>,
    price_window: Duration,
    state: RwLock<ExchangeState>,
}

#[derive(Default)]
struct ExchangeState {
    /// Listed stocks in listing order
    stocks: IndexMap<Symbol, Arc<Stock>>,
    ledger: TradeLedger,
}

impl Exchange {
    /// Create an exchange on the system clock with the default price window
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Self::with_clock(name, Arc::new(SystemClock::new()))
    }

    /// Create an exchange on a specific clock
    pub fn with_clock(name: impl Into<String>, clock: Arc<dyn Clock>) -> Arc<Self> {
        Self::build(
            name.into(),
            clock,
            Duration::minutes(DEFAULT_PRICE_WINDOW_MINUTES.into()),
        )
    }

    /// Create an exchange from configuration and list every configured stock
    pub fn from_config(config: &ExchangeConfig) -> Result<Arc<Self>> {
        Self::from_config_with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create an exchange from configuration on a specific clock
    pub fn from_config_with_clock(
        config: &ExchangeConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Arc<Self>> {
        // Every stock is validated before anything is listed
        let stocks = config
            .stocks
            .iter()
            .map(|stock| stock.build())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let exchange = Self::build(config.name.clone(), clock, config.price_window());
        for stock in stocks {
            exchange.list(stock)?;
        }

        Ok(exchange)
    }

    fn build(name: String, clock: Arc<dyn Clock>, price_window: Duration) -> Arc<Self> {
        info!(
            "Created exchange {} (clock: {}, price window: {}m)",
            name,
            clock.name(),
            price_window.num_minutes()
        );

        Arc::new(Self {
            name,
            clock,
            price_window,
            state: RwLock::new(ExchangeState::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Default window used by [`Stock::price`]
    pub fn price_window(&self) -> Duration {
        self.price_window
    }

    /// List `stock` on this exchange
    ///
    /// Fails if the symbol is already listed or if the stock is already
    /// listed on another exchange. On failure nothing changes.
    pub fn add_stock(self: &Arc<Self>, stock: Arc<Stock>) -> Result<()> {
        let mut state = self.state.write();

        if state.stocks.contains_key(stock.symbol()) {
            warn!("Rejected duplicate listing of {} on {}", stock.symbol(), self.name);
            return Err(ExchangeError::InvalidOperation(format!(
                "Symbol {} already exists",
                stock.symbol()
            )));
        }

        if !stock.associate(Arc::downgrade(self)) {
            warn!("Rejected listing of {}: already listed elsewhere", stock.symbol());
            return Err(ExchangeError::InvalidOperation(format!(
                "Stock {} is already associated with an exchange",
                stock.symbol()
            )));
        }

        state.ledger.open(stock.symbol());
        info!("Added {} to {}", stock, self.name);
        state.stocks.insert(stock.symbol().to_string(), stock);
        Ok(())
    }

    /// List `stock` and return the shared handle to it
    pub fn list(self: &Arc<Self>, stock: Stock) -> Result<Arc<Stock>> {
        let stock = Arc::new(stock);
        self.add_stock(Arc::clone(&stock))?;
        Ok(stock)
    }

    pub fn stock(&self, symbol: &str) -> Option<Arc<Stock>> {
        self.state.read().stocks.get(symbol).cloned()
    }

    /// All listed stocks in listing order
    pub fn stocks(&self) -> Vec<Arc<Stock>> {
        self.state.read().stocks.values().cloned().collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.state.read().stocks.contains_key(symbol)
    }

    /// Record a trade of a listed stock, stamped with the current time
    ///
    /// The symbol, quantity and price are all validated before the ledger is
    /// touched: either the whole trade is appended or nothing changes.
    pub fn record_trade(
        &self,
        symbol: &str,
        quantity: impl Into<Decimal>,
        side: Side,
        price: impl Into<Decimal>,
    ) -> Result<Trade> {
        let mut state = self.state.write();

        let symbol = validate_member("symbol", symbol, state.stocks.keys().map(String::as_str))?;
        let trade = Trade::new(symbol, quantity, side, price, self.clock.now())?;

        debug!("{}: recorded {}", self.name, trade);
        state.ledger.append(trade.clone());
        Ok(trade)
    }

    /// Snapshot of the trades recorded for `symbol`, oldest first
    pub fn trades(&self, symbol: &str) -> Vec<Trade> {
        self.state.read().ledger.trades(symbol).to_vec()
    }

    pub fn last_trade(&self, symbol: &str) -> Option<Trade> {
        self.state.read().ledger.last_trade(symbol).cloned()
    }

    /// Total number of trades recorded on this exchange
    pub fn trade_count(&self) -> usize {
        self.state.read().ledger.len()
    }

    /// Volume-weighted price of a listed stock over trades within `window`
    pub fn volume_weighted_price(&self, symbol: &str, window: Duration) -> Result<Option<Price>> {
        let state = self.state.read();
        validate_member("symbol", symbol, state.stocks.keys().map(String::as_str))?;

        let since = self.window_start(window)?;
        state.ledger.volume_weighted_price(symbol, since)
    }

    /// Geometric mean of the current price of every listed stock
    ///
    /// A stock without a price counts as a zero factor, which makes the whole
    /// index zero. `None` when nothing is listed.
    pub fn all_share_index(&self) -> Result<Option<Decimal>> {
        let state = self.state.read();
        if state.stocks.is_empty() {
            return Ok(None);
        }

        let since = self.window_start(self.price_window)?;
        let prices = state
            .stocks
            .keys()
            .map(|symbol| {
                let price = state.ledger.volume_weighted_price(symbol, since)?;
                Ok(price.unwrap_or(Decimal::ZERO))
            })
            .collect::<Result<Vec<Price>>>()?;

        geometric_mean(&prices).map(Some)
    }

    /// Oldest instant (exclusive) a trade may have to count towards a price
    fn window_start(&self, window: Duration) -> Result<Timestamp> {
        self.clock
            .now()
            .checked_sub_signed(window)
            .ok_or_else(|| {
                ExchangeError::InvalidOperation(format!(
                    "Price window of {} reaches outside the supported time range",
                    window
                ))
            })
    }
}

/// Geometric mean of non-empty, non-negative factors
fn geometric_mean(factors: &[Decimal]) -> Result<Decimal> {
    if factors.iter().any(Decimal::is_zero) {
        return Ok(Decimal::ZERO);
    }
    if let [single] = factors {
        return Ok(*single);
    }

    let count = Decimal::from(factors.len());
    let exact = factors
        .iter()
        .try_fold(Decimal::ONE, |product, factor| product.checked_mul(*factor))
        .and_then(|product| product.checked_powd(Decimal::ONE / count));

    // Products beyond the decimal range are averaged in log space instead
    let mean = exact.or_else(|| {
        factors
            .iter()
            .try_fold(Decimal::ZERO, |sum, factor| {
                factor.checked_ln().and_then(|ln| sum.checked_add(ln))
            })
            .and_then(|sum| sum.checked_div(count))
            .and_then(|mean_ln| mean_ln.checked_exp())
    });

    mean.map(|mean| mean.normalize()).ok_or_else(|| {
        ExchangeError::InvalidOperation(
            "All-share index is outside the decimal range".to_string(),
        )
    })
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Exchange")
            .field("name", &self.name)
            .field("clock", &self.clock.name())
            .field("price_window", &self.price_window)
            .field("stocks", &state.stocks.keys().collect::<Vec<_>>())
            .field("trades", &state.ledger.len())
            .finish()
    }
}
