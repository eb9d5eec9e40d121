//! Demo Session Integration Test
//!
//! Runs a GBCE session the way the demo binary does:
//! - Exchange built from the sample configuration
//! - Random trades from a seeded trade feed
//! - Market report over every listed stock

use chrono::Duration;
use rust_decimal::Decimal;
use std::sync::Arc;
use stocks_exchange::{ControllableClock, Exchange, ExchangeConfig, SimulationClock};
use stocks_runner::{MarketReport, RunnerError, TradeFeedConfig, TradeFeedSimulator};

/// Test a full session records every trade and reports every stock
#[test]
fn test_session_reports_every_stock() {
    let exchange = Exchange::from_config(&ExchangeConfig::gbce()).unwrap();
    let mut feed = TradeFeedSimulator::with_seed(TradeFeedConfig::default(), 42).unwrap();

    let trades = feed.run_ticks(&exchange, 50).unwrap();
    assert_eq!(trades.len(), 50);
    assert_eq!(exchange.trade_count(), 50);

    let report = MarketReport::capture(&exchange).unwrap();
    assert_eq!(report.exchange, "GBCE");
    assert_eq!(report.stocks.len(), 5);

    for stock in &report.stocks {
        let traded = !exchange.trades(&stock.symbol).is_empty();
        assert_eq!(stock.price.is_some(), traded, "{}", stock.symbol);
    }

    // TEA never declares a dividend
    assert_eq!(report.stock("TEA").unwrap().pe_ratio, None);
}

/// Test seeded sessions are reproducible
#[test]
fn test_seeded_sessions_match() {
    let run = |seed| {
        let exchange = Exchange::from_config(&ExchangeConfig::gbce()).unwrap();
        let mut feed = TradeFeedSimulator::with_seed(TradeFeedConfig::default(), seed).unwrap();
        feed.run_ticks(&exchange, 25)
            .unwrap()
            .into_iter()
            .map(|trade| (trade.symbol().to_string(), trade.side(), trade.quantity(), trade.price()))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(7), run(7));
}

/// Test the index is positive once every stock has traded
#[test]
fn test_index_after_every_stock_traded() {
    let clock = SimulationClock::fixed();
    let exchange =
        Exchange::from_config_with_clock(&ExchangeConfig::gbce(), Arc::new(clock.clone()))
            .unwrap();
    for stock in exchange.stocks() {
        stock.record_trade(100, stocks_core::Side::Buy, 10).unwrap();
    }

    let report = MarketReport::capture(&exchange).unwrap();
    let index = report.all_share_index.unwrap();
    assert!((index - Decimal::from(10)).abs() < Decimal::new(1, 6), "got {index}");

    // Prices outlive the window through the last-trade fallback
    clock.advance(Duration::hours(1));
    let report = MarketReport::capture(&exchange).unwrap();
    assert!(report.stocks.iter().all(|stock| stock.price.is_some()));
}

/// Test a feed cannot trade on an empty exchange
#[test]
fn test_feed_needs_listed_stocks() {
    let exchange = Exchange::new("Empty");
    let mut feed = TradeFeedSimulator::with_seed(TradeFeedConfig::default(), 1).unwrap();

    assert!(matches!(
        feed.tick(&exchange),
        Err(RunnerError::NothingListed(_))
    ));
}
