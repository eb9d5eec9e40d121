//! Configuration loading for an exchange
//!
//! Supports JSON configuration files for:
//! - Exchange settings (name, price window)
//! - Stocks to list, with their dividend policy

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stocks_core::{StockType, ValidationError, non_negative, optional_non_negative};
use thiserror::Error;

use crate::error::ExchangeError;
use crate::exchange::DEFAULT_PRICE_WINDOW_MINUTES;
use crate::stock::Stock;

/// Root configuration for an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Exchange name/identifier
    #[serde(default = "default_exchange_name")]
    pub name: String,

    /// Window for volume-weighted prices, in minutes
    #[serde(default = "default_price_window_minutes")]
    pub price_window_minutes: u32,

    /// Stocks to list, in listing order
    #[serde(default)]
    pub stocks: Vec<StockConfig>,
}

fn default_exchange_name() -> String {
    "GBCE".to_string()
}

fn default_price_window_minutes() -> u32 {
    DEFAULT_PRICE_WINDOW_MINUTES
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            name: default_exchange_name(),
            price_window_minutes: default_price_window_minutes(),
            stocks: Vec::new(),
        }
    }
}

impl ExchangeConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The Global Beverage Corporation Exchange sample listings
    pub fn gbce() -> Self {
        let stocks = vec![
            StockConfig::common("TEA", 100, 0),
            StockConfig::common("POP", 100, 8),
            StockConfig::common("ALE", 60, 23),
            StockConfig::preferred("GIN", 100, 8, Decimal::new(2, 2)),
            StockConfig::common("JOE", 250, 13),
        ];

        Self {
            stocks,
            ..Default::default()
        }
    }

    /// Price window as a duration
    pub fn price_window(&self) -> Duration {
        Duration::minutes(self.price_window_minutes.into())
    }

    /// Validate every stock entry without building an exchange
    pub fn validate(&self) -> Result<(), ExchangeError> {
        for stock in &self.stocks {
            stock.build()?;
        }
        Ok(())
    }
}

/// Configuration for a single listed stock
///
/// Fields are kept loose (string type, optional numbers) so that a bad entry
/// reports the same validation error as the stock constructor would.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockConfig {
    pub symbol: String,
    /// "common" or "preferred"
    pub stock_type: String,
    #[serde(default)]
    pub par_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_dividend: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_dividend: Option<Decimal>,
}

impl StockConfig {
    pub fn common(symbol: &str, par_value: i64, last_dividend: i64) -> Self {
        Self {
            symbol: symbol.to_string(),
            stock_type: StockType::Common.to_string(),
            par_value: Some(Decimal::from(par_value)),
            last_dividend: Some(Decimal::from(last_dividend)),
            fixed_dividend: None,
        }
    }

    pub fn preferred(
        symbol: &str,
        par_value: i64,
        last_dividend: i64,
        fixed_dividend: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            stock_type: StockType::Preferred.to_string(),
            par_value: Some(Decimal::from(par_value)),
            last_dividend: Some(Decimal::from(last_dividend)),
            fixed_dividend: Some(fixed_dividend),
        }
    }

    /// Build the validated stock this entry describes
    pub fn build(&self) -> Result<Stock, ValidationError> {
        let stock_type: StockType = self.stock_type.parse()?;
        let par_value = non_negative("par_value", self.par_value)?;
        let last_dividend =
            optional_non_negative("last_dividend", self.last_dividend)?.unwrap_or_default();

        Stock::new(
            self.symbol.clone(),
            stock_type,
            par_value,
            last_dividend,
            self.fixed_dividend,
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}
