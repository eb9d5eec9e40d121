use stocks_exchange::{ConfigError, ExchangeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Invalid trade feed configuration: {0}")]
    InvalidFeedConfig(String),

    #[error("No stocks listed on {0}")]
    NothingListed(String),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
