mod side;
mod stock_type;
mod trade;

pub use side::Side;
pub use stock_type::StockType;
pub use trade::{Trade, TradeId};
