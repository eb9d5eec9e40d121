use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::{ValidationError, validate_member};

/// Trade side (Buy or Sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Every side, in display order
    pub const ALL: [Side; 2] = [Side::Buy, Side::Sell];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let names = Side::ALL.map(|side| side.as_str());
        match validate_member("side", s, names)? {
            "buy" => Ok(Side::Buy),
            _ => Ok(Side::Sell),
        }
    }
}
