use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::{ValidationError, validate_member};

/// Dividend policy of a listed stock
///
/// Common stock yields its last declared dividend; preferred stock yields a
/// fixed fraction of its par value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockType {
    Common,
    Preferred,
}

impl StockType {
    pub const ALL: [StockType; 2] = [StockType::Common, StockType::Preferred];

    pub fn as_str(&self) -> &'static str {
        match self {
            StockType::Common => "common",
            StockType::Preferred => "preferred",
        }
    }

    /// Whether this stock type must carry a fixed dividend
    pub fn requires_fixed_dividend(&self) -> bool {
        matches!(self, StockType::Preferred)
    }
}

impl fmt::Display for StockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let names = StockType::ALL.map(|stock_type| stock_type.as_str());
        match validate_member("stock_type", s, names)? {
            "common" => Ok(StockType::Common),
            _ => Ok(StockType::Preferred),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stock_type() {
        assert_eq!("common".parse::<StockType>().unwrap(), StockType::Common);
        assert_eq!(
            "preferred".parse::<StockType>().unwrap(),
            StockType::Preferred
        );

        let err = "invalid type".parse::<StockType>().unwrap_err();
        assert_eq!(err.field(), "stock_type");
    }

    #[test]
    fn test_only_preferred_requires_fixed_dividend() {
        assert!(!StockType::Common.requires_fixed_dividend());
        assert!(StockType::Preferred.requires_fixed_dividend());
    }
}
