//! Market price sources.

use dashmap::DashMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::LedgerError;

/// Reference prices for the symbols the trading desk lists.
pub const REFERENCE_PRICES: [(&str, Decimal); 5] = [
    ("BTCUSDT", dec!(55000)),
    ("ETHUSDT", dec!(3000)),
    ("BNBUSDT", dec!(500)),
    ("SOLUSDT", dec!(100)),
    ("XRPUSDT", dec!(0.50)),
];

/// Source of current market prices.
pub trait PriceFeed: Send + Sync {
    /// Returns the current price of `symbol`, or `PriceUnavailable`.
    fn current_price(&self, symbol: &str) -> Result<Decimal, LedgerError>;
}

/// Price feed backed by an in-memory table.
#[derive(Debug, Default)]
pub struct FixedPriceFeed {
    prices: DashMap<String, Decimal>,
}

impl FixedPriceFeed {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a feed quoting the reference prices.
    #[must_use]
    pub fn with_reference_prices() -> Self {
        let feed = Self::new();
        for (symbol, price) in REFERENCE_PRICES {
            feed.set_price(symbol, price);
        }
        feed
    }

    /// Sets or replaces the quote for `symbol`.
    pub fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices.insert(symbol.to_uppercase(), price);
    }
}

impl PriceFeed for FixedPriceFeed {
    fn current_price(&self, symbol: &str) -> Result<Decimal, LedgerError> {
        self.prices
            .get(&symbol.to_uppercase())
            .map(|entry| *entry.value())
            .filter(|price| *price > Decimal::ZERO)
            .ok_or_else(|| LedgerError::PriceUnavailable(symbol.to_string()))
    }
}
