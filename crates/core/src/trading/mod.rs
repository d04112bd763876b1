//! Leveraged trading: positions, margin and market prices.

pub mod book;
pub mod position;
pub mod price;

pub use book::PositionBook;
pub use position::{PositionStatus, TradePosition, TradeSide, margin_for};
pub use price::{FixedPriceFeed, PriceFeed, REFERENCE_PRICES};
