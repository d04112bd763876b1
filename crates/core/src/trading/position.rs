//! Leveraged trade positions and their profit/loss arithmetic.
//!
//! All amounts are `Decimal` in the funding account's currency and rounded
//! with banker's rounding to that currency's precision.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prestige_shared::types::money::round_to_currency;
use prestige_shared::types::{AccountId, Currency, PositionId, UserId};

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    /// Profits when the price rises.
    Buy,
    /// Profits when the price falls.
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Position lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    /// Margin reserved, exposed to price moves.
    Open,
    /// Awaiting execution.
    Pending,
    /// Settled back to the account.
    Closed,
}

/// Margin a position of `amount` at `leverage` reserves.
///
/// Leverage must already be validated as at least 1.
#[must_use]
pub fn margin_for(amount: Decimal, leverage: u32, currency: Currency) -> Decimal {
    round_to_currency(amount / Decimal::from(leverage.max(1)), currency)
}

/// A leveraged position funded from a customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePosition {
    /// Unique identifier.
    pub id: PositionId,
    /// Customer holding the position.
    pub owner_id: UserId,
    /// Account the margin was taken from and the payout returns to.
    pub account_id: AccountId,
    /// Market symbol, e.g. `BTCUSDT`.
    pub symbol: String,
    /// Buy or sell.
    pub side: TradeSide,
    /// Notional amount.
    pub amount: Decimal,
    /// Leverage multiplier.
    pub leverage: u32,
    /// Margin debited on open.
    pub margin_required: Decimal,
    /// Price at open.
    pub entry_price: Decimal,
    /// Last price the position was marked at.
    pub current_price: Decimal,
    /// Close automatically once the price reaches this level in our favour.
    pub take_profit: Option<Decimal>,
    /// Close automatically once the price reaches this level against us.
    pub stop_loss: Option<Decimal>,
    /// Profit or loss at `current_price`.
    pub profit_loss: Decimal,
    /// Lifecycle status.
    pub status: PositionStatus,
    /// Currency of the funding account.
    pub currency: Currency,
    /// When the position was opened.
    pub opened_at: DateTime<Utc>,
    /// When the position was closed.
    pub closed_at: Option<DateTime<Utc>>,
}

impl TradePosition {
    /// Profit or loss of the position if it were marked at `price`.
    ///
    /// `(price - entry) / entry * amount`, negated for sells.
    #[must_use]
    pub fn profit_loss_at(&self, price: Decimal) -> Decimal {
        if self.entry_price.is_zero() {
            return Decimal::ZERO;
        }
        let change = (price - self.entry_price) / self.entry_price * self.amount;
        let signed = match self.side {
            TradeSide::Buy => change,
            TradeSide::Sell => -change,
        };
        round_to_currency(signed, self.currency)
    }

    /// Updates the current price and the derived profit/loss.
    pub fn mark_to_market(&mut self, price: Decimal) {
        self.current_price = price;
        self.profit_loss = self.profit_loss_at(price);
    }

    /// Returns true if the current price crossed the take-profit or stop-loss.
    #[must_use]
    pub fn trigger_hit(&self) -> bool {
        let price = self.current_price;
        match self.side {
            TradeSide::Buy => {
                self.take_profit.is_some_and(|tp| price >= tp)
                    || self.stop_loss.is_some_and(|sl| price <= sl)
            }
            TradeSide::Sell => {
                self.take_profit.is_some_and(|tp| price <= tp)
                    || self.stop_loss.is_some_and(|sl| price >= sl)
            }
        }
    }

    /// Amount returned to the account on close, and the loss it cannot cover.
    ///
    /// The payout is `margin + profit_loss`, floored at zero.
    #[must_use]
    pub fn settlement_amounts(&self) -> (Decimal, Decimal) {
        let equity = self.margin_required + self.profit_loss;
        if equity.is_sign_negative() {
            (Decimal::ZERO, -equity)
        } else {
            (equity, Decimal::ZERO)
        }
    }

    /// Returns true while the position is exposed to price moves.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn position(side: TradeSide, amount: Decimal, leverage: u32, entry: Decimal) -> TradePosition {
        TradePosition {
            id: PositionId::new(),
            owner_id: UserId::new(),
            account_id: AccountId::new(),
            symbol: "BTCUSDT".to_string(),
            side,
            amount,
            leverage,
            margin_required: margin_for(amount, leverage, Currency::Ghs),
            entry_price: entry,
            current_price: entry,
            take_profit: None,
            stop_loss: None,
            profit_loss: Decimal::ZERO,
            status: PositionStatus::Open,
            currency: Currency::Ghs,
            opened_at: Utc::now(),
            closed_at: None,
        }
    }

    #[rstest]
    #[case(dec!(100), 10, dec!(10.00))]
    #[case(dec!(100), 1, dec!(100.00))]
    #[case(dec!(100), 3, dec!(33.33))]
    #[case(dec!(0.25), 10, dec!(0.02))]
    #[case(dec!(0.35), 10, dec!(0.04))]
    fn test_margin_is_rounded_half_even(
        #[case] amount: Decimal,
        #[case] leverage: u32,
        #[case] expected: Decimal,
    ) {
        assert_eq!(margin_for(amount, leverage, Currency::Ghs), expected);
    }

    #[rstest]
    #[case(TradeSide::Buy, dec!(105), dec!(5.00))]
    #[case(TradeSide::Buy, dec!(90), dec!(-10.00))]
    #[case(TradeSide::Sell, dec!(105), dec!(-5.00))]
    #[case(TradeSide::Sell, dec!(90), dec!(10.00))]
    fn test_profit_loss_by_side(
        #[case] side: TradeSide,
        #[case] price: Decimal,
        #[case] expected: Decimal,
    ) {
        let position = position(side, dec!(100), 10, dec!(100));
        assert_eq!(position.profit_loss_at(price), expected);
    }

    #[test]
    fn test_mark_to_market_updates_profit_loss() {
        let mut position = position(TradeSide::Buy, dec!(100), 10, dec!(100));
        position.mark_to_market(dec!(105));
        assert_eq!(position.current_price, dec!(105));
        assert_eq!(position.profit_loss, dec!(5));
        assert_eq!(position.settlement_amounts(), (dec!(15), Decimal::ZERO));
    }

    #[test]
    fn test_loss_beyond_margin_floors_payout() {
        let mut position = position(TradeSide::Buy, dec!(100), 10, dec!(100));
        position.mark_to_market(dec!(80));
        assert_eq!(position.profit_loss, dec!(-20));
        assert_eq!(position.settlement_amounts(), (Decimal::ZERO, dec!(10)));
    }

    #[rstest]
    #[case(TradeSide::Buy, dec!(110), true)]
    #[case(TradeSide::Buy, dec!(95), true)]
    #[case(TradeSide::Buy, dec!(100), false)]
    #[case(TradeSide::Sell, dec!(90), true)]
    #[case(TradeSide::Sell, dec!(105), true)]
    #[case(TradeSide::Sell, dec!(100), false)]
    fn test_trigger_levels(#[case] side: TradeSide, #[case] price: Decimal, #[case] hit: bool) {
        let mut position = position(side, dec!(100), 10, dec!(100));
        match side {
            TradeSide::Buy => {
                position.take_profit = Some(dec!(110));
                position.stop_loss = Some(dec!(95));
            }
            TradeSide::Sell => {
                position.take_profit = Some(dec!(90));
                position.stop_loss = Some(dec!(105));
            }
        }
        position.mark_to_market(price);
        assert_eq!(position.trigger_hit(), hit);
    }

    #[test]
    fn test_no_levels_never_trigger() {
        let mut position = position(TradeSide::Buy, dec!(100), 10, dec!(100));
        position.mark_to_market(dec!(1000));
        assert!(!position.trigger_hit());
    }
}
