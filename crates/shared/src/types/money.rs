//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g., cedis, not pesewas).
    pub amount: Decimal,
    /// Currency code (e.g., "GHS", "BTC").
    pub currency: Currency,
}

/// Currencies and crypto assets the bank accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Ghanaian Cedi
    #[default]
    Ghs,
    /// US Dollar
    Usd,
    /// Bitcoin
    Btc,
    /// Ether
    Eth,
    /// Tether
    Usdt,
}

impl Currency {
    /// Number of decimal places amounts in this currency are stored with.
    #[must_use]
    pub const fn decimal_places(self) -> u32 {
        match self {
            Self::Ghs | Self::Usd => 2,
            Self::Usdt => 6,
            Self::Btc | Self::Eth => 8,
        }
    }

    /// Returns true for crypto assets that are deposited to a bank wallet address.
    #[must_use]
    pub const fn is_crypto(self) -> bool {
        matches!(self, Self::Btc | Self::Eth | Self::Usdt)
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rounds the amount to the currency's precision using banker's rounding.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            amount: round_to_currency(self.amount, self.currency),
            currency: self.currency,
        }
    }
}

/// Rounds an amount to the currency's decimal places (round half to even).
#[must_use]
pub fn round_to_currency(amount: Decimal, currency: Currency) -> Decimal {
    amount.round_dp_with_strategy(
        currency.decimal_places(),
        RoundingStrategy::MidpointNearestEven,
    )
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ghs => write!(f, "GHS"),
            Self::Usd => write!(f, "USD"),
            Self::Btc => write!(f, "BTC"),
            Self::Eth => write!(f, "ETH"),
            Self::Usdt => write!(f, "USDT"),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GHS" => Ok(Self::Ghs),
            "USD" => Ok(Self::Usd),
            "BTC" => Ok(Self::Btc),
            "ETH" => Ok(Self::Eth),
            "USDT" => Ok(Self::Usdt),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
