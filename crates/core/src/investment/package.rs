//! Investment packages and the investments that fund them.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prestige_shared::types::money::round_to_currency;
use prestige_shared::types::{AccountId, Currency, InvestmentId, PackageId};

use crate::error::LedgerError;

/// A fixed-term product with a guaranteed return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentPackage {
    /// Unique identifier.
    pub id: PackageId,
    /// Display name.
    pub name: String,
    /// Smallest amount accepted.
    pub min_amount: Decimal,
    /// Largest amount accepted.
    pub max_amount: Decimal,
    /// Term length.
    pub duration_days: u32,
    /// Return over the full term, in percent.
    pub roi_percentage: Decimal,
}

impl InvestmentPackage {
    /// Returns true if `amount` lies within `[min_amount, max_amount]`.
    #[must_use]
    pub fn contains(&self, amount: Decimal) -> bool {
        self.min_amount <= amount && amount <= self.max_amount
    }

    /// Fails with `AmountOutOfRange` unless the package accepts `amount`.
    pub fn ensure_accepts(&self, amount: Decimal) -> Result<(), LedgerError> {
        if self.contains(amount) {
            Ok(())
        } else {
            Err(LedgerError::AmountOutOfRange {
                amount,
                min: self.min_amount,
                max: self.max_amount,
            })
        }
    }

    /// Return paid on `amount` at the end of the term.
    #[must_use]
    pub fn expected_return(&self, amount: Decimal, currency: Currency) -> Decimal {
        round_to_currency(amount * self.roi_percentage / Decimal::ONE_HUNDRED, currency)
    }

    /// Last day of a term starting on `start`.
    #[must_use]
    pub fn maturity_date(&self, start: NaiveDate) -> NaiveDate {
        start
            .checked_add_days(Days::new(u64::from(self.duration_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Investment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentStatus {
    /// Funds are committed for the term.
    Active,
    /// Term ended and the return was paid.
    Completed,
    /// Withdrawn before the end of the term.
    Cancelled,
}

/// Funds committed to a package from a customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    /// Unique identifier.
    pub id: InvestmentId,
    /// Funding account.
    pub account_id: AccountId,
    /// Package invested in.
    pub package_id: PackageId,
    /// Amount committed.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// `amount * roi / 100`.
    pub expected_return: Decimal,
    /// Return actually paid, once the term ends.
    pub actual_return: Option<Decimal>,
    /// First day of the term.
    pub start_date: NaiveDate,
    /// Last day of the term.
    pub end_date: NaiveDate,
    /// Lifecycle status.
    pub status: InvestmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn package() -> InvestmentPackage {
        InvestmentPackage {
            id: PackageId::new(),
            name: "Gold".to_string(),
            min_amount: dec!(100),
            max_amount: dec!(1000),
            duration_days: 30,
            roi_percentage: dec!(12.5),
        }
    }

    #[rstest]
    #[case(dec!(99.99), false)]
    #[case(dec!(100), true)]
    #[case(dec!(500), true)]
    #[case(dec!(1000), true)]
    #[case(dec!(1000.01), false)]
    fn test_package_range(#[case] amount: Decimal, #[case] accepted: bool) {
        assert_eq!(package().contains(amount), accepted);
        assert_eq!(package().ensure_accepts(amount).is_ok(), accepted);
    }

    #[test]
    fn test_expected_return() {
        assert_eq!(
            package().expected_return(dec!(200), Currency::Ghs),
            dec!(25.00)
        );
        assert_eq!(
            package().expected_return(dec!(100.10), Currency::Ghs),
            dec!(12.51)
        );
    }

    #[test]
    fn test_maturity_date() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(
            package().maturity_date(start),
            NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()
        );
    }
}
