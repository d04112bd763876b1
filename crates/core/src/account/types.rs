//! Account aggregate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prestige_shared::types::{AccountId, Currency, Money, UserId};

use crate::error::LedgerError;

/// Kind of account a customer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Savings account.
    Savings,
    /// Checking account.
    Checking,
    /// Fixed deposit.
    Fixed,
    /// Investment account funding trades and investment packages.
    Investment,
}

/// Account lifecycle status. Accounts are never deleted, only closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// Account can send and receive money.
    Active,
    /// Account is frozen for inactivity.
    Dormant,
    /// Account is closed.
    Closed,
}

impl AccountStatus {
    /// Returns true if the account may take part in money movement.
    #[must_use]
    pub fn allows_movement(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Dormant => write!(f, "DORMANT"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// A customer bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// BIN-prefixed account number.
    pub account_number: String,
    /// Customer owning the account.
    pub owner_id: UserId,
    /// Account type.
    pub account_type: AccountType,
    /// Current balance, never negative.
    pub balance: Decimal,
    /// Currency the balance is held in.
    pub currency: Currency,
    /// Lifecycle status.
    pub status: AccountStatus,
    /// Whether the account can receive interbank transfers.
    pub is_interoperable: bool,
    /// Incremented on every committed balance change.
    pub version: u64,
    /// When the account was opened.
    pub opened_at: DateTime<Utc>,
}

impl Account {
    /// Creates an empty active account.
    #[must_use]
    pub fn new(
        account_number: String,
        owner_id: UserId,
        account_type: AccountType,
        currency: Currency,
    ) -> Self {
        Self {
            id: AccountId::new(),
            account_number,
            owner_id,
            account_type,
            balance: Decimal::ZERO,
            currency,
            status: AccountStatus::Active,
            is_interoperable: true,
            version: 0,
            opened_at: Utc::now(),
        }
    }

    /// Balance together with its currency.
    #[must_use]
    pub fn holdings(&self) -> Money {
        Money::new(self.balance, self.currency)
    }

    /// Fails with `AccountNotActive` unless the account is active.
    pub fn ensure_active(&self) -> Result<(), LedgerError> {
        if self.status.allows_movement() {
            Ok(())
        } else {
            Err(LedgerError::AccountNotActive {
                account_id: self.id,
                status: self.status,
            })
        }
    }

    /// Decreases the balance by `amount`.
    ///
    /// Fails without mutating if the amount is not positive, the account is
    /// not active, or the balance does not cover the amount.
    pub fn apply_debit(&mut self, amount: Decimal) -> Result<Decimal, LedgerError> {
        ensure_positive(amount)?;
        self.ensure_active()?;
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                account_id: self.id,
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.version += 1;
        Ok(self.balance)
    }

    /// Increases the balance by `amount`. Only active accounts accept credits.
    pub fn apply_credit(&mut self, amount: Decimal) -> Result<Decimal, LedgerError> {
        ensure_positive(amount)?;
        self.ensure_active()?;
        self.balance += amount;
        self.version += 1;
        Ok(self.balance)
    }

    /// Returns previously reserved funds, regardless of the current status.
    ///
    /// Used when a pending payout fails: the reservation is undone even if the
    /// account went dormant while the payment was in flight.
    pub fn apply_reversal(&mut self, amount: Decimal) -> Result<Decimal, LedgerError> {
        ensure_positive(amount)?;
        self.balance += amount;
        self.version += 1;
        Ok(self.balance)
    }
}

pub(crate) fn ensure_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn funded(balance: Decimal) -> Account {
        let mut account = Account::new(
            "1234560001".to_string(),
            UserId::new(),
            AccountType::Savings,
            Currency::Ghs,
        );
        account.balance = balance;
        account
    }

    #[test]
    fn test_new_account_is_active_and_empty() {
        let account = funded(Decimal::ZERO);
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.version, 0);
        assert_eq!(account.holdings().to_string(), "0 GHS");
    }

    #[test]
    fn test_debit_reduces_balance() {
        let mut account = funded(dec!(100));
        assert_eq!(account.apply_debit(dec!(40)).unwrap(), dec!(60));
        assert_eq!(account.version, 1);
    }

    #[test]
    fn test_debit_entire_balance() {
        let mut account = funded(dec!(100));
        assert_eq!(account.apply_debit(dec!(100)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overdraft_rejected_without_mutation() {
        let mut account = funded(dec!(100));
        let err = account.apply_debit(dec!(100.01)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(account.balance, dec!(100));
        assert_eq!(account.version, 0);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let mut account = funded(dec!(100));
        assert!(matches!(
            account.apply_debit(Decimal::ZERO),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            account.apply_credit(dec!(-5)),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_inactive_account_cannot_move_money() {
        let mut account = funded(dec!(100));
        account.status = AccountStatus::Dormant;
        assert!(matches!(
            account.apply_credit(dec!(1)),
            Err(LedgerError::AccountNotActive {
                status: AccountStatus::Dormant,
                ..
            })
        ));
        assert!(matches!(
            account.apply_debit(dec!(1)),
            Err(LedgerError::AccountNotActive { .. })
        ));
    }

    #[test]
    fn test_reversal_ignores_status() {
        let mut account = funded(dec!(10));
        account.status = AccountStatus::Dormant;
        assert_eq!(account.apply_reversal(dec!(5)).unwrap(), dec!(15));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(AccountStatus::Active.to_string(), "ACTIVE");
        assert!(!AccountStatus::Closed.allows_movement());
    }
}
