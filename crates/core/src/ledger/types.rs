//! Transaction record types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prestige_shared::types::{AccountId, Currency, InvestmentId, PositionId};

use crate::ident::TransactionRef;

/// What a transaction moves money for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Account-to-account transfer, settled immediately.
    Transfer,
    /// Incoming deposit, credited when the gateway confirms.
    Deposit,
    /// Outgoing withdrawal, reserved on initiation.
    Withdrawal,
    /// Bill payment, reserved on initiation.
    BillPayment,
    /// Mobile money payout, reserved on initiation.
    MobileMoney,
    /// Trade margin reservation or payout.
    Trade,
    /// Investment package funding.
    Investment,
}

impl TransactionKind {
    /// Returns true if the record stays pending until a gateway callback.
    #[must_use]
    pub fn awaits_confirmation(self) -> bool {
        matches!(
            self,
            Self::Deposit | Self::Withdrawal | Self::BillPayment | Self::MobileMoney
        )
    }

    /// Returns true if funds leave the sender when the payment is initiated.
    #[must_use]
    pub fn reserves_on_initiate(self) -> bool {
        matches!(self, Self::Withdrawal | Self::BillPayment | Self::MobileMoney)
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Transfer => "TRANSFER",
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::BillPayment => "BILL_PAYMENT",
            Self::MobileMoney => "MOBILE_MONEY",
            Self::Trade => "TRADE",
            Self::Investment => "INVESTMENT",
        };
        f.write_str(name)
    }
}

/// Transaction lifecycle status.
///
/// `Pending` is the only initial state. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Awaiting settlement.
    Pending,
    /// Settled successfully.
    Completed,
    /// Settlement failed.
    Failed,
}

impl TransactionStatus {
    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if moving from `self` to `to` is a valid transition.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Completed | Self::Failed)
        )
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Outcome of a settlement attempt on a ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    /// This call performed the transition.
    Settled,
    /// The record was already in the requested terminal state.
    AlreadyProcessed,
}

/// A recorded money movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique reference.
    pub reference: TransactionRef,
    /// Transaction kind.
    pub kind: TransactionKind,
    /// Amount moved, always positive.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Account funds leave, if any.
    pub sender: Option<AccountId>,
    /// Account funds arrive in, if any.
    pub recipient: Option<AccountId>,
    /// Lifecycle status.
    pub status: TransactionStatus,
    /// Why settlement failed.
    pub failure_reason: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Gateway and destination details (deposit address, mobile number, biller...).
    pub metadata: BTreeMap<String, String>,
    /// Linked trade position.
    pub position_id: Option<PositionId>,
    /// Linked investment.
    pub investment_id: Option<InvestmentId>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record reached a terminal state.
    pub settled_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Returns true if the account is the sender or the recipient.
    #[must_use]
    pub fn involves(&self, account_id: AccountId) -> bool {
        self.sender == Some(account_id) || self.recipient == Some(account_id)
    }
}

/// Input for a new ledger record.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub(crate) kind: TransactionKind,
    pub(crate) amount: Decimal,
    pub(crate) currency: Currency,
    pub(crate) sender: Option<AccountId>,
    pub(crate) recipient: Option<AccountId>,
    pub(crate) description: Option<String>,
    pub(crate) metadata: BTreeMap<String, String>,
    pub(crate) position_id: Option<PositionId>,
    pub(crate) investment_id: Option<InvestmentId>,
}

impl NewTransaction {
    /// Starts a record of `kind` for `amount`.
    #[must_use]
    pub fn new(kind: TransactionKind, amount: Decimal, currency: Currency) -> Self {
        Self {
            kind,
            amount,
            currency,
            sender: None,
            recipient: None,
            description: None,
            metadata: BTreeMap::new(),
            position_id: None,
            investment_id: None,
        }
    }

    /// Sets the debited account.
    #[must_use]
    pub fn sender(mut self, account_id: AccountId) -> Self {
        self.sender = Some(account_id);
        self
    }

    /// Sets the credited account.
    #[must_use]
    pub fn recipient(mut self, account_id: AccountId) -> Self {
        self.recipient = Some(account_id);
        self
    }

    /// Sets the free-form description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a metadata entry, replacing any previous value for the key.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Links the record to a trade position.
    #[must_use]
    pub fn position(mut self, position_id: PositionId) -> Self {
        self.position_id = Some(position_id);
        self
    }

    /// Links the record to an investment.
    #[must_use]
    pub fn investment(mut self, investment_id: InvestmentId) -> Self {
        self.investment_id = Some(investment_id);
        self
    }

    pub(crate) fn into_pending(self, reference: TransactionRef) -> Transaction {
        Transaction {
            reference,
            kind: self.kind,
            amount: self.amount,
            currency: self.currency,
            sender: self.sender,
            recipient: self.recipient,
            status: TransactionStatus::Pending,
            failure_reason: None,
            description: self.description,
            metadata: self.metadata,
            position_id: self.position_id,
            investment_id: self.investment_id,
            created_at: Utc::now(),
            settled_at: None,
        }
    }
}
