//! Security audit trail for settlement attempts.
//!
//! Recording is fire-and-forget: a sink failure is logged and never undoes a
//! committed balance change.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use prestige_shared::types::{AccountId, UserId};

use crate::ident::TransactionRef;

/// What was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Account-to-account transfer.
    Transfer,
    /// Deposit initiated.
    DepositInitiated,
    /// Withdrawal initiated.
    WithdrawalInitiated,
    /// Bill payment initiated.
    BillPayment,
    /// Mobile money payout initiated.
    MobileMoney,
    /// Gateway callback processed.
    PaymentConfirmation,
    /// Trade position opened.
    TradeOpened,
    /// Trade position closed.
    TradeClosed,
    /// Investment funded.
    InvestmentCreated,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Transfer => "transfer",
            Self::DepositInitiated => "deposit_initiated",
            Self::WithdrawalInitiated => "withdrawal_initiated",
            Self::BillPayment => "bill_payment",
            Self::MobileMoney => "mobile_money",
            Self::PaymentConfirmation => "payment_confirmation",
            Self::TradeOpened => "trade_opened",
            Self::TradeClosed => "trade_closed",
            Self::InvestmentCreated => "investment_created",
        };
        f.write_str(name)
    }
}

/// How the attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum AuditOutcome {
    /// Balances changed and the record is final.
    Settled,
    /// Accepted, awaiting gateway confirmation.
    Pending,
    /// Duplicate callback, nothing changed.
    AlreadyProcessed,
    /// Rejected; carries the error code.
    Rejected(String),
}

impl std::fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Settled => write!(f, "settled"),
            Self::Pending => write!(f, "pending"),
            Self::AlreadyProcessed => write!(f, "already_processed"),
            Self::Rejected(code) => write!(f, "rejected:{code}"),
        }
    }
}

/// A single audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    /// What was attempted.
    pub action: AuditAction,
    /// How it ended.
    pub outcome: AuditOutcome,
    /// Acting customer, when known.
    pub user_id: Option<UserId>,
    /// Account involved.
    pub account_id: Option<AccountId>,
    /// Amount involved.
    pub amount: Option<Decimal>,
    /// Ledger record, when one was created.
    pub reference: Option<TransactionRef>,
    /// When the attempt finished.
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Starts an event.
    #[must_use]
    pub fn new(action: AuditAction, outcome: AuditOutcome) -> Self {
        Self {
            action,
            outcome,
            user_id: None,
            account_id: None,
            amount: None,
            reference: None,
            occurred_at: Utc::now(),
        }
    }

    /// Sets the acting customer.
    #[must_use]
    pub fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Sets the account involved.
    #[must_use]
    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Sets the amount involved.
    #[must_use]
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the ledger reference.
    #[must_use]
    pub fn reference(mut self, reference: &TransactionRef) -> Self {
        self.reference = Some(reference.clone());
        self
    }
}

/// Audit sink errors.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The sink could not accept the event.
    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// Writes audit events as structured `tracing` events under `prestige::audit`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        info!(
            target: "prestige::audit",
            action = %event.action,
            outcome = %event.outcome,
            user_id = ?event.user_id,
            account_id = ?event.account_id,
            amount = ?event.amount,
            reference = ?event.reference,
            "Settlement audit"
        );
        Ok(())
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
