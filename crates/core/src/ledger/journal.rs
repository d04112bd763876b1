//! The transaction ledger: every money-movement record and its lifecycle.

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use tracing::debug;

use prestige_shared::types::AccountId;

use crate::account::types::ensure_positive;
use crate::error::LedgerError;
use crate::ident::{TransactionRef, next_transaction_id};

use super::types::{NewTransaction, Settlement, Transaction, TransactionKind, TransactionStatus};

const MAX_REFERENCE_ATTEMPTS: usize = 5;

/// Thread-safe store of transaction records keyed by reference.
///
/// Outside the engine the ledger is read-only. Records are created and moved
/// to a terminal status by the settlement coordinator, so a pending gateway
/// payment can only be finalized through `confirm_payment`, which applies
/// the balance change in the same account scope:
///
/// ```compile_fail
/// use prestige_core::ident::TransactionRef;
/// use prestige_core::ledger::TransactionLedger;
///
/// let ledger = TransactionLedger::new();
/// let _ = ledger.mark_completed(&TransactionRef::from("TX20260101ABCDEFGH"));
/// ```
#[derive(Debug, Default)]
pub struct TransactionLedger {
    records: DashMap<TransactionRef, Transaction>,
}

impl TransactionLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pending record under a freshly generated reference.
    ///
    /// A generated reference that collides with an existing one is replaced.
    pub(crate) fn create(&self, new: NewTransaction) -> Result<Transaction, LedgerError> {
        ensure_positive(new.amount)?;

        let mut last = None;
        for _ in 0..MAX_REFERENCE_ATTEMPTS {
            match self.create_with_reference(next_transaction_id(), new.clone()) {
                Err(LedgerError::DuplicateReference(reference)) => {
                    debug!(reference = %reference, "Transaction reference collision, regenerating");
                    last = Some(reference);
                }
                other => return other,
            }
        }
        Err(LedgerError::DuplicateReference(
            last.unwrap_or_else(next_transaction_id),
        ))
    }

    /// Creates a pending record under a caller-supplied reference.
    pub(crate) fn create_with_reference(
        &self,
        reference: TransactionRef,
        new: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        ensure_positive(new.amount)?;
        self.insert(reference, new)
    }

    fn insert(
        &self,
        reference: TransactionRef,
        new: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        match self.records.entry(reference) {
            Entry::Occupied(entry) => Err(LedgerError::DuplicateReference(entry.key().clone())),
            Entry::Vacant(entry) => {
                let record = new.into_pending(entry.key().clone());
                entry.insert(record.clone());
                Ok(record)
            }
        }
    }

    /// Returns a snapshot of the record.
    pub fn get(&self, reference: &TransactionRef) -> Result<Transaction, LedgerError> {
        self.records
            .get(reference)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LedgerError::TransactionNotFound(reference.clone()))
    }

    /// Moves a pending record to `Completed`.
    ///
    /// Completing an already completed record is a no-op that reports
    /// `AlreadyProcessed`. Completing a failed record is rejected.
    pub(crate) fn mark_completed(&self, reference: &TransactionRef) -> Result<Settlement, LedgerError> {
        self.transition(reference, TransactionStatus::Completed, None)
    }

    /// Moves a pending record to `Failed` with a reason.
    ///
    /// Failing an already failed record reports `AlreadyProcessed`. Failing a
    /// completed record is rejected.
    pub(crate) fn mark_failed(
        &self,
        reference: &TransactionRef,
        reason: impl Into<String>,
    ) -> Result<Settlement, LedgerError> {
        self.transition(reference, TransactionStatus::Failed, Some(reason.into()))
    }

    fn transition(
        &self,
        reference: &TransactionRef,
        to: TransactionStatus,
        reason: Option<String>,
    ) -> Result<Settlement, LedgerError> {
        let mut record = self
            .records
            .get_mut(reference)
            .ok_or_else(|| LedgerError::TransactionNotFound(reference.clone()))?;

        if record.status == to {
            return Ok(Settlement::AlreadyProcessed);
        }
        if !record.status.can_transition_to(to) {
            return Err(LedgerError::InvalidTransition {
                reference: reference.clone(),
                from: record.status,
                to,
            });
        }

        record.status = to;
        record.failure_reason = reason;
        record.settled_at = Some(Utc::now());
        Ok(Settlement::Settled)
    }

    /// Returns every record the account sent or received, newest first.
    #[must_use]
    pub fn list_for_account(&self, account_id: AccountId) -> Vec<Transaction> {
        let mut records: Vec<Transaction> = self
            .records
            .iter()
            .filter(|entry| entry.value().involves(account_id))
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Sums the completed records of `kind` that involve the account.
    #[must_use]
    pub fn completed_total(&self, account_id: AccountId, kind: TransactionKind) -> Decimal {
        self.records
            .iter()
            .filter(|entry| {
                let record = entry.value();
                record.kind == kind
                    && record.status == TransactionStatus::Completed
                    && record.involves(account_id)
            })
            .map(|entry| entry.value().amount)
            .sum()
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record was created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
