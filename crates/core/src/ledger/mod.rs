//! Transaction ledger.
//!
//! Records each money-movement intent with its lifecycle state and enforces
//! reference uniqueness and exactly-once settlement.

pub mod journal;
pub mod types;

#[cfg(test)]
mod journal_props;

pub use journal::TransactionLedger;
pub use types::{NewTransaction, Settlement, Transaction, TransactionKind, TransactionStatus};
