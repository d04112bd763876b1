//! Identifier generation for accounts and transactions.
//!
//! Account numbers are a bank identification number (BIN) prefix followed by a
//! zero-padded sequence. Transaction references are date-stamped random tokens
//! whose uniqueness is enforced by the transaction ledger.

use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum width of the sequence part of an account number.
const ACCOUNT_SEQUENCE_WIDTH: usize = 4;

/// Unique reference of a ledger transaction (e.g. `TX20260115A1B2C3D4`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRef(String);

impl TransactionRef {
    /// Wraps an existing reference, e.g. one echoed back by a payment gateway.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Returns a new transaction reference: `TX`, the UTC date, and 8 random hex digits.
#[must_use]
pub fn next_transaction_id() -> TransactionRef {
    let random = Uuid::new_v4().simple().to_string();
    TransactionRef(format!(
        "TX{}{}",
        Utc::now().format("%Y%m%d"),
        random[..8].to_uppercase()
    ))
}

/// Issues sequential account numbers per BIN prefix.
///
/// Thread-safe: the per-prefix counter is bumped under the map's entry lock,
/// so two concurrent callers never receive the same number.
#[derive(Debug, Default)]
pub struct AccountNumberGenerator {
    highest: DashMap<String, u64>,
}

impl AccountNumberGenerator {
    /// Creates a generator with no issued numbers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next account number for `bin_prefix`.
    ///
    /// The result is strictly greater than any number previously issued or
    /// observed for the same prefix. The first number is `{bin_prefix}0001`.
    pub fn next_account_number(&self, bin_prefix: &str) -> String {
        let mut highest = self.highest.entry(bin_prefix.to_string()).or_insert(0);
        *highest += 1;
        format_account_number(bin_prefix, *highest)
    }

    /// Registers an account number issued elsewhere (e.g. loaded from storage).
    ///
    /// Numbers that do not carry `bin_prefix` or whose suffix is not numeric are ignored.
    pub fn observe(&self, bin_prefix: &str, account_number: &str) {
        let Some(sequence) = account_number
            .strip_prefix(bin_prefix)
            .and_then(|suffix| suffix.parse::<u64>().ok())
        else {
            return;
        };

        let mut highest = self.highest.entry(bin_prefix.to_string()).or_insert(0);
        if sequence > *highest {
            *highest = sequence;
        }
    }
}

fn format_account_number(bin_prefix: &str, sequence: u64) -> String {
    format!("{bin_prefix}{sequence:0width$}", width = ACCOUNT_SEQUENCE_WIDTH)
}
