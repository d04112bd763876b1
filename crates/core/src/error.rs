//! Ledger error types.
//!
//! Every fallible engine operation returns `LedgerError`. Validation failures
//! are returned before any balance is touched; concurrency conflicts are the
//! only retryable variant.

use rust_decimal::Decimal;
use thiserror::Error;

use prestige_shared::AppError;
use prestige_shared::types::{AccountId, Currency, PackageId, PositionId};

use crate::account::AccountStatus;
use crate::ident::TransactionRef;
use crate::ledger::TransactionStatus;
use crate::settlement::validation::ValidationErrors;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Request failed field-level validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Amount must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Amount is outside the allowed range for an investment package.
    #[error("Amount must be between {min} and {max}, got {amount}")]
    AmountOutOfRange {
        /// Requested amount.
        amount: Decimal,
        /// Package minimum.
        min: Decimal,
        /// Package maximum.
        max: Decimal,
    },

    /// Sender and recipient are the same account.
    #[error("Cannot transfer from account {0} to itself")]
    SameAccountTransfer(AccountId),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is not active and cannot move money.
    #[error("Account {account_id} is {status}, only active accounts can move money")]
    AccountNotActive {
        /// The account.
        account_id: AccountId,
        /// Its current status.
        status: AccountStatus,
    },

    /// Balance does not cover the requested debit.
    #[error("Insufficient funds in account {account_id}: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The account.
        account_id: AccountId,
        /// Amount requested.
        requested: Decimal,
        /// Balance at the time of the request.
        available: Decimal,
    },

    /// Account still holds funds and cannot be closed.
    #[error("Account {account_id} still holds {balance} and cannot be closed")]
    AccountNotEmpty {
        /// The account.
        account_id: AccountId,
        /// Remaining balance.
        balance: Decimal,
    },

    /// Money would move between different currencies without a conversion.
    #[error("Account {account_id} holds {expected}, cannot move {actual} through it")]
    CurrencyMismatch {
        /// The account whose currency differs.
        account_id: AccountId,
        /// Currency the account is held in.
        expected: Currency,
        /// Currency of the money being moved.
        actual: Currency,
    },

    // ========== Transaction State Errors ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionRef),

    /// A transaction with this reference already exists.
    #[error("Transaction reference {0} already exists")]
    DuplicateReference(TransactionRef),

    /// Attempted to leave a terminal state.
    #[error("Transaction {reference} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The transaction.
        reference: TransactionRef,
        /// Current status.
        from: TransactionStatus,
        /// Requested status.
        to: TransactionStatus,
    },

    /// Transaction is settled immediately and has no confirmation step.
    #[error("Transaction {0} is not awaiting external confirmation")]
    NotAwaitingConfirmation(TransactionRef),

    // ========== Trading Errors ==========
    /// Trading is switched off bank-wide.
    #[error("Trading is currently disabled")]
    TradingDisabled,

    /// Leverage is outside the bank-wide allowed range.
    #[error("Leverage must be between 1 and {max}, got {leverage}")]
    InvalidLeverage {
        /// Requested leverage.
        leverage: u32,
        /// Configured maximum.
        max: u32,
    },

    /// Trade position not found.
    #[error("Trade position not found: {0}")]
    PositionNotFound(PositionId),

    /// Trade position is not open.
    #[error("Trade position {0} is not open")]
    PositionNotOpen(PositionId),

    /// No price available for the symbol.
    #[error("No market price available for {0}")]
    PriceUnavailable(String),

    // ========== Investment & Deposit Errors ==========
    /// Investment package not found.
    #[error("Investment package not found: {0}")]
    PackageNotFound(PackageId),

    /// No wallet address configured for a crypto deposit.
    #[error("No deposit address configured for {0}")]
    DepositAddressMissing(Currency),

    // ========== Concurrency Errors ==========
    /// Account lock could not be acquired within the configured wait.
    #[error("Account {0} is busy, please retry")]
    ConcurrencyConflict(AccountId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::AmountOutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
            Self::SameAccountTransfer(_) => "SAME_ACCOUNT_TRANSFER",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountNotActive { .. } => "ACCOUNT_NOT_ACTIVE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::AccountNotEmpty { .. } => "ACCOUNT_NOT_EMPTY",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotAwaitingConfirmation(_) => "NOT_AWAITING_CONFIRMATION",
            Self::TradingDisabled => "TRADING_DISABLED",
            Self::InvalidLeverage { .. } => "INVALID_LEVERAGE",
            Self::PositionNotFound(_) => "POSITION_NOT_FOUND",
            Self::PositionNotOpen(_) => "POSITION_NOT_OPEN",
            Self::PriceUnavailable(_) => "PRICE_UNAVAILABLE",
            Self::PackageNotFound(_) => "PACKAGE_NOT_FOUND",
            Self::DepositAddressMissing(_) => "DEPOSIT_ADDRESS_MISSING",
            Self::ConcurrencyConflict(_) => "CONCURRENCY_CONFLICT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::Validation(_)
            | Self::InvalidAmount(_)
            | Self::AmountOutOfRange { .. }
            | Self::SameAccountTransfer(_)
            | Self::InvalidLeverage { .. }
            | Self::DepositAddressMissing(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_)
            | Self::TransactionNotFound(_)
            | Self::PositionNotFound(_)
            | Self::PackageNotFound(_) => 404,

            // 409 Conflict - state and concurrency errors
            Self::DuplicateReference(_)
            | Self::InvalidTransition { .. }
            | Self::NotAwaitingConfirmation(_)
            | Self::PositionNotOpen(_)
            | Self::ConcurrencyConflict(_) => 409,

            // 422 Unprocessable - business rules
            Self::AccountNotActive { .. }
            | Self::InsufficientFunds { .. }
            | Self::AccountNotEmpty { .. }
            | Self::CurrencyMismatch { .. }
            | Self::TradingDisabled => 422,

            // 502 Bad Gateway - upstream price feed
            Self::PriceUnavailable(_) => 502,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            400 => Self::Validation(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            422 => Self::BusinessRule(message),
            502 => Self::ExternalService(message),
            _ => Self::Internal(message),
        }
    }
}
