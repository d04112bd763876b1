//! Ledger engine for Prestige.
//!
//! This crate contains the money-movement core with ZERO web or database
//! dependencies: balances, the transaction ledger, settlement of every
//! transaction kind, trading margin and investment packages.
//!
//! # Modules
//!
//! - `account` - Account balances and per-account locking
//! - `ledger` - Transaction records and their lifecycle
//! - `settlement` - Validated, atomic, idempotent money movement
//! - `trading` - Leveraged positions, margin and prices
//! - `investment` - Fixed-term investment packages
//! - `ident` - Account numbers and transaction references
//! - `error` - Ledger error taxonomy

pub mod account;
pub mod error;
pub mod ident;
pub mod investment;
pub mod ledger;
pub mod settlement;
pub mod trading;

pub use error::LedgerError;
pub use settlement::{LedgerSettings, SettlementCoordinator};
