//! Account balances and per-account locking.
//!
//! - `types` - Account aggregate, type and status
//! - `store` - Thread-safe account store with bounded-wait locks and
//!   multi-account atomic scopes

pub mod store;
pub mod types;

#[cfg(test)]
mod store_props;

pub use store::{AccountStore, LockedAccounts};
pub use types::{Account, AccountStatus, AccountType};
