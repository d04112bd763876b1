//! Identifiers for customers, accounts, positions and investments.
//!
//! Each entity gets its own UUID newtype, so a position id can never be
//! handed to an account lookup. Ids are UUID v7 and totally ordered: the
//! account store sorts `AccountId`s to fix the order in which a settlement
//! scope takes its locks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_ids {
    ($($(#[$meta:meta])* $name:ident;)+) => {$(
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh, time-ordered id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// The underlying UUID, e.g. for storage keys.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    )+};
}

entity_ids! {
    /// A bank customer.
    UserId;
    /// A customer account. Ordering decides lock acquisition order.
    AccountId;
    /// An open or closed leveraged trade.
    PositionId;
    /// A listed investment package.
    PackageId;
    /// A customer's placement into a package.
    InvestmentId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
