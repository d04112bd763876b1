//! In-memory store of trade positions.

use dashmap::DashMap;

use prestige_shared::types::{AccountId, PositionId};

use crate::error::LedgerError;

use super::position::TradePosition;

/// Positions keyed by id.
///
/// Mutations of a position happen while the coordinator holds the lock of
/// the position's funding account, so two closes of one position serialize.
#[derive(Debug, Default)]
pub struct PositionBook {
    positions: DashMap<PositionId, TradePosition>,
}

impl PositionBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, position: TradePosition) {
        self.positions.insert(position.id, position);
    }

    /// Returns a snapshot of the position.
    pub fn get(&self, position_id: PositionId) -> Result<TradePosition, LedgerError> {
        self.positions
            .get(&position_id)
            .map(|entry| entry.value().clone())
            .ok_or(LedgerError::PositionNotFound(position_id))
    }

    pub(crate) fn update<R>(
        &self,
        position_id: PositionId,
        f: impl FnOnce(&mut TradePosition) -> R,
    ) -> Result<R, LedgerError> {
        let mut entry = self
            .positions
            .get_mut(&position_id)
            .ok_or(LedgerError::PositionNotFound(position_id))?;
        Ok(f(entry.value_mut()))
    }

    /// Returns snapshots of every open position.
    #[must_use]
    pub fn open_positions(&self) -> Vec<TradePosition> {
        let mut open: Vec<TradePosition> = self
            .positions
            .iter()
            .filter(|entry| entry.value().is_open())
            .map(|entry| entry.value().clone())
            .collect();
        open.sort_by_key(|position| position.opened_at);
        open
    }

    /// Returns every position funded from the account, oldest first.
    #[must_use]
    pub fn for_account(&self, account_id: AccountId) -> Vec<TradePosition> {
        let mut positions: Vec<TradePosition> = self
            .positions
            .iter()
            .filter(|entry| entry.value().account_id == account_id)
            .map(|entry| entry.value().clone())
            .collect();
        positions.sort_by_key(|position| position.opened_at);
        positions
    }
}
