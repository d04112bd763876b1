//! Thread-safe account store.
//!
//! Each account lives in its own `parking_lot::Mutex`. Every balance change
//! runs inside [`AccountStore::with_locked`], which locks the involved
//! accounts in ascending id order with a bounded wait, stages the changes on
//! copies, and writes them back only if the whole closure succeeds.
//!
//! An owner index maps each customer to their account ids, so owner lookups
//! only ever lock that customer's own accounts.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;

use prestige_shared::types::{AccountId, Currency, UserId};

use crate::error::LedgerError;
use crate::ident::AccountNumberGenerator;

use super::types::{Account, AccountStatus, AccountType};

type AccountCell = Arc<Mutex<Account>>;

/// In-memory account store with per-account locks.
#[derive(Debug)]
pub struct AccountStore {
    accounts: DashMap<AccountId, AccountCell>,
    owners: DashMap<UserId, Vec<(AccountId, AccountType)>>,
    numbers: AccountNumberGenerator,
    bin_prefix: String,
    lock_timeout: Duration,
    // Serializes get-or-open so an owner never ends up with two accounts of one type.
    open_lock: Mutex<()>,
}

impl AccountStore {
    /// Creates an empty store issuing account numbers under `bin_prefix`.
    #[must_use]
    pub fn new(bin_prefix: impl Into<String>, lock_timeout: Duration) -> Self {
        Self {
            accounts: DashMap::new(),
            owners: DashMap::new(),
            numbers: AccountNumberGenerator::new(),
            bin_prefix: bin_prefix.into(),
            lock_timeout,
            open_lock: Mutex::new(()),
        }
    }

    /// Opens a new active account with a zero balance.
    pub fn open_account(
        &self,
        owner_id: UserId,
        account_type: AccountType,
        currency: Currency,
    ) -> Account {
        let number = self.numbers.next_account_number(&self.bin_prefix);
        let account = Account::new(number, owner_id, account_type, currency);
        self.index_owner(&account);
        self.accounts
            .insert(account.id, Arc::new(Mutex::new(account.clone())));
        account
    }

    /// Loads an account created elsewhere, keeping the number sequence ahead of it.
    pub fn restore(&self, account: Account) {
        self.numbers
            .observe(&self.bin_prefix, &account.account_number);
        self.index_owner(&account);
        self.accounts
            .insert(account.id, Arc::new(Mutex::new(account)));
    }

    /// Returns the owner's account of the given type, opening one on first access.
    pub fn get_or_open(
        &self,
        owner_id: UserId,
        account_type: AccountType,
        currency: Currency,
    ) -> Result<Account, LedgerError> {
        let _guard = self.open_lock.lock();
        if let Some(account) = self.find_by_owner(owner_id, account_type)? {
            return Ok(account);
        }
        Ok(self.open_account(owner_id, account_type, currency))
    }

    /// Returns a snapshot of the account.
    pub fn get(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        let cell = self.cell(account_id)?;
        let guard = self.lock_cell(account_id, &cell)?;
        Ok(guard.clone())
    }

    /// Returns the current balance.
    pub fn get_balance(&self, account_id: AccountId) -> Result<Decimal, LedgerError> {
        self.get(account_id).map(|account| account.balance)
    }

    /// Returns the owner's first account of the given type, if any.
    pub fn find_by_owner(
        &self,
        owner_id: UserId,
        account_type: AccountType,
    ) -> Result<Option<Account>, LedgerError> {
        let mut matching = Vec::new();
        for id in self.owned_ids(owner_id, Some(account_type)) {
            matching.push(self.get(id)?);
        }
        Ok(matching.into_iter().min_by_key(|account| account.opened_at))
    }

    /// Returns snapshots of every account the owner holds, oldest first.
    pub fn accounts_for_owner(&self, owner_id: UserId) -> Result<Vec<Account>, LedgerError> {
        let mut owned = self
            .owned_ids(owner_id, None)
            .into_iter()
            .map(|id| self.get(id))
            .collect::<Result<Vec<_>, _>>()?;
        owned.sort_by_key(|account| account.opened_at);
        Ok(owned)
    }

    fn index_owner(&self, account: &Account) {
        let mut ids = self.owners.entry(account.owner_id).or_default();
        if !ids.iter().any(|(id, _)| *id == account.id) {
            ids.push((account.id, account.account_type));
        }
    }

    // Copies the ids out so no index shard is held while waiting on an account lock.
    fn owned_ids(&self, owner_id: UserId, account_type: Option<AccountType>) -> Vec<AccountId> {
        self.owners
            .get(&owner_id)
            .map(|ids| {
                ids.iter()
                    .filter(|(_, kind)| account_type.is_none_or(|wanted| *kind == wanted))
                    .map(|(id, _)| *id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Atomically debits a single account.
    pub fn debit(&self, account_id: AccountId, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.with_locked(&[account_id], |scope| scope.debit(account_id, amount))
    }

    /// Atomically credits a single account.
    pub fn credit(&self, account_id: AccountId, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.with_locked(&[account_id], |scope| scope.credit(account_id, amount))
    }

    /// Changes the account status. Closing requires an empty account.
    pub fn set_status(
        &self,
        account_id: AccountId,
        status: AccountStatus,
    ) -> Result<Account, LedgerError> {
        let cell = self.cell(account_id)?;
        let mut guard = self.lock_cell(account_id, &cell)?;
        if status == AccountStatus::Closed && !guard.balance.is_zero() {
            return Err(LedgerError::AccountNotEmpty {
                account_id,
                balance: guard.balance,
            });
        }
        guard.status = status;
        Ok(guard.clone())
    }

    /// Runs `f` with exclusive access to every listed account.
    ///
    /// Locks are taken in ascending id order, each with the store's bounded
    /// wait; a timeout fails with `ConcurrencyConflict` and nothing is changed.
    /// Mutations made through the scope are written back only when `f`
    /// returns `Ok`.
    pub fn with_locked<R, F>(&self, account_ids: &[AccountId], f: F) -> Result<R, LedgerError>
    where
        F: FnOnce(&mut LockedAccounts<'_>) -> Result<R, LedgerError>,
    {
        let mut ids = account_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let cells = ids
            .iter()
            .map(|id| self.cell(*id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut guards = Vec::with_capacity(cells.len());
        for (id, cell) in ids.iter().zip(&cells) {
            guards.push(self.lock_cell(*id, cell)?);
        }

        let mut scope = LockedAccounts::new(guards);
        let result = f(&mut scope)?;
        scope.commit();
        Ok(result)
    }

    fn cell(&self, account_id: AccountId) -> Result<AccountCell, LedgerError> {
        self.accounts
            .get(&account_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    fn lock_cell<'a>(
        &self,
        account_id: AccountId,
        cell: &'a AccountCell,
    ) -> Result<MutexGuard<'a, Account>, LedgerError> {
        cell.try_lock_for(self.lock_timeout)
            .ok_or(LedgerError::ConcurrencyConflict(account_id))
    }
}

/// Exclusive, staged view over a set of locked accounts.
///
/// Reads and writes go to staged copies; the copies replace the locked
/// originals only on commit.
pub struct LockedAccounts<'a> {
    guards: Vec<MutexGuard<'a, Account>>,
    staged: Vec<Account>,
}

impl<'a> LockedAccounts<'a> {
    fn new(guards: Vec<MutexGuard<'a, Account>>) -> Self {
        let staged = guards.iter().map(|guard| (**guard).clone()).collect();
        Self { guards, staged }
    }

    fn position(&self, account_id: AccountId) -> Result<usize, LedgerError> {
        self.staged
            .iter()
            .position(|account| account.id == account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// Returns the staged state of a locked account.
    pub fn account(&self, account_id: AccountId) -> Result<&Account, LedgerError> {
        let index = self.position(account_id)?;
        Ok(&self.staged[index])
    }

    /// Returns the staged balance of a locked account.
    pub fn balance(&self, account_id: AccountId) -> Result<Decimal, LedgerError> {
        self.account(account_id).map(|account| account.balance)
    }

    /// Stages a debit.
    pub fn debit(&mut self, account_id: AccountId, amount: Decimal) -> Result<Decimal, LedgerError> {
        let index = self.position(account_id)?;
        self.staged[index].apply_debit(amount)
    }

    /// Stages a credit.
    pub fn credit(&mut self, account_id: AccountId, amount: Decimal) -> Result<Decimal, LedgerError> {
        let index = self.position(account_id)?;
        self.staged[index].apply_credit(amount)
    }

    /// Stages the return of reserved funds.
    pub fn reverse_debit(
        &mut self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let index = self.position(account_id)?;
        self.staged[index].apply_reversal(amount)
    }

    /// Discards every staged change made so far.
    pub fn rollback(&mut self) {
        for (staged, guard) in self.staged.iter_mut().zip(&self.guards) {
            staged.clone_from(guard);
        }
    }

    fn commit(mut self) {
        for (guard, staged) in self.guards.iter_mut().zip(self.staged) {
            **guard = staged;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Barrier;

    fn store() -> AccountStore {
        AccountStore::new("123456", Duration::from_millis(200))
    }

    fn funded(store: &AccountStore, amount: Decimal) -> AccountId {
        let account = store.open_account(UserId::new(), AccountType::Savings, Currency::Ghs);
        if amount > Decimal::ZERO {
            store.credit(account.id, amount).unwrap();
        }
        account.id
    }

    #[test]
    fn test_open_account_assigns_sequential_numbers() {
        let store = store();
        let owner = UserId::new();
        let first = store.open_account(owner, AccountType::Savings, Currency::Ghs);
        let second = store.open_account(owner, AccountType::Checking, Currency::Ghs);
        assert_eq!(first.account_number, "1234560001");
        assert_eq!(second.account_number, "1234560002");
        assert_eq!(store.accounts_for_owner(owner).unwrap().len(), 2);
    }

    #[test]
    fn test_restore_keeps_numbers_increasing() {
        let store = store();
        let mut loaded = Account::new(
            "1234560077".to_string(),
            UserId::new(),
            AccountType::Fixed,
            Currency::Ghs,
        );
        loaded.balance = dec!(12.50);
        store.restore(loaded.clone());

        assert_eq!(store.get_balance(loaded.id).unwrap(), dec!(12.50));
        let next = store.open_account(UserId::new(), AccountType::Savings, Currency::Ghs);
        assert_eq!(next.account_number, "1234560078");
    }

    #[test]
    fn test_get_or_open_reuses_existing_account() {
        let store = store();
        let owner = UserId::new();
        let first = store
            .get_or_open(owner, AccountType::Investment, Currency::Ghs)
            .unwrap();
        let second = store
            .get_or_open(owner, AccountType::Investment, Currency::Ghs)
            .unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_owner_lookup_ignores_other_customers_locks() {
        let store = Arc::new(store());
        let owner = UserId::new();
        let savings = store.open_account(owner, AccountType::Savings, Currency::Ghs);
        let stranger = funded(&store, dec!(10));
        let held = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));

        let holder = {
            let store = Arc::clone(&store);
            let held = Arc::clone(&held);
            let release = Arc::clone(&release);
            std::thread::spawn(move || {
                store
                    .with_locked(&[stranger], |_| {
                        held.wait();
                        release.wait();
                        Ok(())
                    })
                    .unwrap();
            })
        };

        held.wait();
        let investment = store.get_or_open(owner, AccountType::Investment, Currency::Ghs);
        let owned = store.accounts_for_owner(owner);
        let found = store.find_by_owner(owner, AccountType::Savings);
        release.wait();
        holder.join().unwrap();

        let investment = investment.unwrap();
        assert_eq!(investment.account_type, AccountType::Investment);
        assert_eq!(owned.unwrap().len(), 2);
        assert_eq!(found.unwrap().map(|account| account.id), Some(savings.id));
    }

    #[test]
    fn test_restore_indexes_owner_once() {
        let store = store();
        let owner = UserId::new();
        let loaded = Account::new(
            "1234560005".to_string(),
            owner,
            AccountType::Savings,
            Currency::Ghs,
        );
        store.restore(loaded.clone());
        store.restore(loaded.clone());

        let owned = store.accounts_for_owner(owner).unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, loaded.id);
    }

    #[test]
    fn test_credit_and_debit() {
        let store = store();
        let id = funded(&store, dec!(100));
        assert_eq!(store.debit(id, dec!(30)).unwrap(), dec!(70));
        assert_eq!(store.credit(id, dec!(5)).unwrap(), dec!(75));
        assert_eq!(store.get_balance(id).unwrap(), dec!(75));
    }

    #[test]
    fn test_unknown_account() {
        let store = store();
        let missing = AccountId::new();
        assert!(matches!(
            store.get_balance(missing),
            Err(LedgerError::AccountNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_failed_scope_leaves_balances_untouched() {
        let store = store();
        let from = funded(&store, dec!(50));
        let to = funded(&store, dec!(10));

        let result = store.with_locked(&[from, to], |scope| {
            scope.credit(to, dec!(80))?;
            scope.debit(from, dec!(80))
        });

        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(store.get_balance(from).unwrap(), dec!(50));
        assert_eq!(store.get_balance(to).unwrap(), dec!(10));
    }

    #[test]
    fn test_rollback_discards_staged_changes() {
        let store = store();
        let id = funded(&store, dec!(50));

        store
            .with_locked(&[id], |scope| {
                scope.debit(id, dec!(20))?;
                scope.rollback();
                assert_eq!(scope.balance(id)?, dec!(50));
                Ok(())
            })
            .unwrap();

        assert_eq!(store.get_balance(id).unwrap(), dec!(50));
    }

    #[test]
    fn test_duplicate_ids_lock_once() {
        let store = store();
        let id = funded(&store, dec!(10));
        let balance = store
            .with_locked(&[id, id], |scope| scope.credit(id, dec!(1)))
            .unwrap();
        assert_eq!(balance, dec!(11));
    }

    #[test]
    fn test_lock_timeout_is_a_concurrency_conflict() {
        let store = Arc::new(AccountStore::new("123456", Duration::from_millis(20)));
        let id = funded(&store, dec!(10));
        let held = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));

        let holder = {
            let store = Arc::clone(&store);
            let held = Arc::clone(&held);
            let release = Arc::clone(&release);
            std::thread::spawn(move || {
                store
                    .with_locked(&[id], |_| {
                        held.wait();
                        release.wait();
                        Ok(())
                    })
                    .unwrap();
            })
        };

        held.wait();
        let result = store.debit(id, dec!(1));
        release.wait();
        holder.join().unwrap();

        assert!(matches!(result, Err(LedgerError::ConcurrencyConflict(busy)) if busy == id));
        assert_eq!(store.get_balance(id).unwrap(), dec!(10));
    }

    #[test]
    fn test_close_requires_zero_balance() {
        let store = store();
        let id = funded(&store, dec!(10));
        assert!(matches!(
            store.set_status(id, AccountStatus::Closed),
            Err(LedgerError::AccountNotEmpty { .. })
        ));

        store.debit(id, dec!(10)).unwrap();
        let closed = store.set_status(id, AccountStatus::Closed).unwrap();
        assert_eq!(closed.status, AccountStatus::Closed);
        assert!(matches!(
            store.credit(id, dec!(1)),
            Err(LedgerError::AccountNotActive { .. })
        ));
    }
}
