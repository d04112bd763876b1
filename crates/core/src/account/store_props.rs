//! Property-based tests for `AccountStore`.
//!
//! - Balances never go negative under any sequence of debits and credits
//! - Transfers between two accounts conserve the combined balance

use std::time::Duration;

use proptest::prelude::*;
use rust_decimal::Decimal;

use prestige_shared::types::{AccountId, Currency, UserId};

use super::store::AccountStore;
use super::types::AccountType;

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

#[derive(Debug, Clone)]
enum Op {
    Debit(Decimal),
    Credit(Decimal),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        positive_amount().prop_map(Op::Debit),
        positive_amount().prop_map(Op::Credit),
    ]
}

fn store_with(balances: &[Decimal]) -> (AccountStore, Vec<AccountId>) {
    let store = AccountStore::new("123456", Duration::from_millis(100));
    let ids = balances
        .iter()
        .map(|balance| {
            let account = store.open_account(UserId::new(), AccountType::Savings, Currency::Ghs);
            if *balance > Decimal::ZERO {
                store.credit(account.id, *balance).unwrap();
            }
            account.id
        })
        .collect();
    (store, ids)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of debits and credits, the balance stays
    /// non-negative and equals the sum of the operations that succeeded.
    #[test]
    fn prop_balance_never_negative(
        opening in positive_amount(),
        ops in prop::collection::vec(op_strategy(), 1..30),
    ) {
        let (store, ids) = store_with(&[opening]);
        let id = ids[0];
        let mut expected = opening;

        for op in ops {
            match op {
                Op::Debit(amount) => {
                    if store.debit(id, amount).is_ok() {
                        expected -= amount;
                    }
                }
                Op::Credit(amount) => {
                    store.credit(id, amount).unwrap();
                    expected += amount;
                }
            }
            let balance = store.get_balance(id).unwrap();
            prop_assert!(balance >= Decimal::ZERO);
            prop_assert_eq!(balance, expected);
        }
    }

    /// *For any* two balances and transfer amount, a staged debit+credit
    /// either commits in full or leaves both balances untouched.
    #[test]
    fn prop_transfer_conserves_total(
        a in positive_amount(),
        b in positive_amount(),
        amount in positive_amount(),
    ) {
        let (store, ids) = store_with(&[a, b]);
        let (from, to) = (ids[0], ids[1]);

        let result = store.with_locked(&[from, to], |scope| {
            scope.debit(from, amount)?;
            scope.credit(to, amount)
        });

        let after_from = store.get_balance(from).unwrap();
        let after_to = store.get_balance(to).unwrap();
        prop_assert_eq!(after_from + after_to, a + b);
        if amount > a {
            prop_assert!(result.is_err());
            prop_assert_eq!(after_from, a);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(after_from, a - amount);
        }
    }
}
