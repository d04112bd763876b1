//! Property-based tests for `SettlementCoordinator`.
//!
//! - Transfers conserve the bank-wide total and never overdraw
//! - A gateway callback changes balances at most once, whatever is replayed
//! - Closing a position returns exactly the floored equity

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use prestige_shared::types::{AccountId, UserId};

use crate::account::AccountType;
use crate::ledger::{TransactionKind, TransactionStatus};
use crate::trading::{FixedPriceFeed, TradeSide};

use super::audit::MemoryAuditSink;
use super::coordinator::SettlementCoordinator;
use super::requests::{OpenTradeRequest, TransferRequest, WithdrawalRequest};
use super::settings::LedgerSettings;

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn coordinator() -> (SettlementCoordinator, Arc<FixedPriceFeed>) {
    let prices = Arc::new(FixedPriceFeed::new());
    let coordinator = SettlementCoordinator::new(
        LedgerSettings::default(),
        prices.clone(),
        Arc::new(MemoryAuditSink::new()),
    );
    (coordinator, prices)
}

fn funded(coordinator: &SettlementCoordinator, user: UserId, balance: Decimal) -> AccountId {
    let account = coordinator.open_account(user, AccountType::Savings);
    coordinator.accounts().credit(account.id, balance).unwrap();
    account.id
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// *For any* sequence of transfers between three accounts, the combined
    /// balance is unchanged, no balance goes negative, and every completed
    /// record corresponds to a transfer that returned `Ok`.
    #[test]
    fn prop_transfers_conserve_total(
        balances in prop::collection::vec(positive_amount(), 3),
        transfers in prop::collection::vec((0usize..3, 0usize..3, positive_amount()), 1..25),
    ) {
        let (coordinator, _) = coordinator();
        let user = UserId::new();
        let ids: Vec<AccountId> = balances
            .iter()
            .map(|balance| funded(&coordinator, user, *balance))
            .collect();
        let total: Decimal = balances.iter().copied().sum();
        let mut succeeded = 0usize;

        for (from, to, amount) in transfers {
            let request = TransferRequest {
                user_id: user,
                from_account: ids[from],
                to_account: ids[to],
                amount,
                description: None,
            };
            if coordinator.transfer(&request).is_ok() {
                prop_assert_ne!(from, to);
                succeeded += 1;
            }

            let mut sum = Decimal::ZERO;
            for id in &ids {
                let balance = coordinator.accounts().get_balance(*id).unwrap();
                prop_assert!(balance >= Decimal::ZERO);
                sum += balance;
            }
            prop_assert_eq!(sum, total);
        }

        let completed = ids
            .iter()
            .flat_map(|id| coordinator.ledger().list_for_account(*id))
            .filter(|record| {
                record.kind == TransactionKind::Transfer
                    && record.status == TransactionStatus::Completed
            })
            .map(|record| record.reference)
            .collect::<std::collections::BTreeSet<_>>();
        prop_assert_eq!(completed.len(), succeeded);
    }

    /// *For any* replay of gateway callbacks, only the first one settles: a
    /// successful first callback keeps the reservation, a failed one returns it.
    #[test]
    fn prop_withdrawal_confirmation_applies_once(
        opening in positive_amount(),
        fraction in 1u32..=100,
        callbacks in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let (coordinator, _) = coordinator();
        let user = UserId::new();
        let account = funded(&coordinator, user, opening);
        let amount = (opening * Decimal::from(fraction) / dec!(100))
            .round_dp(2)
            .max(dec!(0.01));

        let record = coordinator
            .initiate_withdrawal(&WithdrawalRequest {
                user_id: user,
                account_id: account,
                amount,
                destination: "0244123456".to_string(),
                description: None,
            })
            .unwrap();

        for succeeded in &callbacks {
            let _ = coordinator.confirm_payment(&record.reference, *succeeded);
        }

        let expected = if callbacks[0] { opening - amount } else { opening };
        prop_assert_eq!(coordinator.accounts().get_balance(account).unwrap(), expected);
    }

    /// *For any* entry and exit price, closing pays back `max(0, margin + P/L)`.
    #[test]
    fn prop_close_pays_floored_equity(
        amount in (1_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
        leverage in 1u32..=100,
        entry in (100i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
        exit in (100i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
        sell in any::<bool>(),
    ) {
        let (coordinator, prices) = coordinator();
        prices.set_price("ETHUSDT", entry);
        let user = UserId::new();
        let opening = amount;
        let account = funded(&coordinator, user, opening);

        let position = coordinator
            .open_trade(&OpenTradeRequest {
                user_id: user,
                account_id: account,
                symbol: "ETHUSDT".to_string(),
                side: if sell { TradeSide::Sell } else { TradeSide::Buy },
                amount,
                leverage,
                take_profit: None,
                stop_loss: None,
            })
            .unwrap();

        prices.set_price("ETHUSDT", exit);
        let closed = coordinator.close_trade(user, position.id).unwrap();
        let payout = (closed.margin_required + closed.profit_loss).max(Decimal::ZERO);

        let balance = coordinator.accounts().get_balance(account).unwrap();
        prop_assert!(balance >= Decimal::ZERO);
        prop_assert_eq!(balance, opening - closed.margin_required + payout);
    }
}
