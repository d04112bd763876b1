//! Property-based tests for `TransactionLedger`.
//!
//! - Settlement is idempotent: completing twice equals completing once
//! - No transition ever leaves a terminal state

use proptest::prelude::*;
use rust_decimal::Decimal;

use prestige_shared::types::{AccountId, Currency};

use super::journal::TransactionLedger;
use super::types::{NewTransaction, Settlement, TransactionKind, TransactionStatus};

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Complete,
    Fail,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![Just(Step::Complete), Just(Step::Fail)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of completion and failure attempts, the first one
    /// decides the terminal state and every later attempt either reports
    /// `AlreadyProcessed` or is rejected without changing the record.
    #[test]
    fn prop_first_transition_wins(
        amount in positive_amount(),
        steps in prop::collection::vec(step_strategy(), 1..10),
    ) {
        let ledger = TransactionLedger::new();
        let record = ledger
            .create(NewTransaction::new(TransactionKind::Withdrawal, amount, Currency::Ghs)
                .sender(AccountId::new()))
            .unwrap();

        let apply = |step: Step| match step {
            Step::Complete => ledger.mark_completed(&record.reference),
            Step::Fail => ledger.mark_failed(&record.reference, "declined"),
        };

        prop_assert_eq!(apply(steps[0]).unwrap(), Settlement::Settled);
        let decided = ledger.get(&record.reference).unwrap();
        let expected = match steps[0] {
            Step::Complete => TransactionStatus::Completed,
            Step::Fail => TransactionStatus::Failed,
        };
        prop_assert_eq!(decided.status, expected);

        for step in &steps[1..] {
            if let Ok(outcome) = apply(*step) {
                prop_assert_eq!(outcome, Settlement::AlreadyProcessed);
            }
            prop_assert_eq!(&ledger.get(&record.reference).unwrap(), &decided);
        }
    }
}
