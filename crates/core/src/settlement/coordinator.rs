//! Settlement coordinator.
//!
//! Every operation follows the same shape: validate the request, create the
//! ledger record, then lock the involved accounts and stage the balance
//! changes together with the record transition. Gateway-backed payments stop
//! after the first half and are finalized by [`SettlementCoordinator::confirm_payment`].
//!
//! Lock timeouts are retried with a linear back-off. Any other failure after
//! the record was created marks it `FAILED`; balances are left untouched.

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use prestige_shared::types::{AccountId, Currency, InvestmentId, PositionId, UserId};

use crate::account::{Account, AccountStore, AccountType, LockedAccounts};
use crate::error::LedgerError;
use crate::ident::TransactionRef;
use crate::investment::{Investment, InvestmentBook, InvestmentStatus};
use crate::ledger::{
    NewTransaction, Settlement, Transaction, TransactionKind, TransactionLedger,
    TransactionStatus,
};
use crate::trading::{PositionBook, PositionStatus, PriceFeed, TradePosition, margin_for};

use super::audit::{AuditAction, AuditEvent, AuditOutcome, AuditSink};
use super::requests::{
    BillPaymentRequest, DepositRequest, InvestmentRequest, MobileMoneyRequest, OpenTradeRequest,
    TransferRequest, WithdrawalRequest,
};
use super::settings::LedgerSettings;
use super::validation::{ValidationErrors, validate};

/// Reason stored on records the gateway reports as unsuccessful.
const GATEWAY_DECLINED: &str = "Payment declined by gateway";

/// Orchestrates money movement across accounts, the ledger, positions and investments.
pub struct SettlementCoordinator {
    settings: LedgerSettings,
    accounts: AccountStore,
    ledger: TransactionLedger,
    positions: PositionBook,
    investments: InvestmentBook,
    prices: Arc<dyn PriceFeed>,
    audit: Arc<dyn AuditSink>,
}

impl SettlementCoordinator {
    /// Creates a coordinator with empty stores.
    #[must_use]
    pub fn new(
        settings: LedgerSettings,
        prices: Arc<dyn PriceFeed>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let accounts = AccountStore::new(settings.bin_prefix.clone(), settings.lock_timeout);
        Self {
            settings,
            accounts,
            ledger: TransactionLedger::new(),
            positions: PositionBook::new(),
            investments: InvestmentBook::new(),
            prices,
            audit,
        }
    }

    /// Settings the coordinator was built with.
    #[must_use]
    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// The account store.
    #[must_use]
    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// The transaction ledger.
    #[must_use]
    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    /// Trade positions.
    #[must_use]
    pub fn positions(&self) -> &PositionBook {
        &self.positions
    }

    /// Investment packages and investments.
    #[must_use]
    pub fn investments(&self) -> &InvestmentBook {
        &self.investments
    }

    /// Opens an account in the bank's default currency.
    pub fn open_account(&self, owner_id: UserId, account_type: AccountType) -> Account {
        self.open_account_in(owner_id, account_type, self.settings.default_currency)
    }

    /// Opens an account held in `currency`, e.g. a BTC wallet for crypto deposits.
    pub fn open_account_in(
        &self,
        owner_id: UserId,
        account_type: AccountType,
        currency: Currency,
    ) -> Account {
        let account = self.accounts.open_account(owner_id, account_type, currency);
        info!(
            account_id = %account.id,
            account_number = %account.account_number,
            account_type = ?account_type,
            currency = %currency,
            "Account opened"
        );
        account
    }

    /// The customer's investment account, opened on first access.
    pub fn investment_account(&self, owner_id: UserId) -> Result<Account, LedgerError> {
        self.accounts.get_or_open(
            owner_id,
            AccountType::Investment,
            self.settings.default_currency,
        )
    }

    // ========== Immediate settlement ==========

    /// Moves money between two accounts and completes the record.
    pub fn transfer(&self, request: &TransferRequest) -> Result<Transaction, LedgerError> {
        let result = self.execute_transfer(request);
        self.audit_transaction(
            AuditAction::Transfer,
            request.user_id,
            request.from_account,
            request.amount,
            &result,
        );
        result
    }

    fn execute_transfer(&self, request: &TransferRequest) -> Result<Transaction, LedgerError> {
        validate(request)?;
        let (from, to, amount) = (request.from_account, request.to_account, request.amount);
        if from == to {
            return Err(LedgerError::SameAccountTransfer(from));
        }
        let sender = self.owned_account(request.user_id, from)?;
        let recipient = self.accounts.get(to)?;
        ensure_currency(&recipient, sender.currency)?;

        let new = NewTransaction::new(TransactionKind::Transfer, amount, sender.currency)
            .sender(from)
            .recipient(to);
        let record = self
            .ledger
            .create(with_description(new, request.description.as_deref()))?;

        let settled = self.settle(&[from, to], |scope| {
            scope.debit(from, amount)?;
            scope.credit(to, amount)?;
            self.ledger.mark_completed(&record.reference)
        });
        self.finish(&record, settled)?;

        info!(
            reference = %record.reference,
            from = %from,
            to = %to,
            amount = %amount,
            "Transfer completed"
        );
        self.ledger.get(&record.reference)
    }

    // ========== Gateway-backed payments ==========

    /// Records a pending deposit; the account is credited on confirmation.
    ///
    /// Crypto deposits carry the bank's wallet address for the asset in the
    /// record metadata.
    pub fn initiate_deposit(&self, request: &DepositRequest) -> Result<Transaction, LedgerError> {
        let result = self.execute_deposit(request);
        self.audit_transaction(
            AuditAction::DepositInitiated,
            request.user_id,
            request.account_id,
            request.amount,
            &result,
        );
        result
    }

    fn execute_deposit(&self, request: &DepositRequest) -> Result<Transaction, LedgerError> {
        validate(request)?;
        let account = self.owned_account(request.user_id, request.account_id)?;
        account.ensure_active()?;
        ensure_currency(&account, request.currency)?;

        let mut new = NewTransaction::new(TransactionKind::Deposit, request.amount, request.currency)
            .recipient(account.id);
        if request.currency.is_crypto() {
            let address = self.settings.deposit_address(request.currency)?;
            new = new
                .metadata("deposit_address", address)
                .metadata("currency", request.currency.to_string())
                .metadata("expected_amount", request.amount.to_string())
                .description(format!("{} deposit", request.currency));
        }

        let record = self.ledger.create(new)?;
        info!(
            reference = %record.reference,
            account_id = %account.id,
            amount = %record.amount,
            currency = %record.currency,
            "Deposit awaiting confirmation"
        );
        Ok(record)
    }

    /// Reserves a withdrawal; the debit is final once the gateway confirms.
    pub fn initiate_withdrawal(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<Transaction, LedgerError> {
        let result = validate(request).map_err(LedgerError::from).and_then(|()| {
            self.reserve(
                request.user_id,
                request.account_id,
                TransactionKind::Withdrawal,
                request.amount,
                |new| {
                    with_description(
                        new.metadata("destination", request.destination.trim()),
                        request.description.as_deref(),
                    )
                },
            )
        });
        self.audit_transaction(
            AuditAction::WithdrawalInitiated,
            request.user_id,
            request.account_id,
            request.amount,
            &result,
        );
        result
    }

    /// Reserves a bill payment until the biller confirms.
    pub fn pay_bill(&self, request: &BillPaymentRequest) -> Result<Transaction, LedgerError> {
        let result = validate(request).map_err(LedgerError::from).and_then(|()| {
            self.reserve(
                request.user_id,
                request.account_id,
                TransactionKind::BillPayment,
                request.amount,
                |new| {
                    with_description(
                        new.metadata("biller", request.biller.trim())
                            .metadata("customer_reference", request.customer_reference.trim()),
                        request.description.as_deref(),
                    )
                },
            )
        });
        self.audit_transaction(
            AuditAction::BillPayment,
            request.user_id,
            request.account_id,
            request.amount,
            &result,
        );
        result
    }

    /// Reserves a mobile money payout until the operator confirms.
    pub fn send_mobile_money(
        &self,
        request: &MobileMoneyRequest,
    ) -> Result<Transaction, LedgerError> {
        let result = validate(request).map_err(LedgerError::from).and_then(|()| {
            self.reserve(
                request.user_id,
                request.from_account,
                TransactionKind::MobileMoney,
                request.amount,
                |new| {
                    with_description(
                        new.metadata("mobile_number", request.mobile_number.as_str())
                            .metadata("network", request.network.to_string()),
                        request.description.as_deref(),
                    )
                },
            )
        });
        self.audit_transaction(
            AuditAction::MobileMoney,
            request.user_id,
            request.from_account,
            request.amount,
            &result,
        );
        result
    }

    fn reserve(
        &self,
        user_id: UserId,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Decimal,
        details: impl FnOnce(NewTransaction) -> NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        let account = self.owned_account(user_id, account_id)?;
        let record = self
            .ledger
            .create(details(NewTransaction::new(kind, amount, account.currency).sender(account_id)))?;

        let balance = self.settle(&[account_id], |scope| scope.debit(account_id, amount));
        let balance = self.finish(&record, balance)?;

        info!(
            reference = %record.reference,
            kind = %kind,
            account_id = %account_id,
            amount = %amount,
            balance = %balance,
            "Funds reserved pending confirmation"
        );
        Ok(record)
    }

    /// Finalizes a gateway-backed payment exactly once.
    ///
    /// A successful deposit credits the recipient; a failed withdrawal, bill
    /// payment or mobile money payout returns the reserved funds. Replaying
    /// the same outcome reports `AlreadyProcessed` without touching balances;
    /// the opposite outcome on a settled record is an `InvalidTransition`.
    pub fn confirm_payment(
        &self,
        reference: &TransactionRef,
        succeeded: bool,
    ) -> Result<Settlement, LedgerError> {
        let result = self.execute_confirmation(reference, succeeded);

        let outcome = match &result {
            Ok(Settlement::Settled) => AuditOutcome::Settled,
            Ok(Settlement::AlreadyProcessed) => AuditOutcome::AlreadyProcessed,
            Err(err) => AuditOutcome::Rejected(err.error_code().to_string()),
        };
        let mut event = AuditEvent::new(AuditAction::PaymentConfirmation, outcome).reference(reference);
        if let Ok(record) = self.ledger.get(reference) {
            event = event.amount(record.amount);
            if let Some(account_id) = confirmation_account(&record) {
                event = event.account(account_id);
            }
        }
        self.record_audit(&event);
        result
    }

    fn execute_confirmation(
        &self,
        reference: &TransactionRef,
        succeeded: bool,
    ) -> Result<Settlement, LedgerError> {
        let record = self.ledger.get(reference)?;
        let account_id = confirmation_account(&record)
            .ok_or_else(|| LedgerError::NotAwaitingConfirmation(reference.clone()))?;
        let target = if succeeded {
            TransactionStatus::Completed
        } else {
            TransactionStatus::Failed
        };

        let settlement = self.settle(&[account_id], |scope| {
            // Re-read under the account lock so concurrent callbacks serialize here.
            let current = self.ledger.get(reference)?;
            if current.status.is_terminal() {
                return if current.status == target {
                    Ok(Settlement::AlreadyProcessed)
                } else {
                    Err(LedgerError::InvalidTransition {
                        reference: reference.clone(),
                        from: current.status,
                        to: target,
                    })
                };
            }
            ensure_currency(scope.account(account_id)?, current.currency)?;

            match (current.kind, succeeded) {
                (TransactionKind::Deposit, true) => {
                    scope.credit(account_id, current.amount)?;
                }
                (kind, false) if kind.reserves_on_initiate() => {
                    scope.reverse_debit(account_id, current.amount)?;
                }
                _ => {}
            }

            if succeeded {
                self.ledger.mark_completed(reference)
            } else {
                self.ledger.mark_failed(reference, GATEWAY_DECLINED)
            }
        })?;

        match settlement {
            Settlement::Settled => info!(
                reference = %reference,
                kind = %record.kind,
                status = %target,
                amount = %record.amount,
                "Payment confirmation settled"
            ),
            Settlement::AlreadyProcessed => debug!(
                reference = %reference,
                "Duplicate payment confirmation ignored"
            ),
        }
        Ok(settlement)
    }

    // ========== Trading ==========

    /// Opens a leveraged position, reserving `amount / leverage` as margin.
    pub fn open_trade(&self, request: &OpenTradeRequest) -> Result<TradePosition, LedgerError> {
        let result = self.execute_open_trade(request);
        let outcome = outcome_of(&result, AuditOutcome::Settled);
        let mut event = AuditEvent::new(AuditAction::TradeOpened, outcome)
            .user(request.user_id)
            .account(request.account_id);
        if let Ok(position) = &result {
            event = event.amount(position.margin_required);
        }
        self.record_audit(&event);
        result
    }

    fn execute_open_trade(&self, request: &OpenTradeRequest) -> Result<TradePosition, LedgerError> {
        validate(request)?;
        if !self.settings.trading_enabled {
            return Err(LedgerError::TradingDisabled);
        }
        if request.amount < self.settings.min_trade_amount {
            return Err(ValidationErrors::single(
                "amount",
                format!(
                    "Minimum trade amount is {}.",
                    self.settings.min_trade_amount
                ),
            )
            .into());
        }
        if request.leverage > self.settings.max_leverage {
            return Err(LedgerError::InvalidLeverage {
                leverage: request.leverage,
                max: self.settings.max_leverage,
            });
        }

        let account = self.owned_account(request.user_id, request.account_id)?;
        let entry_price = self.prices.current_price(&request.symbol)?;
        let margin = margin_for(request.amount, request.leverage, account.currency);

        let position = TradePosition {
            id: PositionId::new(),
            owner_id: request.user_id,
            account_id: account.id,
            symbol: request.symbol.clone(),
            side: request.side,
            amount: request.amount,
            leverage: request.leverage,
            margin_required: margin,
            entry_price,
            current_price: entry_price,
            take_profit: request.take_profit,
            stop_loss: request.stop_loss,
            profit_loss: Decimal::ZERO,
            status: PositionStatus::Open,
            currency: account.currency,
            opened_at: Utc::now(),
            closed_at: None,
        };

        let record = self.ledger.create(
            NewTransaction::new(TransactionKind::Trade, margin, account.currency)
                .sender(account.id)
                .position(position.id)
                .metadata("symbol", position.symbol.as_str())
                .metadata("side", position.side.to_string())
                .metadata("leverage", position.leverage.to_string())
                .description(format!("Margin for {} {}", position.side, position.symbol)),
        )?;

        let settled = self.settle(&[account.id], |scope| {
            scope.debit(account.id, margin)?;
            self.ledger.mark_completed(&record.reference)?;
            self.positions.insert(position.clone());
            Ok(())
        });
        self.finish(&record, settled)?;

        info!(
            position_id = %position.id,
            reference = %record.reference,
            symbol = %position.symbol,
            side = %position.side,
            leverage = position.leverage,
            margin = %margin,
            entry_price = %entry_price,
            "Trade position opened"
        );
        Ok(position)
    }

    /// Closes one of the customer's open positions at the current price.
    ///
    /// The account is credited `margin + profit/loss`, floored at zero.
    pub fn close_trade(
        &self,
        user_id: UserId,
        position_id: PositionId,
    ) -> Result<TradePosition, LedgerError> {
        let result = self.positions.get(position_id).and_then(|position| {
            if position.owner_id == user_id {
                self.close_position(&position)
            } else {
                Err(LedgerError::PositionNotFound(position_id))
            }
        });
        self.audit_close(Some(user_id), &result);
        result
    }

    fn close_position(&self, position: &TradePosition) -> Result<TradePosition, LedgerError> {
        if !position.is_open() {
            return Err(LedgerError::PositionNotOpen(position.id));
        }
        let price = self.prices.current_price(&position.symbol)?;
        let account_id = position.account_id;

        // P/L depends only on the entry terms and the exit price, so the
        // payout is known before the account is locked.
        let mut exit = position.clone();
        exit.mark_to_market(price);
        let (payout, uncovered) = exit.settlement_amounts();

        let record = if payout > Decimal::ZERO {
            Some(
                self.ledger.create(
                    NewTransaction::new(TransactionKind::Trade, payout, exit.currency)
                        .recipient(account_id)
                        .position(exit.id)
                        .metadata("symbol", exit.symbol.as_str())
                        .metadata("profit_loss", exit.profit_loss.to_string())
                        .metadata("uncovered_loss", uncovered.to_string())
                        .description(format!("Close {} {}", exit.side, exit.symbol)),
                )?,
            )
        } else {
            None
        };

        let settled = self.settle(&[account_id], |scope| {
            let open = self.positions.get(position.id)?;
            if !open.is_open() {
                return Err(LedgerError::PositionNotOpen(open.id));
            }
            let mut current = open.clone();
            current.mark_to_market(price);
            current.status = PositionStatus::Closed;
            current.closed_at = Some(Utc::now());

            if payout > Decimal::ZERO {
                scope.credit(account_id, payout)?;
            }
            self.positions
                .update(current.id, |stored| stored.clone_from(&current))?;

            // Completing the record is the last step; undo the close if it fails.
            if let Some(record) = &record
                && let Err(err) = self.ledger.mark_completed(&record.reference)
            {
                self.positions
                    .update(open.id, |stored| stored.clone_from(&open))?;
                return Err(err);
            }
            Ok(current)
        });
        let closed = match &record {
            Some(record) => self.finish(record, settled)?,
            None => settled?,
        };

        if uncovered > Decimal::ZERO {
            warn!(
                position_id = %closed.id,
                uncovered = %uncovered,
                "Loss exceeded margin, payout floored at zero"
            );
        }

        info!(
            position_id = %closed.id,
            symbol = %closed.symbol,
            exit_price = %closed.current_price,
            profit_loss = %closed.profit_loss,
            "Trade position closed"
        );
        Ok(closed)
    }

    /// Marks every open position to the current market price.
    ///
    /// Balances are not touched. Positions whose symbol has no quote keep
    /// their previous mark.
    pub fn revalue_positions(&self) -> Vec<TradePosition> {
        let mut revalued = Vec::new();
        for position in self.positions.open_positions() {
            let price = match self.prices.current_price(&position.symbol) {
                Ok(price) => price,
                Err(err) => {
                    warn!(position_id = %position.id, error = %err, "Skipping revaluation");
                    continue;
                }
            };
            let updated = self.positions.update(position.id, |stored| {
                stored.is_open().then(|| {
                    stored.mark_to_market(price);
                    stored.clone()
                })
            });
            if let Ok(Some(updated)) = updated {
                revalued.push(updated);
            }
        }
        debug!(count = revalued.len(), "Open positions marked to market");
        revalued
    }

    /// Closes every open position whose take-profit or stop-loss was reached.
    pub fn close_triggered_positions(&self) -> Vec<TradePosition> {
        self.revalue_positions()
            .into_iter()
            .filter(TradePosition::trigger_hit)
            .filter_map(|position| {
                let result = self.close_position(&position);
                self.audit_close(None, &result);
                match result {
                    Ok(closed) => Some(closed),
                    Err(err) => {
                        warn!(position_id = %position.id, error = %err, "Triggered close failed");
                        None
                    }
                }
            })
            .collect()
    }

    fn audit_close(&self, user_id: Option<UserId>, result: &Result<TradePosition, LedgerError>) {
        let mut event = AuditEvent::new(
            AuditAction::TradeClosed,
            outcome_of(result, AuditOutcome::Settled),
        );
        if let Some(user_id) = user_id {
            event = event.user(user_id);
        }
        if let Ok(position) = result {
            event = event
                .account(position.account_id)
                .amount(position.settlement_amounts().0);
        }
        self.record_audit(&event);
    }

    // ========== Investments ==========

    /// Commits funds to an investment package.
    pub fn create_investment(&self, request: &InvestmentRequest) -> Result<Investment, LedgerError> {
        let result = self.execute_investment(request);
        let event = AuditEvent::new(
            AuditAction::InvestmentCreated,
            outcome_of(&result, AuditOutcome::Settled),
        )
        .user(request.user_id)
        .account(request.account_id)
        .amount(request.amount);
        self.record_audit(&event);
        result
    }

    fn execute_investment(&self, request: &InvestmentRequest) -> Result<Investment, LedgerError> {
        validate(request)?;
        let package = self.investments.package(request.package_id)?;
        package.ensure_accepts(request.amount)?;
        let account = self.owned_account(request.user_id, request.account_id)?;

        let start_date = Utc::now().date_naive();
        let investment = Investment {
            id: InvestmentId::new(),
            account_id: account.id,
            package_id: package.id,
            amount: request.amount,
            currency: account.currency,
            expected_return: package.expected_return(request.amount, account.currency),
            actual_return: None,
            start_date,
            end_date: package.maturity_date(start_date),
            status: InvestmentStatus::Active,
        };

        let record = self.ledger.create(
            NewTransaction::new(TransactionKind::Investment, request.amount, account.currency)
                .sender(account.id)
                .investment(investment.id)
                .metadata("package", package.name.as_str())
                .description(format!("Investment in {}", package.name)),
        )?;

        let settled = self.settle(&[account.id], |scope| {
            scope.debit(account.id, request.amount)?;
            self.ledger.mark_completed(&record.reference)?;
            self.investments.insert(investment.clone());
            Ok(())
        });
        self.finish(&record, settled)?;

        info!(
            investment_id = %investment.id,
            reference = %record.reference,
            package = %package.name,
            amount = %investment.amount,
            expected_return = %investment.expected_return,
            end_date = %investment.end_date,
            "Investment created"
        );
        Ok(investment)
    }

    // ========== Helpers ==========

    fn owned_account(&self, user_id: UserId, account_id: AccountId) -> Result<Account, LedgerError> {
        let account = self.accounts.get(account_id)?;
        if account.owner_id != user_id {
            return Err(LedgerError::AccountNotFound(account_id));
        }
        Ok(account)
    }

    /// Runs `f` inside an account scope, retrying lock timeouts.
    fn settle<R>(
        &self,
        account_ids: &[AccountId],
        mut f: impl FnMut(&mut LockedAccounts<'_>) -> Result<R, LedgerError>,
    ) -> Result<R, LedgerError> {
        self.with_retry(|| self.accounts.with_locked(account_ids, &mut f))
    }

    fn with_retry<R>(
        &self,
        mut attempt: impl FnMut() -> Result<R, LedgerError>,
    ) -> Result<R, LedgerError> {
        let mut retries = 0;
        loop {
            match attempt() {
                Err(err) if err.is_retryable() && retries < self.settings.max_retries => {
                    retries += 1;
                    warn!(
                        attempt = retries,
                        max_retries = self.settings.max_retries,
                        error = %err,
                        "Retrying settlement"
                    );
                    thread::sleep(self.settings.retry_backoff * retries);
                }
                result => return result,
            }
        }
    }

    /// Marks the record failed if settlement did not go through.
    fn finish<R>(
        &self,
        record: &Transaction,
        settled: Result<R, LedgerError>,
    ) -> Result<R, LedgerError> {
        settled.inspect_err(|err| {
            warn!(
                reference = %record.reference,
                kind = %record.kind,
                error = %err,
                "Settlement failed"
            );
            if let Err(mark_err) = self.ledger.mark_failed(&record.reference, err.to_string()) {
                warn!(
                    reference = %record.reference,
                    error = %mark_err,
                    "Could not mark transaction failed"
                );
            }
        })
    }

    fn audit_transaction(
        &self,
        action: AuditAction,
        user_id: UserId,
        account_id: AccountId,
        amount: Decimal,
        result: &Result<Transaction, LedgerError>,
    ) {
        let outcome = match result {
            Ok(record) if record.status == TransactionStatus::Pending => AuditOutcome::Pending,
            Ok(_) => AuditOutcome::Settled,
            Err(err) => AuditOutcome::Rejected(err.error_code().to_string()),
        };
        let mut event = AuditEvent::new(action, outcome)
            .user(user_id)
            .account(account_id)
            .amount(amount);
        if let Ok(record) = result {
            event = event.reference(&record.reference);
        }
        self.record_audit(&event);
    }

    fn record_audit(&self, event: &AuditEvent) {
        if let Err(err) = self.audit.record(event) {
            warn!(action = %event.action, error = %err, "Audit event dropped");
        }
    }
}

fn outcome_of<T>(result: &Result<T, LedgerError>, success: AuditOutcome) -> AuditOutcome {
    match result {
        Ok(_) => success,
        Err(err) => AuditOutcome::Rejected(err.error_code().to_string()),
    }
}

fn ensure_currency(account: &Account, currency: Currency) -> Result<(), LedgerError> {
    if account.currency == currency {
        Ok(())
    } else {
        Err(LedgerError::CurrencyMismatch {
            account_id: account.id,
            expected: account.currency,
            actual: currency,
        })
    }
}

fn with_description(new: NewTransaction, description: Option<&str>) -> NewTransaction {
    match description.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => new.description(text),
        None => new,
    }
}

/// The account a gateway callback settles against, if the record awaits one.
fn confirmation_account(record: &Transaction) -> Option<AccountId> {
    if !record.kind.awaits_confirmation() {
        return None;
    }
    if record.kind.reserves_on_initiate() {
        record.sender
    } else {
        record.recipient
    }
}
