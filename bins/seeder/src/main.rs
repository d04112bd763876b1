//! Ledger seeder for Prestige development and testing.
//!
//! Builds an in-memory ledger from the layered configuration, seeds a demo
//! customer with accounts and investment packages, then runs a sample
//! settlement sequence so the structured logs and audit trail can be inspected.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prestige_core::account::AccountType;
use prestige_core::settlement::{
    DepositRequest, InvestmentRequest, MobileMoneyRequest, MobileNetwork, OpenTradeRequest,
    TracingAuditSink, TransferRequest,
};
use prestige_core::trading::{FixedPriceFeed, TradeSide};
use prestige_core::{LedgerSettings, SettlementCoordinator};
use prestige_shared::AppConfig;
use prestige_shared::types::UserId;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prestige=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let settings = LedgerSettings::from(&config);
    info!(
        bin_prefix = %settings.bin_prefix,
        currency = %settings.default_currency,
        trading_enabled = settings.trading_enabled,
        max_leverage = settings.max_leverage,
        "Configuration loaded"
    );

    let prices = Arc::new(FixedPriceFeed::with_reference_prices());
    let coordinator =
        SettlementCoordinator::new(settings, prices.clone(), Arc::new(TracingAuditSink));

    seed_packages(&coordinator);
    run_sample(&coordinator, &prices)?;

    info!(
        transactions = coordinator.ledger().len(),
        open_positions = coordinator.positions().open_positions().len(),
        "Seeding complete"
    );
    Ok(())
}

/// Lists the standard investment packages.
fn seed_packages(coordinator: &SettlementCoordinator) {
    let book = coordinator.investments();
    book.add_package("Starter", dec!(100), dec!(999.99), 30, dec!(5));
    book.add_package("Growth", dec!(1000), dec!(9999.99), 90, dec!(12));
    book.add_package("Premium", dec!(10000), dec!(100000), 180, dec!(20));

    for package in book.packages() {
        info!(
            package = %package.name,
            min_amount = %package.min_amount,
            max_amount = %package.max_amount,
            duration_days = package.duration_days,
            roi = %package.roi_percentage,
            "Investment package listed"
        );
    }
}

fn run_sample(coordinator: &SettlementCoordinator, prices: &FixedPriceFeed) -> anyhow::Result<()> {
    let customer = UserId::new();
    let savings = coordinator.open_account(customer, AccountType::Savings);
    let checking = coordinator.open_account(customer, AccountType::Checking);
    let investment = coordinator.investment_account(customer)?;

    let deposit = coordinator.initiate_deposit(&DepositRequest {
        user_id: customer,
        account_id: savings.id,
        amount: dec!(5000),
        currency: savings.currency,
    })?;
    coordinator.confirm_payment(&deposit.reference, true)?;

    coordinator.transfer(&TransferRequest {
        user_id: customer,
        from_account: savings.id,
        to_account: investment.id,
        amount: dec!(2500),
        description: Some("Fund investment account".to_string()),
    })?;
    coordinator.transfer(&TransferRequest {
        user_id: customer,
        from_account: savings.id,
        to_account: checking.id,
        amount: dec!(300),
        description: None,
    })?;

    let payout = coordinator.send_mobile_money(&MobileMoneyRequest {
        user_id: customer,
        from_account: checking.id,
        mobile_number: "0244123456".to_string(),
        network: MobileNetwork::Mtn,
        amount: dec!(50),
        description: Some("Airtime".to_string()),
    })?;
    coordinator.confirm_payment(&payout.reference, false)?;

    if let Some(starter) = coordinator
        .investments()
        .packages()
        .into_iter()
        .find(|package| package.name == "Starter")
    {
        coordinator.create_investment(&InvestmentRequest {
            user_id: customer,
            account_id: investment.id,
            package_id: starter.id,
            amount: dec!(500),
        })?;
    }

    if coordinator.settings().trading_enabled {
        let position = coordinator.open_trade(&OpenTradeRequest {
            user_id: customer,
            account_id: investment.id,
            symbol: "BTCUSDT".to_string(),
            side: TradeSide::Buy,
            amount: dec!(1000),
            leverage: 10,
            take_profit: Some(dec!(57750)),
            stop_loss: Some(dec!(52250)),
        })?;
        prices.set_price(&position.symbol, dec!(57750));
        coordinator.close_triggered_positions();
    }

    for account in coordinator.accounts().accounts_for_owner(customer)? {
        info!(
            account_number = %account.account_number,
            account_type = ?account.account_type,
            balance = %account.holdings(),
            "Seeded account"
        );
    }
    Ok(())
}
