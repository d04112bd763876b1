//! Immutable engine settings.

use std::time::Duration;

use rust_decimal::Decimal;

use prestige_shared::AppConfig;
use prestige_shared::types::Currency;

use crate::error::LedgerError;

/// Bank-wide settings the coordinator is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSettings {
    /// BIN prefix for new account numbers.
    pub bin_prefix: String,
    /// Currency new accounts are opened in.
    pub default_currency: Currency,
    /// Maximum wait for an account lock.
    pub lock_timeout: Duration,
    /// Retries after a lock timeout.
    pub max_retries: u32,
    /// Back-off unit between retries.
    pub retry_backoff: Duration,
    /// Whether new positions may be opened.
    pub trading_enabled: bool,
    /// Smallest notional amount per position.
    pub min_trade_amount: Decimal,
    /// Highest leverage allowed.
    pub max_leverage: u32,
    /// Bitcoin deposit address.
    pub btc_deposit_address: Option<String>,
    /// Ethereum deposit address.
    pub eth_deposit_address: Option<String>,
    /// USDT deposit address.
    pub usdt_deposit_address: Option<String>,
}

impl LedgerSettings {
    /// Wallet address customers send `currency` deposits to.
    pub fn deposit_address(&self, currency: Currency) -> Result<&str, LedgerError> {
        let address = match currency {
            Currency::Btc => self.btc_deposit_address.as_deref(),
            Currency::Eth => self.eth_deposit_address.as_deref(),
            Currency::Usdt => self.usdt_deposit_address.as_deref(),
            Currency::Ghs | Currency::Usd => None,
        };
        address
            .filter(|address| !address.trim().is_empty())
            .ok_or(LedgerError::DepositAddressMissing(currency))
    }
}

impl From<&AppConfig> for LedgerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            bin_prefix: config.ledger.bin_prefix.clone(),
            default_currency: config.ledger.default_currency,
            lock_timeout: Duration::from_millis(config.ledger.lock_timeout_ms),
            max_retries: config.ledger.max_retries,
            retry_backoff: Duration::from_millis(config.ledger.retry_backoff_ms),
            trading_enabled: config.trading.enabled,
            min_trade_amount: config.trading.min_trade_amount,
            max_leverage: config.trading.max_leverage,
            btc_deposit_address: config.deposits.btc_address.clone(),
            eth_deposit_address: config.deposits.eth_address.clone(),
            usdt_deposit_address: config.deposits.usdt_address.clone(),
        }
    }
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}
