//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger engine configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Bank-wide trading settings.
    #[serde(default)]
    pub trading: TradingConfig,
    /// Wallet addresses for crypto deposits.
    #[serde(default)]
    pub deposits: DepositConfig,
}

/// Ledger engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Bank identification number prefix for account numbers.
    #[serde(default = "default_bin_prefix")]
    pub bin_prefix: String,
    /// Currency new accounts are opened in.
    #[serde(default)]
    pub default_currency: Currency,
    /// Maximum time to wait for an account lock.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    /// How many times a lock timeout is retried before surfacing.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base back-off between retries, multiplied by the attempt number.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_bin_prefix() -> String {
    "123456".to_string()
}

fn default_lock_timeout_ms() -> u64 {
    500
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    10
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            bin_prefix: default_bin_prefix(),
            default_currency: Currency::default(),
            lock_timeout_ms: default_lock_timeout_ms(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Trading configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Whether new positions may be opened.
    #[serde(default = "default_trading_enabled")]
    pub enabled: bool,
    /// Smallest notional amount accepted for a position.
    #[serde(default = "default_min_trade_amount")]
    pub min_trade_amount: Decimal,
    /// Highest leverage a customer may select.
    #[serde(default = "default_max_leverage")]
    pub max_leverage: u32,
}

fn default_trading_enabled() -> bool {
    true
}

fn default_min_trade_amount() -> Decimal {
    Decimal::TEN
}

fn default_max_leverage() -> u32 {
    100
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            enabled: default_trading_enabled(),
            min_trade_amount: default_min_trade_amount(),
            max_leverage: default_max_leverage(),
        }
    }
}

/// Deposit wallet addresses. A missing address disables deposits in that asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepositConfig {
    /// Bitcoin deposit address.
    pub btc_address: Option<String>,
    /// Ethereum deposit address.
    pub eth_address: Option<String>,
    /// USDT deposit address.
    pub usdt_address: Option<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PRESTIGE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
