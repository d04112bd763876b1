//! Typed settlement requests.
//!
//! Each request carries the acting customer and is checked field by field
//! with `garde` before the coordinator locks anything.

use garde::Validate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prestige_shared::types::{AccountId, Currency, PackageId, UserId};

use crate::trading::TradeSide;

use super::validation;

/// Move money between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransferRequest {
    /// Customer initiating the transfer; must own `from_account`.
    #[garde(skip)]
    pub user_id: UserId,
    /// Debited account.
    #[garde(skip)]
    pub from_account: AccountId,
    /// Credited account.
    #[garde(skip)]
    pub to_account: AccountId,
    /// Amount to move.
    #[garde(custom(validation::amount))]
    pub amount: Decimal,
    /// Optional note.
    #[garde(custom(validation::description))]
    pub description: Option<String>,
}

/// Fund an account through the payment gateway or a crypto wallet.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DepositRequest {
    /// Customer making the deposit.
    #[garde(skip)]
    pub user_id: UserId,
    /// Account credited once the deposit is confirmed.
    #[garde(skip)]
    pub account_id: AccountId,
    /// Amount expected, in the precision of `currency`.
    #[garde(custom(validation::amount_in(self.currency)))]
    pub amount: Decimal,
    /// Currency or crypto asset paid in.
    #[garde(skip)]
    pub currency: Currency,
}

/// Pay money out to an external bank account or wallet.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WithdrawalRequest {
    /// Customer withdrawing.
    #[garde(skip)]
    pub user_id: UserId,
    /// Debited account.
    #[garde(skip)]
    pub account_id: AccountId,
    /// Amount to pay out.
    #[garde(custom(validation::amount))]
    pub amount: Decimal,
    /// Where the money goes (bank account or wallet).
    #[garde(custom(validation::not_blank), length(max = 64))]
    pub destination: String,
    /// Optional note.
    #[garde(custom(validation::description))]
    pub description: Option<String>,
}

/// Pay a utility or merchant bill.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BillPaymentRequest {
    /// Customer paying.
    #[garde(skip)]
    pub user_id: UserId,
    /// Debited account.
    #[garde(skip)]
    pub account_id: AccountId,
    /// Biller code, e.g. `ECG`.
    #[garde(custom(validation::not_blank), length(max = 32))]
    pub biller: String,
    /// The customer's reference with the biller (meter or policy number).
    #[garde(custom(validation::not_blank), length(max = 64))]
    pub customer_reference: String,
    /// Amount to pay.
    #[garde(custom(validation::amount))]
    pub amount: Decimal,
    /// Optional note.
    #[garde(custom(validation::description))]
    pub description: Option<String>,
}

/// Mobile money operators payouts can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MobileNetwork {
    /// MTN Mobile Money.
    Mtn,
    /// Vodafone Cash.
    Vodafone,
    /// AirtelTigo Money.
    #[serde(rename = "AIRTELTIGO")]
    AirtelTigo,
}

impl std::fmt::Display for MobileNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mtn => write!(f, "MTN"),
            Self::Vodafone => write!(f, "VODAFONE"),
            Self::AirtelTigo => write!(f, "AIRTELTIGO"),
        }
    }
}

/// Send money to a mobile wallet.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MobileMoneyRequest {
    /// Customer sending.
    #[garde(skip)]
    pub user_id: UserId,
    /// Debited account.
    #[garde(skip)]
    pub from_account: AccountId,
    /// Receiving wallet number, e.g. `0244123456`.
    #[garde(custom(validation::mobile_number))]
    pub mobile_number: String,
    /// Receiving operator.
    #[garde(skip)]
    pub network: MobileNetwork,
    /// Amount to send.
    #[garde(custom(validation::amount))]
    pub amount: Decimal,
    /// Optional note.
    #[garde(custom(validation::description))]
    pub description: Option<String>,
}

/// Open a leveraged position.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpenTradeRequest {
    /// Customer trading.
    #[garde(skip)]
    pub user_id: UserId,
    /// Account the margin is taken from.
    #[garde(skip)]
    pub account_id: AccountId,
    /// Market symbol, e.g. `BTCUSDT`.
    #[garde(custom(validation::symbol))]
    pub symbol: String,
    /// Buy or sell.
    #[garde(skip)]
    pub side: TradeSide,
    /// Notional amount.
    #[garde(custom(validation::amount))]
    pub amount: Decimal,
    /// Leverage multiplier.
    #[garde(range(min = 1))]
    pub leverage: u32,
    /// Optional take-profit level.
    #[garde(custom(validation::optional_price))]
    pub take_profit: Option<Decimal>,
    /// Optional stop-loss level.
    #[garde(custom(validation::optional_price))]
    pub stop_loss: Option<Decimal>,
}

/// Fund an investment package.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvestmentRequest {
    /// Customer investing.
    #[garde(skip)]
    pub user_id: UserId,
    /// Debited account.
    #[garde(skip)]
    pub account_id: AccountId,
    /// Package to invest in.
    #[garde(skip)]
    pub package_id: PackageId,
    /// Amount to commit.
    #[garde(custom(validation::amount))]
    pub amount: Decimal,
}
