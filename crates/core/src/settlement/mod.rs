//! Settlement: validate, lock, mutate and settle money movements.
//!
//! - `coordinator` - Orchestrates every transaction kind
//! - `requests` - Typed requests with field rules
//! - `validation` - Field-level validation errors and shared rules
//! - `settings` - Bank-wide settings injected at construction
//! - `audit` - Audit trail sinks

pub mod audit;
pub mod coordinator;
pub mod requests;
pub mod settings;
pub mod validation;

#[cfg(test)]
mod coordinator_props;

pub use audit::{
    AuditAction, AuditError, AuditEvent, AuditOutcome, AuditSink, MemoryAuditSink,
    TracingAuditSink,
};
pub use coordinator::SettlementCoordinator;
pub use requests::{
    BillPaymentRequest, DepositRequest, InvestmentRequest, MobileMoneyRequest, MobileNetwork,
    OpenTradeRequest, TransferRequest, WithdrawalRequest,
};
pub use settings::LedgerSettings;
pub use validation::{FieldError, ValidationErrors};
