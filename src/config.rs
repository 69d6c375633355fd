use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// which path a generic payment intake takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentEntryPolicy {
    /// payments wait for cash-desk confirmation before affecting balances
    CashDeskGate,
    /// payments are trusted at entry and settle immediately
    AutoConfirm,
}

/// engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub entry_policy: PaymentEntryPolicy,
    /// exchange course stamped on debtor flags when none is supplied
    pub default_currency_course: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entry_policy: PaymentEntryPolicy::CashDeskGate,
            default_currency_course: dec!(12500),
        }
    }
}
