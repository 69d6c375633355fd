pub mod lifecycle;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ContractId, CurrencyAmounts, DebtorId, PaymentId};

pub use lifecycle::{
    confirm, confirm_batch, create_direct, create_pending, reject, REJECTION_TAG,
};

/// what a payment is recorded against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTarget {
    /// a contract directly
    Contract(ContractId),
    /// a debtor flag, resolved to its contract
    Debtor(DebtorId),
}

/// incoming payment data from either front door
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub target: PaymentTarget,
    pub amount: Money,
    pub currency: CurrencyAmounts,
    /// exchange course at payment time, recorded only
    pub currency_course: Option<Decimal>,
    pub note: Option<String>,
}

impl PaymentRequest {
    pub fn for_contract(contract_id: ContractId, amount: Money) -> Self {
        Self {
            target: PaymentTarget::Contract(contract_id),
            amount,
            currency: CurrencyAmounts::dollars(amount),
            currency_course: None,
            note: None,
        }
    }

    pub fn for_debtor(debtor_id: DebtorId, amount: Money) -> Self {
        Self {
            target: PaymentTarget::Debtor(debtor_id),
            amount,
            currency: CurrencyAmounts::dollars(amount),
            currency_course: None,
            note: None,
        }
    }

    pub fn with_currency(mut self, currency: CurrencyAmounts) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// result of recording or settling a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub payment_id: PaymentId,
    pub contract_id: ContractId,
}

/// per-item result of a batch confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub payment_id: PaymentId,
    pub outcome: std::result::Result<PaymentReceipt, String>,
}

/// aggregated batch confirmation result; success only without per-item errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub success: bool,
    pub items: Vec<BatchItem>,
}

impl BatchOutcome {
    pub fn confirmed_count(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.items.len() - self.confirmed_count()
    }
}
