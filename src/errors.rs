use thiserror::Error;

use crate::decimal::Money;
use crate::types::{ContractId, CustomerId, DebtorId, EmployeeId, PaymentId, PaymentStatus};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("contract not found: {id}")]
    ContractNotFound { id: ContractId },

    #[error("payment not found: {id}")]
    PaymentNotFound { id: PaymentId },

    #[error("employee not found: {id}")]
    EmployeeNotFound { id: EmployeeId },

    #[error("customer not found: {id}")]
    CustomerNotFound { id: CustomerId },

    #[error("debtor flag not found: {id}")]
    DebtorNotFound { id: DebtorId },

    #[error("no active contract for customer: {customer_id}")]
    NoActiveContract { customer_id: CustomerId },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount { amount: Money },

    #[error("payment already settled: {id} is {status:?}")]
    PaymentAlreadySettled {
        id: PaymentId,
        status: PaymentStatus,
    },

    #[error("rejection reason must not be empty")]
    EmptyRejectionReason,

    #[error("none of the given contract ids resolve to a contract")]
    NothingToDeclare,

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("storage error: {message}")]
    Storage { message: String },
}

/// coarse classification for boundary layers that map errors to
/// transport status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Forbidden,
    Internal,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::ContractNotFound { .. }
            | LedgerError::PaymentNotFound { .. }
            | LedgerError::EmployeeNotFound { .. }
            | LedgerError::CustomerNotFound { .. }
            | LedgerError::DebtorNotFound { .. }
            | LedgerError::NoActiveContract { .. } => ErrorKind::NotFound,
            LedgerError::InvalidPaymentAmount { .. }
            | LedgerError::PaymentAlreadySettled { .. }
            | LedgerError::EmptyRejectionReason
            | LedgerError::NothingToDeclare => ErrorKind::BadRequest,
            LedgerError::Forbidden { .. } => ErrorKind::Forbidden,
            LedgerError::Storage { .. } => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
