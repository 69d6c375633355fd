//! Installment-sales ("nasiya") payment lifecycle and debt ledger.
//!
//! The engine tracks installment contracts, runs recorded payments through
//! a two-phase cash-desk flow (pending, then confirmed or rejected),
//! maintains per-manager cash balances, declares and clears overdue debtor
//! flags, and derives debt reports from the linked payment history.
//!
//! ```
//! use nasiya_ledger::{
//!     Actor, Customer, Employee, InstallmentLedger, Money, NewContract, PaymentRequest, Role,
//!     SafeTimeProvider, TimeSource,
//! };
//! use nasiya_ledger::chrono::{Duration, Utc};
//!
//! let time = SafeTimeProvider::new(TimeSource::Test(Utc::now()));
//! let mut ledger = InstallmentLedger::new();
//!
//! let manager_id = ledger.register_employee(Employee::new("Aziz", "Karimov", Role::Manager));
//! let manager = Actor::new(manager_id, "Aziz Karimov", Role::Manager);
//! let customer_id =
//!     ledger.register_customer(Customer::new("Olim", "Toshmatov", "+998901234567", manager_id));
//!
//! let contract_id = ledger
//!     .open_contract(
//!         NewContract {
//!             customer_id,
//!             product_name: "iPhone 15".to_string(),
//!             total_price: Money::from_major(1_000),
//!             initial_payment: Money::from_major(200),
//!             monthly_payment: Money::from_major(100),
//!             period_months: 8,
//!             start_date: time.now(),
//!             next_payment_date: time.now() + Duration::days(30),
//!         },
//!         &manager,
//!         &time,
//!     )
//!     .unwrap();
//!
//! let receipt = ledger
//!     .receive_payment(
//!         &PaymentRequest::for_contract(contract_id, Money::from_major(100)),
//!         &manager,
//!         &time,
//!     )
//!     .unwrap();
//! ledger.confirm_payment(receipt.payment_id, &manager, &time).unwrap();
//!
//! let summary = ledger.contract_debt_summary(contract_id, &time).unwrap();
//! assert_eq!(summary.total_paid, Money::from_major(300));
//! ```

pub mod balance;
pub mod config;
pub mod debtors;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod events;
pub mod model;
pub mod payments;
pub mod reporting;
pub mod store;
pub mod types;

pub use config::{EngineConfig, PaymentEntryPolicy};
pub use debtors::DebtDeclaration;
pub use decimal::Money;
pub use engine::{InstallmentLedger, NewContract};
pub use errors::{ErrorKind, LedgerError, Result};
pub use events::{Event, EventStore};
pub use model::{Balance, Contract, Customer, DebtorFlag, Employee, Note, Payment};
pub use payments::{
    BatchItem, BatchOutcome, PaymentReceipt, PaymentRequest, PaymentTarget, REJECTION_TAG,
};
pub use reporting::{
    CustomerDebtRow, DebtSummary, DebtorBoardRow, PaymentHistoryRow, PendingCashRow,
};
pub use store::LedgerStore;
pub use types::{
    Actor, ContractId, ContractStatus, CurrencyAmounts, CustomerId, DebtorId, EmployeeId, NoteId,
    PaymentId, PaymentKind, PaymentStatus, Role,
};

// commonly paired externals, re-exported for downstream convenience
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
