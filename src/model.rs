use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{
    ContractId, ContractStatus, CurrencyAmounts, CustomerId, DebtorId, EmployeeId, NoteId,
    PaymentId, PaymentKind, PaymentStatus, Role,
};

/// employee record (manager, cashier, seller)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl Employee {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// customer record, owned by a manager; soft-deletable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub manager_id: EmployeeId,
    pub is_active: bool,
    pub is_deleted: bool,
}

impl Customer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: impl Into<String>,
        manager_id: EmployeeId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: phone_number.into(),
            manager_id,
            is_active: true,
            is_deleted: false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// installment sale agreement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub customer_id: CustomerId,
    pub created_by: EmployeeId,
    pub product_name: String,
    pub total_price: Money,
    pub initial_payment: Money,
    pub monthly_payment: Money,
    pub period_months: u32,
    pub start_date: DateTime<Utc>,
    pub next_payment_date: DateTime<Utc>,
    pub status: ContractStatus,
    /// approved (as opposed to pending approval)
    pub is_active: bool,
    pub is_deleted: bool,
    /// an overdue declaration has been raised for this contract
    pub is_declare: bool,
    /// ordered list of linked payment ids; a payment is linked exactly once
    pub payments: Vec<PaymentId>,
}

impl Contract {
    /// open for collection: approved, not soft-deleted, installments pending
    pub fn is_open(&self) -> bool {
        self.is_active && !self.is_deleted && self.status == ContractStatus::Active
    }

    /// whole days past the next installment due date, zero if not yet due
    pub fn overdue_days_at(&self, now: DateTime<Utc>) -> u32 {
        if self.next_payment_date < now {
            (now - self.next_payment_date).num_days().max(0) as u32
        } else {
            0
        }
    }

    /// append a payment id; linking is idempotent per payment
    pub fn link_payment(&mut self, payment_id: PaymentId) {
        if !self.payments.contains(&payment_id) {
            self.payments.push(payment_id);
        }
    }
}

/// one recorded money movement against a contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    /// contract the payment was recorded against
    pub contract_id: ContractId,
    pub amount: Money,
    pub date: DateTime<Utc>,
    /// convenience flag mirroring `status == Paid`
    pub is_paid: bool,
    pub status: PaymentStatus,
    pub kind: PaymentKind,
    /// scheduled monthly amount at the time a pending payment was taken
    pub expected_amount: Option<Money>,
    pub customer_id: CustomerId,
    pub manager_id: EmployeeId,
    pub note: Option<NoteId>,
    pub currency: CurrencyAmounts,
    /// exchange course recorded at payment time; not used for conversion
    pub currency_course: Option<Decimal>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by: Option<EmployeeId>,
}

impl Payment {
    /// payment awaiting cash-desk confirmation
    #[allow(clippy::too_many_arguments)]
    pub fn new_pending(
        contract_id: ContractId,
        amount: Money,
        date: DateTime<Utc>,
        customer_id: CustomerId,
        manager_id: EmployeeId,
        note: Option<NoteId>,
        currency: CurrencyAmounts,
        currency_course: Option<Decimal>,
        expected_amount: Money,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            contract_id,
            amount,
            date,
            is_paid: false,
            status: PaymentStatus::Pending,
            kind: PaymentKind::Monthly,
            expected_amount: Some(expected_amount),
            customer_id,
            manager_id,
            note,
            currency,
            currency_course,
            confirmed_at: None,
            confirmed_by: None,
        }
    }

    /// payment trusted at entry and settled immediately
    #[allow(clippy::too_many_arguments)]
    pub fn new_paid(
        contract_id: ContractId,
        amount: Money,
        date: DateTime<Utc>,
        customer_id: CustomerId,
        manager_id: EmployeeId,
        note: Option<NoteId>,
        currency: CurrencyAmounts,
        currency_course: Option<Decimal>,
        confirmed_by: EmployeeId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            contract_id,
            amount,
            date,
            is_paid: true,
            status: PaymentStatus::Paid,
            kind: PaymentKind::Monthly,
            expected_amount: None,
            customer_id,
            manager_id,
            note,
            currency,
            currency_course,
            confirmed_at: Some(date),
            confirmed_by: Some(confirmed_by),
        }
    }

    /// settled payments are immutable; no further transition is legal
    pub fn is_settled(&self) -> bool {
        matches!(self.status, PaymentStatus::Paid | PaymentStatus::Rejected)
    }
}

/// transient marker that a contract is currently in arrears
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtorFlag {
    pub id: DebtorId,
    pub contract_id: ContractId,
    pub debt_amount: Money,
    pub created_by: Option<EmployeeId>,
    pub due_date: DateTime<Utc>,
    pub overdue_days: u32,
    pub currency_course: Decimal,
    pub created_at: DateTime<Utc>,
}

impl DebtorFlag {
    pub fn raise(
        contract: &Contract,
        created_by: Option<EmployeeId>,
        currency_course: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            contract_id: contract.id,
            debt_amount: contract.monthly_payment,
            created_by,
            due_date: contract.next_payment_date,
            overdue_days: contract.overdue_days_at(now),
            currency_course,
            created_at: now,
        }
    }
}

/// per-manager running cash balance, mutated only by confirmed payments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub manager_id: EmployeeId,
    pub dollar: Money,
    pub sum: Money,
}

impl Balance {
    pub fn new(manager_id: EmployeeId) -> Self {
        Self {
            manager_id,
            dollar: Money::ZERO,
            sum: Money::ZERO,
        }
    }

    /// apply a delta; negative values reverse a prior adjustment
    pub fn apply(&mut self, delta: CurrencyAmounts) {
        self.dollar += delta.dollar;
        self.sum += delta.sum;
    }
}

/// free-text annotation; append-only in practice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    pub customer_id: CustomerId,
    pub created_by: EmployeeId,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(
        text: impl Into<String>,
        customer_id: CustomerId,
        created_by: EmployeeId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            customer_id,
            created_by,
            created_at,
        }
    }

    /// append a line to the note text
    pub fn append_line(&mut self, line: &str) {
        self.text.push('\n');
        self.text.push_str(line);
    }
}
