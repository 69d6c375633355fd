use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::model::Contract;
use crate::store::LedgerStore;
use crate::types::{
    ContractId, CustomerId, DebtorId, PaymentId, PaymentKind, PaymentStatus,
};

/// derived debt figures for a contract or a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSummary {
    pub total_paid: Money,
    pub remaining_debt: Money,
    pub overdue_days: u32,
}

/// pending payment joined for the cash-desk screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCashRow {
    pub payment_id: PaymentId,
    pub customer_name: String,
    pub manager_name: String,
    pub amount: Money,
    pub expected_amount: Option<Money>,
    pub note_text: String,
    pub date: DateTime<Utc>,
}

/// confirmed payment joined to its recorded contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentHistoryRow {
    pub payment_id: PaymentId,
    pub contract_id: ContractId,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub kind: PaymentKind,
    pub status: PaymentStatus,
    pub customer_name: String,
    pub manager_name: String,
    pub note_text: String,
}

/// per-customer debt rollup across open contracts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDebtRow {
    pub customer_id: CustomerId,
    pub full_name: String,
    pub phone_number: String,
    pub manager_name: String,
    pub active_contracts: usize,
    pub total_price: Money,
    pub total_paid: Money,
    pub remaining_debt: Money,
    pub next_payment_date: Option<DateTime<Utc>>,
}

/// open debtor flag joined for the arrears board, most overdue first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtorBoardRow {
    pub debtor_id: DebtorId,
    pub contract_id: ContractId,
    pub customer_id: CustomerId,
    pub full_name: String,
    pub phone_number: String,
    pub manager_name: String,
    pub debt_amount: Money,
    pub overdue_days: u32,
    pub start_date: DateTime<Utc>,
}

/// initialPayment plus the sum of linked confirmed payments
pub fn contract_total_paid(store: &LedgerStore, contract: &Contract) -> Money {
    let linked_paid: Money = contract
        .payments
        .iter()
        .filter_map(|id| store.payment(*id).ok())
        .filter(|p| p.is_paid)
        .map(|p| p.amount)
        .sum();
    contract.initial_payment + linked_paid
}

/// debt figures for one contract
pub fn contract_debt_summary(
    store: &LedgerStore,
    contract_id: ContractId,
    now: DateTime<Utc>,
) -> Result<DebtSummary> {
    let contract = store.contract(contract_id)?;
    let total_paid = contract_total_paid(store, contract);

    Ok(DebtSummary {
        total_paid,
        remaining_debt: contract.total_price - total_paid,
        overdue_days: contract.overdue_days_at(now),
    })
}

/// debt figures summed over a customer's open contracts
pub fn customer_debt_summary(
    store: &LedgerStore,
    customer_id: CustomerId,
    now: DateTime<Utc>,
) -> Result<DebtSummary> {
    store.customer(customer_id)?;

    let mut total_paid = Money::ZERO;
    let mut total_price = Money::ZERO;
    let mut overdue_days = 0;

    for contract in store.open_contracts_for_customer(customer_id) {
        total_paid += contract_total_paid(store, contract);
        total_price += contract.total_price;
        overdue_days = overdue_days.max(contract.overdue_days_at(now));
    }

    Ok(DebtSummary {
        total_paid,
        remaining_debt: total_price - total_paid,
        overdue_days,
    })
}

/// payments waiting for cash-desk confirmation, newest first
pub fn pending_cash_payments(store: &LedgerStore) -> Vec<PendingCashRow> {
    let mut rows: Vec<PendingCashRow> = store
        .pending_payments()
        .into_iter()
        .map(|p| PendingCashRow {
            payment_id: p.id,
            customer_name: customer_name(store, p.customer_id),
            manager_name: employee_name(store, p.manager_id),
            amount: p.amount,
            expected_amount: p.expected_amount,
            note_text: note_text(store, p.note),
            date: p.date,
        })
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

/// confirmed payments joined to customer, manager and their recorded
/// contract, newest first; optionally narrowed to one customer
pub fn paid_payment_history(
    store: &LedgerStore,
    customer_id: Option<CustomerId>,
) -> Vec<PaymentHistoryRow> {
    let mut rows: Vec<PaymentHistoryRow> = store
        .paid_payments()
        .into_iter()
        .filter(|p| customer_id.map_or(true, |id| p.customer_id == id))
        .map(|p| PaymentHistoryRow {
            payment_id: p.id,
            contract_id: p.contract_id,
            amount: p.amount,
            date: p.date,
            kind: p.kind,
            status: p.status,
            customer_name: customer_name(store, p.customer_id),
            manager_name: employee_name(store, p.manager_id),
            note_text: note_text(store, p.note),
        })
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

/// roll up every customer's open contracts, largest remaining debt first
pub fn customer_debt_report(store: &LedgerStore) -> Vec<CustomerDebtRow> {
    let mut rows: Vec<CustomerDebtRow> = store
        .customers()
        .filter(|c| c.is_active && !c.is_deleted)
        .filter_map(|customer| {
            let contracts: Vec<&Contract> =
                store.open_contracts_for_customer(customer.id).collect();
            if contracts.is_empty() {
                return None;
            }

            let total_price: Money = contracts.iter().map(|c| c.total_price).sum();
            let total_paid: Money = contracts
                .iter()
                .map(|c| contract_total_paid(store, c))
                .sum();

            Some(CustomerDebtRow {
                customer_id: customer.id,
                full_name: customer.full_name(),
                phone_number: customer.phone_number.clone(),
                manager_name: employee_name(store, customer.manager_id),
                active_contracts: contracts.len(),
                total_price,
                total_paid,
                remaining_debt: total_price - total_paid,
                next_payment_date: contracts.iter().map(|c| c.next_payment_date).min(),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.remaining_debt.cmp(&a.remaining_debt));
    rows
}

/// open debtor flags joined for the arrears board, most overdue first
pub fn debtor_board(store: &LedgerStore, now: DateTime<Utc>) -> Vec<DebtorBoardRow> {
    let mut rows: Vec<DebtorBoardRow> = store
        .debtors()
        .filter_map(|flag| {
            let contract = store.contract(flag.contract_id).ok()?;
            let customer = store.customer(contract.customer_id).ok()?;
            Some(DebtorBoardRow {
                debtor_id: flag.id,
                contract_id: contract.id,
                customer_id: customer.id,
                full_name: customer.full_name(),
                phone_number: customer.phone_number.clone(),
                manager_name: employee_name(store, customer.manager_id),
                debt_amount: flag.debt_amount,
                overdue_days: contract.overdue_days_at(now),
                start_date: contract.start_date,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.overdue_days.cmp(&a.overdue_days));
    rows
}

fn customer_name(store: &LedgerStore, id: CustomerId) -> String {
    store
        .customer(id)
        .map(|c| c.full_name())
        .unwrap_or_default()
}

fn employee_name(store: &LedgerStore, id: crate::types::EmployeeId) -> String {
    store
        .employee(id)
        .map(|e| e.full_name())
        .unwrap_or_default()
}

fn note_text(store: &LedgerStore, id: Option<crate::types::NoteId>) -> String {
    id.and_then(|id| store.note(id))
        .map(|n| n.text.clone())
        .unwrap_or_default()
}
