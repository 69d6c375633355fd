use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{LedgerError, Result};
use crate::model::{Balance, Contract, Customer, DebtorFlag, Employee, Note, Payment};
use crate::types::{
    ContractId, ContractStatus, CustomerId, DebtorId, EmployeeId, NoteId, PaymentId,
};

/// in-process document store for all ledger entities
///
/// Every mutating ledger operation runs behind one exclusive borrow of this
/// store, so a multi-entity operation (confirm payment: payment + contract +
/// balance + debtor writes) commits as a unit and find-or-create sequences
/// cannot interleave.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LedgerStore {
    customers: HashMap<CustomerId, Customer>,
    employees: HashMap<EmployeeId, Employee>,
    contracts: HashMap<ContractId, Contract>,
    payments: HashMap<PaymentId, Payment>,
    debtors: HashMap<DebtorId, DebtorFlag>,
    notes: HashMap<NoteId, Note>,
    balances: HashMap<EmployeeId, Balance>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- employees ---

    pub fn insert_employee(&mut self, employee: Employee) -> EmployeeId {
        let id = employee.id;
        self.employees.insert(id, employee);
        id
    }

    pub fn employee(&self, id: EmployeeId) -> Result<&Employee> {
        self.employees
            .get(&id)
            .ok_or(LedgerError::EmployeeNotFound { id })
    }

    // --- customers ---

    pub fn insert_customer(&mut self, customer: Customer) -> CustomerId {
        let id = customer.id;
        self.customers.insert(id, customer);
        id
    }

    pub fn customer(&self, id: CustomerId) -> Result<&Customer> {
        self.customers
            .get(&id)
            .ok_or(LedgerError::CustomerNotFound { id })
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    // --- contracts ---

    pub fn insert_contract(&mut self, contract: Contract) -> ContractId {
        let id = contract.id;
        self.contracts.insert(id, contract);
        id
    }

    pub fn contract(&self, id: ContractId) -> Result<&Contract> {
        self.contracts
            .get(&id)
            .ok_or(LedgerError::ContractNotFound { id })
    }

    pub fn contract_mut(&mut self, id: ContractId) -> Result<&mut Contract> {
        self.contracts
            .get_mut(&id)
            .ok_or(LedgerError::ContractNotFound { id })
    }

    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.values()
    }

    /// the customer's earliest-started contract still collecting
    /// installments; ordered by start date so the result does not depend
    /// on map iteration order
    pub fn active_contract_for_customer(&self, customer_id: CustomerId) -> Option<&Contract> {
        self.contracts
            .values()
            .filter(|c| c.customer_id == customer_id && c.status == ContractStatus::Active)
            .min_by_key(|c| c.start_date)
    }

    /// open contracts of a customer (approved, not deleted, still active)
    pub fn open_contracts_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> impl Iterator<Item = &Contract> {
        self.contracts
            .values()
            .filter(move |c| c.customer_id == customer_id && c.is_open())
    }

    /// contracts eligible for the overdue sweep: approved, not deleted,
    /// not yet declared, active, next installment date elapsed
    pub fn overdue_open_contracts(&self, now: DateTime<Utc>) -> Vec<ContractId> {
        self.contracts
            .values()
            .filter(|c| c.is_open() && !c.is_declare && c.next_payment_date <= now)
            .map(|c| c.id)
            .collect()
    }

    /// subset of the given ids that resolve to stored contracts
    pub fn existing_contract_ids(&self, ids: &[ContractId]) -> Vec<ContractId> {
        ids.iter()
            .filter(|id| self.contracts.contains_key(id))
            .copied()
            .collect()
    }

    // --- payments ---

    pub fn insert_payment(&mut self, payment: Payment) -> PaymentId {
        let id = payment.id;
        self.payments.insert(id, payment);
        id
    }

    pub fn payment(&self, id: PaymentId) -> Result<&Payment> {
        self.payments
            .get(&id)
            .ok_or(LedgerError::PaymentNotFound { id })
    }

    pub fn payment_mut(&mut self, id: PaymentId) -> Result<&mut Payment> {
        self.payments
            .get_mut(&id)
            .ok_or(LedgerError::PaymentNotFound { id })
    }

    pub fn payments(&self) -> impl Iterator<Item = &Payment> {
        self.payments.values()
    }

    /// payments waiting for cash-desk confirmation
    pub fn pending_payments(&self) -> Vec<&Payment> {
        self.payments.values().filter(|p| !p.is_settled()).collect()
    }

    /// confirmed payments
    pub fn paid_payments(&self) -> Vec<&Payment> {
        self.payments.values().filter(|p| p.is_paid).collect()
    }

    // --- debtor flags ---

    pub fn insert_debtor(&mut self, debtor: DebtorFlag) -> DebtorId {
        let id = debtor.id;
        self.debtors.insert(id, debtor);
        id
    }

    pub fn debtor(&self, id: DebtorId) -> Result<&DebtorFlag> {
        self.debtors
            .get(&id)
            .ok_or(LedgerError::DebtorNotFound { id })
    }

    pub fn debtors(&self) -> impl Iterator<Item = &DebtorFlag> {
        self.debtors.values()
    }

    /// existence check that keeps at most one flag per contract
    pub fn has_debtor_for(&self, contract_id: ContractId) -> bool {
        self.debtors.values().any(|d| d.contract_id == contract_id)
    }

    /// drop every flag raised against a contract, returning how many
    pub fn remove_debtors_for(&mut self, contract_id: ContractId) -> usize {
        let before = self.debtors.len();
        self.debtors.retain(|_, d| d.contract_id != contract_id);
        before - self.debtors.len()
    }

    // --- notes ---

    pub fn insert_note(&mut self, note: Note) -> NoteId {
        let id = note.id;
        self.notes.insert(id, note);
        id
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    pub fn note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.get_mut(&id)
    }

    // --- balances ---

    pub fn balance(&self, manager_id: EmployeeId) -> Option<&Balance> {
        self.balances.get(&manager_id)
    }

    /// find-or-create, lazily on first adjustment
    pub fn balance_or_create(&mut self, manager_id: EmployeeId) -> &mut Balance {
        self.balances
            .entry(manager_id)
            .or_insert_with(|| Balance::new(manager_id))
    }

    // --- snapshots ---

    /// serialize the whole store to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LedgerError::Storage {
            message: e.to_string(),
        })
    }

    /// restore a store from a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LedgerError::Storage {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::types::Role;
    use chrono::Duration;
    use uuid::Uuid;

    fn sample_contract(store: &mut LedgerStore, next_payment_date: DateTime<Utc>) -> ContractId {
        let manager = Employee::new("Aziz", "Karimov", Role::Manager);
        let manager_id = store.insert_employee(manager);
        let customer = Customer::new("Olim", "Toshmatov", "+998901234567", manager_id);
        let customer_id = store.insert_customer(customer);

        store.insert_contract(Contract {
            id: Uuid::new_v4(),
            customer_id,
            created_by: manager_id,
            product_name: "Televizor".to_string(),
            total_price: Money::from_major(1_000),
            initial_payment: Money::from_major(200),
            monthly_payment: Money::from_major(100),
            period_months: 8,
            start_date: next_payment_date - Duration::days(30),
            next_payment_date,
            status: ContractStatus::Active,
            is_active: true,
            is_deleted: false,
            is_declare: false,
            payments: Vec::new(),
        })
    }

    #[test]
    fn test_missing_lookups_are_not_found() {
        let store = LedgerStore::new();
        let id = Uuid::new_v4();

        assert!(matches!(
            store.contract(id),
            Err(LedgerError::ContractNotFound { .. })
        ));
        assert!(matches!(
            store.payment(id),
            Err(LedgerError::PaymentNotFound { .. })
        ));
        assert!(matches!(
            store.employee(id),
            Err(LedgerError::EmployeeNotFound { .. })
        ));
    }

    #[test]
    fn test_overdue_scan_filters_declared_and_future() {
        let mut store = LedgerStore::new();
        let now = Utc::now();

        let overdue = sample_contract(&mut store, now - Duration::days(10));
        let future = sample_contract(&mut store, now + Duration::days(10));
        let declared = sample_contract(&mut store, now - Duration::days(10));
        store.contract_mut(declared).unwrap().is_declare = true;

        let eligible = store.overdue_open_contracts(now);
        assert_eq!(eligible, vec![overdue]);
        assert!(!eligible.contains(&future));
    }

    #[test]
    fn test_active_contract_lookup_is_ordered_by_start_date() {
        let mut store = LedgerStore::new();
        let now = Utc::now();
        let first = sample_contract(&mut store, now + Duration::days(30));
        let customer_id = store.contract(first).unwrap().customer_id;

        let mut later = store.contract(first).unwrap().clone();
        later.id = Uuid::new_v4();
        later.customer_id = customer_id;
        later.start_date = now + Duration::days(10);
        let later = store.insert_contract(later);

        store.contract_mut(first).unwrap().start_date = now - Duration::days(10);
        assert_eq!(
            store.active_contract_for_customer(customer_id).unwrap().id,
            first
        );

        store.contract_mut(first).unwrap().status = ContractStatus::Completed;
        assert_eq!(
            store.active_contract_for_customer(customer_id).unwrap().id,
            later
        );
    }

    #[test]
    fn test_remove_debtors_for_contract() {
        let mut store = LedgerStore::new();
        let now = Utc::now();
        let contract_id = sample_contract(&mut store, now - Duration::days(3));
        let other_id = sample_contract(&mut store, now - Duration::days(3));

        let contract = store.contract(contract_id).unwrap().clone();
        let other = store.contract(other_id).unwrap().clone();
        store.insert_debtor(DebtorFlag::raise(&contract, None, 12_500.into(), now));
        store.insert_debtor(DebtorFlag::raise(&other, None, 12_500.into(), now));

        assert!(store.has_debtor_for(contract_id));
        assert_eq!(store.remove_debtors_for(contract_id), 1);
        assert!(!store.has_debtor_for(contract_id));
        assert!(store.has_debtor_for(other_id));
    }

    #[test]
    fn test_balance_created_lazily() {
        let mut store = LedgerStore::new();
        let manager_id = Uuid::new_v4();

        assert!(store.balance(manager_id).is_none());
        store.balance_or_create(manager_id).dollar += Money::from_major(300);
        assert_eq!(
            store.balance(manager_id).unwrap().dollar,
            Money::from_major(300)
        );
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let mut store = LedgerStore::new();
        let now = Utc::now();
        let contract_id = sample_contract(&mut store, now + Duration::days(30));

        let json = store.to_json().unwrap();
        let restored = LedgerStore::from_json(&json).unwrap();

        assert_eq!(
            restored.contract(contract_id).unwrap().total_price,
            Money::from_major(1_000)
        );
    }
}
