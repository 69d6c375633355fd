use chrono::{DateTime, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::balance;
use crate::config::{EngineConfig, PaymentEntryPolicy};
use crate::debtors::DebtDeclaration;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::model::{Balance, Contract, Customer, Employee};
use crate::payments::{self, BatchOutcome, PaymentReceipt, PaymentRequest};
use crate::reporting::{
    self, CustomerDebtRow, DebtSummary, DebtorBoardRow, PaymentHistoryRow, PendingCashRow,
};
use crate::store::LedgerStore;
use crate::types::{Actor, ContractId, CurrencyAmounts, CustomerId, EmployeeId, PaymentId};

/// intake data for a new installment sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContract {
    pub customer_id: CustomerId,
    pub product_name: String,
    pub total_price: Money,
    pub initial_payment: Money,
    pub monthly_payment: Money,
    pub period_months: u32,
    pub start_date: DateTime<Utc>,
    pub next_payment_date: DateTime<Utc>,
}

/// facade over the installment-sales ledger
///
/// Owns the document store, configuration and event stream, and exposes
/// the payment lifecycle, debt declaration, balance and reporting
/// operations. Every mutating method runs its writes inside the single
/// store borrow, so a logical operation commits as a unit.
pub struct InstallmentLedger {
    store: LedgerStore,
    config: EngineConfig,
    events: EventStore,
}

impl Default for InstallmentLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallmentLedger {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: LedgerStore::new(),
            config,
            events: EventStore::new(),
        }
    }

    /// read access to the underlying store
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    // --- intake ---

    pub fn register_employee(&mut self, employee: Employee) -> EmployeeId {
        self.store.insert_employee(employee)
    }

    pub fn register_customer(&mut self, customer: Customer) -> CustomerId {
        self.store.insert_customer(customer)
    }

    /// open a new contract for an existing customer
    pub fn open_contract(
        &mut self,
        new_contract: NewContract,
        actor: &Actor,
        time_provider: &SafeTimeProvider,
    ) -> Result<ContractId> {
        let customer = self.store.customer(new_contract.customer_id)?;
        if !customer.is_active || customer.is_deleted {
            return Err(LedgerError::Forbidden {
                message: format!("customer {} is not active", customer.id),
            });
        }
        self.store.employee(actor.id)?;

        let contract = Contract {
            id: Uuid::new_v4(),
            customer_id: new_contract.customer_id,
            created_by: actor.id,
            product_name: new_contract.product_name,
            total_price: new_contract.total_price,
            initial_payment: new_contract.initial_payment,
            monthly_payment: new_contract.monthly_payment,
            period_months: new_contract.period_months,
            start_date: new_contract.start_date,
            next_payment_date: new_contract.next_payment_date,
            status: crate::types::ContractStatus::Active,
            is_active: true,
            is_deleted: false,
            is_declare: false,
            payments: Vec::new(),
        };
        let contract_id = self.store.insert_contract(contract);

        self.events.emit(Event::ContractOpened {
            contract_id,
            total_price: new_contract.total_price,
            initial_payment: new_contract.initial_payment,
            timestamp: time_provider.now(),
        });
        info!(%contract_id, total_price = %new_contract.total_price, "contract opened");

        Ok(contract_id)
    }

    // --- payment lifecycle ---

    /// generic payment front door; the configured entry policy selects
    /// the pending or the direct path
    pub fn receive_payment(
        &mut self,
        request: &PaymentRequest,
        actor: &Actor,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        match self.config.entry_policy {
            PaymentEntryPolicy::CashDeskGate => {
                self.create_pending_payment(request, actor, time_provider)
            }
            PaymentEntryPolicy::AutoConfirm => {
                self.create_direct_payment(request, actor, time_provider)
            }
        }
    }

    pub fn receive_payment_now(
        &mut self,
        request: &PaymentRequest,
        actor: &Actor,
    ) -> Result<PaymentReceipt> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.receive_payment(request, actor, &time)
    }

    pub fn create_pending_payment(
        &mut self,
        request: &PaymentRequest,
        actor: &Actor,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        payments::create_pending(&mut self.store, request, actor, time_provider, &mut self.events)
    }

    pub fn create_direct_payment(
        &mut self,
        request: &PaymentRequest,
        actor: &Actor,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        payments::create_direct(&mut self.store, request, actor, time_provider, &mut self.events)
    }

    pub fn confirm_payment(
        &mut self,
        payment_id: PaymentId,
        actor: &Actor,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        payments::confirm(
            &mut self.store,
            payment_id,
            actor,
            time_provider,
            &mut self.events,
        )
    }

    pub fn reject_payment(
        &mut self,
        payment_id: PaymentId,
        reason: &str,
        actor: &Actor,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentId> {
        payments::reject(
            &mut self.store,
            payment_id,
            reason,
            actor,
            time_provider,
            &mut self.events,
        )
    }

    pub fn confirm_payments(
        &mut self,
        payment_ids: &[PaymentId],
        actor: &Actor,
        time_provider: &SafeTimeProvider,
    ) -> BatchOutcome {
        payments::confirm_batch(
            &mut self.store,
            payment_ids,
            actor,
            time_provider,
            &mut self.events,
        )
    }

    // --- debt declaration ---

    pub fn declare_debtors(
        &mut self,
        contract_ids: &[ContractId],
        actor: &Actor,
        time_provider: &SafeTimeProvider,
    ) -> Result<usize> {
        DebtDeclaration::new(self.config.default_currency_course).declare(
            &mut self.store,
            contract_ids,
            actor,
            time_provider,
            &mut self.events,
        )
    }

    pub fn sweep_overdue_debtors(&mut self, time_provider: &SafeTimeProvider) -> Result<usize> {
        DebtDeclaration::new(self.config.default_currency_course).sweep_overdue(
            &mut self.store,
            time_provider,
            &mut self.events,
        )
    }

    pub fn sweep_overdue_debtors_now(&mut self) -> Result<usize> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.sweep_overdue_debtors(&time)
    }

    // --- balances ---

    pub fn adjust_balance(
        &mut self,
        manager_id: EmployeeId,
        delta: CurrencyAmounts,
        time_provider: &SafeTimeProvider,
    ) -> Balance {
        balance::adjust(
            &mut self.store,
            manager_id,
            delta,
            &mut self.events,
            time_provider.now(),
        )
    }

    pub fn balance(&self, manager_id: EmployeeId) -> Option<&Balance> {
        self.store.balance(manager_id)
    }

    // --- reporting ---

    pub fn contract_debt_summary(
        &self,
        contract_id: ContractId,
        time_provider: &SafeTimeProvider,
    ) -> Result<DebtSummary> {
        reporting::contract_debt_summary(&self.store, contract_id, time_provider.now())
    }

    pub fn customer_debt_summary(
        &self,
        customer_id: CustomerId,
        time_provider: &SafeTimeProvider,
    ) -> Result<DebtSummary> {
        reporting::customer_debt_summary(&self.store, customer_id, time_provider.now())
    }

    pub fn pending_cash_payments(&self) -> Vec<PendingCashRow> {
        reporting::pending_cash_payments(&self.store)
    }

    pub fn paid_payment_history(&self, customer_id: Option<CustomerId>) -> Vec<PaymentHistoryRow> {
        reporting::paid_payment_history(&self.store, customer_id)
    }

    pub fn customer_debt_report(&self) -> Vec<CustomerDebtRow> {
        reporting::customer_debt_report(&self.store)
    }

    pub fn debtor_board(&self, time_provider: &SafeTimeProvider) -> Vec<DebtorBoardRow> {
        reporting::debtor_board(&self.store, time_provider.now())
    }

    // --- snapshots ---

    /// serialize the config and the whole store to JSON
    pub fn export_json(&self) -> Result<String> {
        let snapshot = LedgerSnapshotRef {
            config: &self.config,
            store: &self.store,
        };
        serde_json::to_string_pretty(&snapshot).map_err(|e| LedgerError::Storage {
            message: e.to_string(),
        })
    }

    /// restore a ledger, config included, from an exported snapshot
    pub fn import_json(json: &str) -> Result<Self> {
        let snapshot: LedgerSnapshot =
            serde_json::from_str(json).map_err(|e| LedgerError::Storage {
                message: e.to_string(),
            })?;
        Ok(Self {
            store: snapshot.store,
            config: snapshot.config,
            events: EventStore::new(),
        })
    }
}

/// persistent surface of a ledger: configuration plus state
#[derive(Serialize)]
struct LedgerSnapshotRef<'a> {
    config: &'a EngineConfig,
    store: &'a LedgerStore,
}

#[derive(Deserialize)]
struct LedgerSnapshot {
    config: EngineConfig,
    store: LedgerStore,
}
