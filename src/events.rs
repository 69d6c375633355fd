use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ContractId, DebtorId, EmployeeId, PaymentId, PaymentStatus};

/// all events emitted by ledger operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ContractOpened {
        contract_id: ContractId,
        total_price: Money,
        initial_payment: Money,
        timestamp: DateTime<Utc>,
    },
    ContractCompleted {
        contract_id: ContractId,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },

    PaymentRecorded {
        payment_id: PaymentId,
        amount: Money,
        status: PaymentStatus,
        timestamp: DateTime<Utc>,
    },
    PaymentConfirmed {
        payment_id: PaymentId,
        contract_id: ContractId,
        amount: Money,
        confirmed_by: EmployeeId,
        timestamp: DateTime<Utc>,
    },
    PaymentRejected {
        payment_id: PaymentId,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    BalanceAdjusted {
        manager_id: EmployeeId,
        dollar_delta: Money,
        sum_delta: Money,
        dollar_total: Money,
        sum_total: Money,
        timestamp: DateTime<Utc>,
    },

    DebtorDeclared {
        debtor_id: DebtorId,
        contract_id: ContractId,
        debt_amount: Money,
        overdue_days: u32,
        timestamp: DateTime<Utc>,
    },
    DebtorsCleared {
        contract_id: ContractId,
        removed: usize,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
