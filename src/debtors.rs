use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use tracing::info;

use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::model::DebtorFlag;
use crate::store::LedgerStore;
use crate::types::{Actor, ContractId};

/// debt declaration engine: raises debtor flags for overdue contracts
///
/// At most one flag exists per contract; the existence check runs inside
/// the same store borrow as the insert, so no duplicate can slip in.
pub struct DebtDeclaration {
    currency_course: Decimal,
}

impl DebtDeclaration {
    pub fn new(currency_course: Decimal) -> Self {
        Self { currency_course }
    }

    /// manually declare the given contracts as debtors
    ///
    /// Marks each resolved contract declared and raises a flag where none
    /// exists yet. Fails when not a single id resolves to a contract.
    /// Returns the number of flags created.
    pub fn declare(
        &self,
        store: &mut LedgerStore,
        contract_ids: &[ContractId],
        actor: &Actor,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<usize> {
        let existing = store.existing_contract_ids(contract_ids);
        if existing.is_empty() {
            return Err(LedgerError::NothingToDeclare);
        }

        let now = time_provider.now();
        let mut created = 0;

        for contract_id in existing {
            store.contract_mut(contract_id)?.is_declare = true;

            if !store.has_debtor_for(contract_id) {
                let contract = store.contract(contract_id)?;
                let flag = DebtorFlag::raise(contract, Some(actor.id), self.currency_course, now);
                let overdue_days = flag.overdue_days;
                let debt_amount = flag.debt_amount;
                let debtor_id = store.insert_debtor(flag);

                events.emit(Event::DebtorDeclared {
                    debtor_id,
                    contract_id,
                    debt_amount,
                    overdue_days,
                    timestamp: now,
                });
                created += 1;
            }
        }

        info!(created, "debtors declared");
        Ok(created)
    }

    /// scheduled sweep over contracts whose next installment date elapsed
    ///
    /// Intended to run on a recurring timer. Repeated runs create nothing
    /// new because of the per-contract existence check. Returns the number
    /// of flags created.
    pub fn sweep_overdue(
        &self,
        store: &mut LedgerStore,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<usize> {
        let now = time_provider.now();
        let mut created = 0;

        for contract_id in store.overdue_open_contracts(now) {
            if store.has_debtor_for(contract_id) {
                continue;
            }

            let contract = store.contract(contract_id)?;
            let created_by = contract.created_by;
            let flag = DebtorFlag::raise(contract, Some(created_by), self.currency_course, now);
            let overdue_days = flag.overdue_days;
            let debt_amount = flag.debt_amount;
            let debtor_id = store.insert_debtor(flag);

            events.emit(Event::DebtorDeclared {
                debtor_id,
                contract_id,
                debt_amount,
                overdue_days,
                timestamp: now,
            });
            created += 1;
        }

        info!(created, "overdue sweep finished");
        Ok(created)
    }
}
