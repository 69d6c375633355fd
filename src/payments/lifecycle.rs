use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, info, warn};

use crate::balance;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::model::{Note, Payment};
use crate::store::LedgerStore;
use crate::types::{
    Actor, ContractId, ContractStatus, CurrencyAmounts, NoteId, PaymentId, PaymentStatus,
};

use super::{BatchItem, BatchOutcome, PaymentReceipt, PaymentRequest, PaymentTarget};

/// marker appended to a payment's note when the cash desk refuses it
pub const REJECTION_TAG: &str = "RAD ETILDI";

/// record a payment that must be vetted by the cash desk
///
/// Creates the note and a `Pending` payment carrying the contract's
/// scheduled monthly amount as `expected_amount`. Balance, contract link
/// and debtor cleanup are deferred to confirmation.
pub fn create_pending(
    store: &mut LedgerStore,
    request: &PaymentRequest,
    actor: &Actor,
    time_provider: &SafeTimeProvider,
    events: &mut EventStore,
) -> Result<PaymentReceipt> {
    validate_amount(request.amount)?;
    let contract_id = resolve_target(store, request.target)?;
    store.employee(actor.id)?;

    let now = time_provider.now();
    let contract = store.contract(contract_id)?;
    let customer_id = contract.customer_id;
    let expected_amount = contract.monthly_payment;

    let note_id = create_note(store, request, customer_id, actor, now);
    let payment = Payment::new_pending(
        contract_id,
        request.amount,
        now,
        customer_id,
        actor.id,
        Some(note_id),
        request.currency,
        request.currency_course,
        expected_amount,
    );
    let payment_id = store.insert_payment(payment);

    events.emit(Event::PaymentRecorded {
        payment_id,
        amount: request.amount,
        status: PaymentStatus::Pending,
        timestamp: now,
    });
    debug!(%payment_id, %contract_id, amount = %request.amount, "payment recorded, awaiting cash desk");

    Ok(PaymentReceipt {
        payment_id,
        contract_id,
    })
}

/// record a payment that is trusted at entry
///
/// Creates the note and a `Paid` payment, links it into the contract,
/// credits the manager's balance with the currency breakdown, clears any
/// debtor flags for the contract and re-evaluates completion. All writes
/// commit inside the single store borrow.
pub fn create_direct(
    store: &mut LedgerStore,
    request: &PaymentRequest,
    actor: &Actor,
    time_provider: &SafeTimeProvider,
    events: &mut EventStore,
) -> Result<PaymentReceipt> {
    validate_amount(request.amount)?;
    let contract_id = resolve_target(store, request.target)?;
    store.employee(actor.id)?;

    let now = time_provider.now();
    let customer_id = store.contract(contract_id)?.customer_id;

    let note_id = create_note(store, request, customer_id, actor, now);
    let payment = Payment::new_paid(
        contract_id,
        request.amount,
        now,
        customer_id,
        actor.id,
        Some(note_id),
        request.currency,
        request.currency_course,
        actor.id,
    );
    let payment_id = store.insert_payment(payment);
    store.contract_mut(contract_id)?.link_payment(payment_id);

    balance::adjust(store, actor.id, request.currency, events, now);
    clear_debtors(store, contract_id, events, now);

    events.emit(Event::PaymentRecorded {
        payment_id,
        amount: request.amount,
        status: PaymentStatus::Paid,
        timestamp: now,
    });
    events.emit(Event::PaymentConfirmed {
        payment_id,
        contract_id,
        amount: request.amount,
        confirmed_by: actor.id,
        timestamp: now,
    });

    check_completion(store, contract_id, events, now)?;
    info!(%payment_id, %contract_id, amount = %request.amount, "direct payment settled");

    Ok(PaymentReceipt {
        payment_id,
        contract_id,
    })
}

/// cash-desk confirmation of a pending payment
///
/// Settles against the contract recorded on the payment at creation time;
/// if that contract has closed in the meantime, falls back to the
/// customer's current active contract. The contract is resolved before any
/// write, so a failed resolution leaves the payment untouched.
pub fn confirm(
    store: &mut LedgerStore,
    payment_id: PaymentId,
    actor: &Actor,
    time_provider: &SafeTimeProvider,
    events: &mut EventStore,
) -> Result<PaymentReceipt> {
    let payment = store.payment(payment_id)?;
    if payment.is_settled() {
        return Err(LedgerError::PaymentAlreadySettled {
            id: payment_id,
            status: payment.status,
        });
    }
    let amount = payment.amount;
    let customer_id = payment.customer_id;
    let manager_id = payment.manager_id;
    let recorded_contract_id = payment.contract_id;

    let contract_id = match store.contract(recorded_contract_id) {
        Ok(c) if c.status == ContractStatus::Active => c.id,
        _ => store
            .active_contract_for_customer(customer_id)
            .map(|c| c.id)
            .ok_or(LedgerError::NoActiveContract { customer_id })?,
    };

    let now = time_provider.now();
    let payment = store.payment_mut(payment_id)?;
    payment.is_paid = true;
    payment.status = PaymentStatus::Paid;
    payment.confirmed_at = Some(now);
    payment.confirmed_by = Some(actor.id);

    store.contract_mut(contract_id)?.link_payment(payment_id);

    // confirmed amounts land in the dollar bucket of the recording manager
    balance::adjust(
        store,
        manager_id,
        CurrencyAmounts::dollars(amount),
        events,
        now,
    );
    clear_debtors(store, contract_id, events, now);

    events.emit(Event::PaymentConfirmed {
        payment_id,
        contract_id,
        amount,
        confirmed_by: actor.id,
        timestamp: now,
    });

    check_completion(store, contract_id, events, now)?;
    info!(%payment_id, %contract_id, amount = %amount, "payment confirmed");

    Ok(PaymentReceipt {
        payment_id,
        contract_id,
    })
}

/// cash-desk rejection of a pending payment
///
/// Terminal: a rejected payment never affects balances or contracts, and
/// the reason is appended to the payment's note.
pub fn reject(
    store: &mut LedgerStore,
    payment_id: PaymentId,
    reason: &str,
    _actor: &Actor,
    time_provider: &SafeTimeProvider,
    events: &mut EventStore,
) -> Result<PaymentId> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(LedgerError::EmptyRejectionReason);
    }

    let payment = store.payment(payment_id)?;
    if payment.is_settled() {
        return Err(LedgerError::PaymentAlreadySettled {
            id: payment_id,
            status: payment.status,
        });
    }
    let note_id = payment.note;

    let now = time_provider.now();
    store.payment_mut(payment_id)?.status = PaymentStatus::Rejected;

    if let Some(note_id) = note_id {
        if let Some(note) = store.note_mut(note_id) {
            note.append_line(&format!("[{REJECTION_TAG}: {reason}]"));
        }
    }

    events.emit(Event::PaymentRejected {
        payment_id,
        reason: reason.to_string(),
        timestamp: now,
    });
    info!(%payment_id, reason, "payment rejected");

    Ok(payment_id)
}

/// confirm a batch of payments, one independent attempt per id
///
/// A failing item is captured in the result list and does not abort the
/// rest; the batch succeeds only when every item did.
pub fn confirm_batch(
    store: &mut LedgerStore,
    payment_ids: &[PaymentId],
    actor: &Actor,
    time_provider: &SafeTimeProvider,
    events: &mut EventStore,
) -> BatchOutcome {
    let mut items = Vec::with_capacity(payment_ids.len());

    for &payment_id in payment_ids {
        let outcome = match confirm(store, payment_id, actor, time_provider, events) {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                warn!(%payment_id, error = %e, "batch confirmation item failed");
                Err(e.to_string())
            }
        };
        items.push(BatchItem {
            payment_id,
            outcome,
        });
    }

    let success = items.iter().all(|i| i.outcome.is_ok());
    BatchOutcome { success, items }
}

/// recompute the contract's paid total and complete it when covered
///
/// totalPaid = initialPayment + sum of linked confirmed payments. Completion
/// is one-way: an already completed contract is left untouched.
pub fn check_completion(
    store: &mut LedgerStore,
    contract_id: ContractId,
    events: &mut EventStore,
    now: DateTime<Utc>,
) -> Result<()> {
    let contract = store.contract(contract_id)?;
    if contract.status != ContractStatus::Active {
        return Ok(());
    }

    let total_paid = crate::reporting::contract_total_paid(store, contract);
    let total_price = contract.total_price;

    if total_paid >= total_price {
        store.contract_mut(contract_id)?.status = ContractStatus::Completed;
        events.emit(Event::ContractCompleted {
            contract_id,
            total_paid,
            timestamp: now,
        });
        info!(%contract_id, total_paid = %total_paid, "contract completed");
    }

    Ok(())
}

fn validate_amount(amount: Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidPaymentAmount { amount });
    }
    Ok(())
}

fn resolve_target(store: &LedgerStore, target: PaymentTarget) -> Result<ContractId> {
    match target {
        PaymentTarget::Contract(id) => store.contract(id).map(|c| c.id),
        PaymentTarget::Debtor(id) => {
            let contract_id = store.debtor(id)?.contract_id;
            store.contract(contract_id).map(|c| c.id)
        }
    }
}

fn create_note(
    store: &mut LedgerStore,
    request: &PaymentRequest,
    customer_id: crate::types::CustomerId,
    actor: &Actor,
    now: DateTime<Utc>,
) -> NoteId {
    let text = request
        .note
        .clone()
        .unwrap_or_else(|| format!("To'lov: {}", request.amount));
    store.insert_note(Note::new(text, customer_id, actor.id, now))
}

fn clear_debtors(
    store: &mut LedgerStore,
    contract_id: ContractId,
    events: &mut EventStore,
    now: DateTime<Utc>,
) {
    let removed = store.remove_debtors_for(contract_id);
    if removed > 0 {
        events.emit(Event::DebtorsCleared {
            contract_id,
            removed,
            timestamp: now,
        });
    }
}
