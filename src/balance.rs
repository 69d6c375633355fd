use chrono::{DateTime, Utc};
use tracing::debug;

use crate::events::{Event, EventStore};
use crate::model::Balance;
use crate::store::LedgerStore;
use crate::types::{CurrencyAmounts, EmployeeId};

/// add a currency delta to a manager's running balance
///
/// The balance is created lazily on first adjustment. Deltas may be
/// negative when a prior payment amount has to be reversed. Mutation is
/// serialized by the exclusive store borrow, so two confirmations against
/// the same manager cannot lose an update.
pub fn adjust(
    store: &mut LedgerStore,
    manager_id: EmployeeId,
    delta: CurrencyAmounts,
    events: &mut EventStore,
    now: DateTime<Utc>,
) -> Balance {
    let balance = store.balance_or_create(manager_id);
    balance.apply(delta);
    let updated = balance.clone();

    events.emit(Event::BalanceAdjusted {
        manager_id,
        dollar_delta: delta.dollar,
        sum_delta: delta.sum,
        dollar_total: updated.dollar,
        sum_total: updated.sum,
        timestamp: now,
    });
    debug!(%manager_id, dollar = %delta.dollar, sum = %delta.sum, "balance adjusted");

    updated
}
