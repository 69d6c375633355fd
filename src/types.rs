use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a customer
pub type CustomerId = Uuid;
/// unique identifier for a contract
pub type ContractId = Uuid;
/// unique identifier for a payment
pub type PaymentId = Uuid;
/// unique identifier for an employee (manager, cashier, ...)
pub type EmployeeId = Uuid;
/// unique identifier for a debtor flag
pub type DebtorId = Uuid;
/// unique identifier for a note
pub type NoteId = Uuid;

/// payment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// recorded, waiting for cash-desk confirmation
    Pending,
    /// confirmed; counts toward the contract and the manager's balance
    Paid,
    /// refused by the cash desk; terminal
    Rejected,
}

/// what a payment covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    /// down payment recorded after the contract start
    Initial,
    /// regular installment
    Monthly,
}

/// contract status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    /// installments still being collected
    Active,
    /// cumulative confirmed payments reached the total price
    Completed,
    /// terminated before completion
    Cancelled,
}

/// employee role as supplied by the boundary auth layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Seller,
    Cashier,
}

/// verified caller identity, supplied by the excluded auth layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: EmployeeId,
    pub display_name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: EmployeeId, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role,
        }
    }
}

/// currency breakdown of a cash movement (dollar and so'm buckets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CurrencyAmounts {
    pub dollar: Money,
    pub sum: Money,
}

impl CurrencyAmounts {
    pub const ZERO: CurrencyAmounts = CurrencyAmounts {
        dollar: Money::ZERO,
        sum: Money::ZERO,
    };

    pub fn new(dollar: Money, sum: Money) -> Self {
        Self { dollar, sum }
    }

    /// breakdown with everything in the dollar bucket
    pub fn dollars(amount: Money) -> Self {
        Self {
            dollar: amount,
            sum: Money::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.dollar.is_zero() && self.sum.is_zero()
    }
}

impl Add for CurrencyAmounts {
    type Output = CurrencyAmounts;

    fn add(self, other: CurrencyAmounts) -> CurrencyAmounts {
        CurrencyAmounts {
            dollar: self.dollar + other.dollar,
            sum: self.sum + other.sum,
        }
    }
}

impl AddAssign for CurrencyAmounts {
    fn add_assign(&mut self, other: CurrencyAmounts) {
        self.dollar += other.dollar;
        self.sum += other.sum;
    }
}

impl Neg for CurrencyAmounts {
    type Output = CurrencyAmounts;

    /// reversal delta for undoing a prior adjustment
    fn neg(self) -> CurrencyAmounts {
        CurrencyAmounts {
            dollar: -self.dollar,
            sum: -self.sum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_amounts_add_and_negate() {
        let a = CurrencyAmounts::new(Money::from_major(300), Money::from_major(100_000));
        let b = CurrencyAmounts::dollars(Money::from_major(50));

        let total = a + b;
        assert_eq!(total.dollar, Money::from_major(350));
        assert_eq!(total.sum, Money::from_major(100_000));

        let reversed = total + (-total);
        assert!(reversed.is_zero());
    }
}
