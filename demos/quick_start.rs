/// quick start - a contract through the cash-desk payment flow
use nasiya_ledger::chrono::{Duration, Utc};
use nasiya_ledger::{
    Actor, Customer, Employee, InstallmentLedger, Money, NewContract, PaymentRequest, Role,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(Utc::now()));
    let mut ledger = InstallmentLedger::new();

    // staff and customer
    let manager_id = ledger.register_employee(Employee::new("Aziz", "Karimov", Role::Manager));
    let cashier_id = ledger.register_employee(Employee::new("Nilufar", "Sobirova", Role::Cashier));
    let manager = Actor::new(manager_id, "Aziz Karimov", Role::Manager);
    let cashier = Actor::new(cashier_id, "Nilufar Sobirova", Role::Cashier);

    let customer_id =
        ledger.register_customer(Customer::new("Olim", "Toshmatov", "+998901234567", manager_id));

    // sell a phone on installments: $1000 total, $200 down, $100/month
    let contract_id = ledger.open_contract(
        NewContract {
            customer_id,
            product_name: "iPhone 15".to_string(),
            total_price: Money::from_major(1_000),
            initial_payment: Money::from_major(200),
            monthly_payment: Money::from_major(100),
            period_months: 8,
            start_date: time.now(),
            next_payment_date: time.now() + Duration::days(30),
        },
        &manager,
        &time,
    )?;

    // the manager records an installment, the cash desk confirms it
    let receipt = ledger.receive_payment(
        &PaymentRequest::for_contract(contract_id, Money::from_major(100)),
        &manager,
        &time,
    )?;
    println!("pending: {:?}", ledger.pending_cash_payments());

    ledger.confirm_payment(receipt.payment_id, &cashier, &time)?;

    // where the debt stands now
    let summary = ledger.contract_debt_summary(contract_id, &time)?;
    println!(
        "paid {} of {}, {} remaining",
        summary.total_paid,
        Money::from_major(1_000),
        summary.remaining_debt
    );
    println!("manager balance: {:?}", ledger.balance(manager_id));

    Ok(())
}
