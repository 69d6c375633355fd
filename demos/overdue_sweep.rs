/// overdue sweep - time control, debtor flags and the arrears board
use nasiya_ledger::chrono::{Duration, Utc};
use nasiya_ledger::{
    Actor, Customer, Employee, InstallmentLedger, Money, NewContract, PaymentRequest, Role,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(Utc::now()));
    let mut ledger = InstallmentLedger::new();

    let manager_id = ledger.register_employee(Employee::new("Dilshod", "Rahimov", Role::Manager));
    let manager = Actor::new(manager_id, "Dilshod Rahimov", Role::Manager);
    let customer_id =
        ledger.register_customer(Customer::new("Sardor", "Aliyev", "+998935550011", manager_id));

    let contract_id = ledger.open_contract(
        NewContract {
            customer_id,
            product_name: "Muzlatgich".to_string(),
            total_price: Money::from_major(1_200),
            initial_payment: Money::from_major(200),
            monthly_payment: Money::from_major(100),
            period_months: 10,
            start_date: time.now(),
            next_payment_date: time.now() + Duration::days(30),
        },
        &manager,
        &time,
    )?;

    // six weeks pass without a payment
    let control = time.test_control().ok_or("test control unavailable")?;
    control.advance(Duration::days(42));

    // the scheduled sweep flags the contract; a second run adds nothing
    println!("sweep created {} flags", ledger.sweep_overdue_debtors(&time)?);
    println!("rerun created {} flags", ledger.sweep_overdue_debtors(&time)?);

    for row in ledger.debtor_board(&time) {
        println!(
            "{} owes {} on {}, {} days overdue",
            row.full_name, row.debt_amount, row.contract_id, row.overdue_days
        );
    }

    // the customer pays; confirming clears the flag
    let receipt = ledger.create_direct_payment(
        &PaymentRequest::for_contract(contract_id, Money::from_major(100)),
        &manager,
        &time,
    )?;
    println!("payment {} settled", receipt.payment_id);
    println!("board after payment: {} rows", ledger.debtor_board(&time).len());

    Ok(())
}
