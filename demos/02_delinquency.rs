/// delinquency - a client runs out of cash and the penalty rate kicks in
use bank_simulator::{AccountType, Bank, Event, LendingPolicy, Money, Rate, SafeTimeProvider, TimeSource};
use rust_decimal_macros::dec;

fn run(policy: LendingPolicy, label: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut bank = Bank::with_policy(
        "Financial Bank",
        Money::from_major(1_000_000),
        policy,
        SafeTimeProvider::new(TimeSource::System),
    )?;

    let anna = bank.add_client("Anna Sidorova");
    let boris = bank.add_client("Boris");
    bank.open_account(anna, Money::from_major(2_000), AccountType::Checking)?;
    let loan = bank.grant_loan(anna, Money::from_major(10_000), Rate::from_percentage(dec!(12)), 12)?;

    // anna spends most of her free cash
    bank.transfer(anna, boris, Money::from_major(11_000))?;

    println!("=== {} ===", label);
    for _ in 0..3 {
        for event in bank.process_month() {
            match event {
                Event::LoanPaymentCollected { amount, months_paid, term_months, .. } => {
                    println!("month {}: collected {} ({}/{})", bank.month(), amount, months_paid, term_months);
                }
                Event::PaymentMissed { expected_amount, available, new_rate, .. } => {
                    println!(
                        "month {}: missed {} with only {} available, rate now {}",
                        bank.month(), expected_amount, available, new_rate
                    );
                }
                _ => {}
            }
        }
        let l = bank.client(anna)?.loan(loan)?;
        println!("  payment {}  remaining {}", l.monthly_payment, l.remaining_balance());
    }
    println!();

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    run(LendingPolicy::standard(), "fixed payment (default)")?;
    run(LendingPolicy::standard().with_repricing(true), "repriced payment")?;

    Ok(())
}
