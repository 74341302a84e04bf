/// monthly cycle - the stock scenario run for a year with deterministic time
use bank_simulator::chrono::{TimeZone, Utc};
use bank_simulator::{
    AccountType, Bank, Event, LendingPolicy, Money, Rate, SafeTimeProvider, TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let mut bank = Bank::with_policy(
        "Financial Bank",
        Money::from_major(1_000_000),
        LendingPolicy::standard(),
        time,
    )?;

    let ivan = bank.add_client("Ivan Petrov");
    let anna = bank.add_client("Anna Sidorova");
    let romashka = bank.add_client("Romashka LLC");

    bank.open_account(ivan, Money::from_major(50_000), AccountType::Checking)?;
    bank.open_account(ivan, Money::from_major(100_000), AccountType::Deposit)?;
    bank.open_account(anna, Money::from_major(75_000), AccountType::Savings)?;
    bank.open_account(romashka, Money::from_major(500_000), AccountType::Checking)?;

    bank.grant_loan(ivan, Money::from_major(20_000), Rate::from_percentage(dec!(12)), 24)?;
    bank.grant_loan(romashka, Money::from_major(100_000), Rate::from_percentage(dec!(10)), 12)?;

    for _ in 0..12 {
        let events = bank.process_month();
        for event in &events {
            match event {
                Event::LoanRepaid { client_name, loan_id, .. } => {
                    println!("month {}: loan {} of {} fully repaid", bank.month(), loan_id, client_name);
                }
                Event::PaymentMissed { client_id, loan_id, new_rate, .. } => {
                    println!("month {}: client {} missed loan {}, rate now {}", bank.month(), client_id, loan_id, new_rate);
                }
                _ => {}
            }
        }
    }

    let summary = bank.summary();
    println!("\ncapital: {}", summary.capital);
    println!("reserve fund: {}", summary.reserve_fund);
    println!("clients: {}", summary.client_count);
    println!("total deposits: {}", summary.total_deposits);
    println!("total loans: {}", summary.total_loans);

    for client in bank.clients() {
        println!("\n{}", bank.client_detail(client.id)?.to_json_pretty()?);
    }

    Ok(())
}
