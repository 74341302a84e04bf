/// policy config - load lending policy from json and watch the gates
use bank_simulator::{AccountType, Bank, BankError, LendingPolicy, Money, Rate, SafeTimeProvider, TimeSource};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let json = LendingPolicy::conservative().to_json_pretty()?;
    println!("policy:\n{}\n", json);

    let policy = LendingPolicy::from_json(&json)?;
    let mut bank = Bank::with_policy(
        "Careful Bank",
        Money::from_major(500_000),
        policy,
        SafeTimeProvider::new(TimeSource::System),
    )?;

    let ivan = bank.add_client("Ivan Petrov");
    bank.open_account(ivan, Money::from_major(9_000), AccountType::Savings)?;

    let requests = [60_000, 30_000, 25_000];
    for amount in requests {
        match bank.grant_loan(ivan, Money::from_major(amount), Rate::from_percentage(dec!(11)), 36) {
            Ok(id) => println!("loan of {} granted as #{}", amount, id),
            Err(e @ BankError::ExceedsExposureLimit { .. }) => println!("loan of {} refused: {}", amount, e),
            Err(e @ BankError::InsufficientOwnFunds { .. }) => println!("loan of {} refused: {}", amount, e),
            Err(e) => return Err(e.into()),
        }
    }

    println!("\n{}", bank.summary().to_json_pretty()?);
    Ok(())
}
