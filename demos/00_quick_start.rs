/// quick start - open a bank, onboard a client, lend and run one month
use bank_simulator::{AccountType, Bank, Money, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut bank = Bank::new("Financial Bank", Money::from_major(1_000_000));

    let ivan = bank.add_client("Ivan Petrov");
    bank.open_account(ivan, Money::from_major(50_000), AccountType::Checking)?;
    let loan = bank.grant_loan(ivan, Money::from_major(20_000), Rate::from_percentage(dec!(12)), 24)?;

    bank.process_month();

    println!("{}", bank.summary().to_json_pretty()?);
    let detail = bank.client_detail(ivan)?;
    let view = detail.loans.iter().find(|l| l.id == loan).ok_or("loan missing")?;
    println!("loan {} remaining: {} ({})", view.id, view.remaining_balance, view.progress);

    Ok(())
}
