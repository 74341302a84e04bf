pub mod account;
pub mod bank;
pub mod client;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod loan;
pub mod types;
pub mod views;

// re-export key types
pub use account::BankAccount;
pub use bank::Bank;
pub use client::Client;
pub use config::{AccountRates, LendingPolicy};
pub use decimal::{Money, Rate};
pub use errors::{BankError, Result};
pub use events::{Event, EventStore};
pub use loan::{annuity_payment, present_value, Loan};
pub use types::{AccountNumber, AccountType, ClientId, LoanId, RejectionReason};
pub use views::{AccountView, BankSummary, ClientDetail, ClientSummary, LoanView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
