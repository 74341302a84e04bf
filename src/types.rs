use serde::{Deserialize, Serialize};
use std::fmt;

/// unique identifier for a client, assigned by the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub u32);

/// unique identifier for a loan, assigned by the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoanId(pub u32);

/// account number, rendered as `ACC1000001`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountNumber(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ACC{}", self.0)
    }
}

/// account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountType {
    /// current account, lowest rate
    #[default]
    Checking,
    /// accumulating account
    Savings,
    /// term deposit, highest rate
    Deposit,
}

impl AccountType {
    /// parse a free-form label; anything unrecognised is a checking account
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "savings" => AccountType::Savings,
            "deposit" => AccountType::Deposit,
            _ => AccountType::Checking,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::Deposit => "Deposit",
        };
        f.write_str(label)
    }
}

/// why a loan application was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    ExceedsExposureLimit,
    InsufficientOwnFunds,
}
