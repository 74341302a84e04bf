use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{BankError, Result};
use crate::types::{AccountNumber, AccountType};

/// a single client account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub number: AccountNumber,
    pub account_type: AccountType,
    pub balance: Money,
    /// annual rate, fixed when the account is opened
    pub interest_rate: Rate,
    pub open_date: DateTime<Utc>,
}

impl BankAccount {
    pub fn new(
        number: AccountNumber,
        account_type: AccountType,
        initial_balance: Money,
        interest_rate: Rate,
        open_date: DateTime<Utc>,
    ) -> Self {
        Self {
            number,
            account_type,
            balance: initial_balance,
            interest_rate,
            open_date,
        }
    }

    pub fn deposit(&mut self, amount: Money) -> Result<()> {
        if !amount.is_positive() {
            return Err(BankError::InvalidAmount { amount });
        }
        self.balance += amount;
        Ok(())
    }

    /// withdraw funds; the balance is untouched on failure
    pub fn withdraw(&mut self, amount: Money) -> Result<()> {
        if !amount.is_positive() {
            return Err(BankError::InvalidAmount { amount });
        }
        if self.balance < amount {
            return Err(BankError::InsufficientFunds {
                available: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// credit one month of interest and return the amount credited
    pub fn apply_interest(&mut self) -> Money {
        let interest = self.balance.monthly_interest(self.interest_rate);
        self.balance += interest;
        interest
    }
}
