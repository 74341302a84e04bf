use serde::{Deserialize, Serialize};

use crate::account::BankAccount;
use crate::decimal::Money;
use crate::errors::{BankError, Result};
use crate::loan::Loan;
use crate::types::{AccountNumber, ClientId, LoanId};

/// a bank client with free cash, accounts and loans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    /// free cash, separate from the account balances
    pub balance: Money,
    pub accounts: Vec<BankAccount>,
    pub loans: Vec<Loan>,
}

impl Client {
    pub fn new(id: ClientId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            balance: Money::ZERO,
            accounts: Vec::new(),
            loans: Vec::new(),
        }
    }

    pub fn account(&self, number: AccountNumber) -> Result<&BankAccount> {
        self.accounts
            .iter()
            .find(|a| a.number == number)
            .ok_or(BankError::UnknownAccount { number })
    }

    pub fn account_mut(&mut self, number: AccountNumber) -> Result<&mut BankAccount> {
        self.accounts
            .iter_mut()
            .find(|a| a.number == number)
            .ok_or(BankError::UnknownAccount { number })
    }

    pub fn loan(&self, id: LoanId) -> Result<&Loan> {
        self.loans
            .iter()
            .find(|l| l.id == id)
            .ok_or(BankError::UnknownLoan { id })
    }

    pub(crate) fn loan_mut(&mut self, id: LoanId) -> Option<&mut Loan> {
        self.loans.iter_mut().find(|l| l.id == id)
    }

    /// sum of account balances
    pub fn total_deposits(&self) -> Money {
        self.accounts.iter().map(|a| a.balance).sum()
    }

    /// sum of original principal of loans still held
    pub fn total_loan_principal(&self) -> Money {
        self.loans.iter().map(|l| l.principal).sum()
    }

    /// sum of computed remaining balances of loans still held
    pub fn total_loan_outstanding(&self) -> Money {
        self.loans.iter().map(|l| l.remaining_balance()).sum()
    }
}
