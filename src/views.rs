/// serializable read views over bank state
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::BankAccount;
use crate::bank::Bank;
use crate::client::Client;
use crate::decimal::{Money, Rate};
use crate::loan::Loan;
use crate::types::{AccountNumber, AccountType, ClientId, LoanId};

/// bank-wide status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSummary {
    pub name: String,
    pub month: u32,
    pub capital: Money,
    pub reserve_fund: Money,
    pub client_count: usize,
    /// sum of every account balance
    pub total_deposits: Money,
    /// sum of original principal of loans still held
    pub total_loans: Money,
    /// sum of computed remaining balances
    pub total_loans_outstanding: Money,
    pub clients: Vec<ClientSummary>,
}

/// one line per client in the bank summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: ClientId,
    pub name: String,
    pub balance: Money,
    pub account_count: usize,
    pub loan_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDetail {
    pub id: ClientId,
    pub name: String,
    pub balance: Money,
    pub accounts: Vec<AccountView>,
    pub loans: Vec<LoanView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub number: AccountNumber,
    pub account_type: AccountType,
    pub balance: Money,
    pub interest_rate: Rate,
    pub open_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub principal: Money,
    pub interest_rate: Rate,
    pub monthly_payment: Money,
    pub remaining_balance: Money,
    pub months_paid: u32,
    pub term_months: u32,
    /// "paid/term", e.g. "3/24"
    pub progress: String,
    pub missed_payments: u32,
    pub start_date: DateTime<Utc>,
}

impl BankSummary {
    pub fn from_bank(bank: &Bank) -> Self {
        let clients: Vec<&Client> = bank.clients().collect();

        BankSummary {
            name: bank.name().to_string(),
            month: bank.month(),
            capital: bank.capital(),
            reserve_fund: bank.reserve_fund(),
            client_count: clients.len(),
            total_deposits: clients.iter().map(|c| c.total_deposits()).sum(),
            total_loans: clients.iter().map(|c| c.total_loan_principal()).sum(),
            total_loans_outstanding: clients.iter().map(|c| c.total_loan_outstanding()).sum(),
            clients: clients.iter().map(|c| ClientSummary::from_client(c)).collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ClientSummary {
    pub fn from_client(client: &Client) -> Self {
        ClientSummary {
            id: client.id,
            name: client.name.clone(),
            balance: client.balance,
            account_count: client.accounts.len(),
            loan_count: client.loans.len(),
        }
    }
}

impl ClientDetail {
    pub fn from_client(client: &Client) -> Self {
        ClientDetail {
            id: client.id,
            name: client.name.clone(),
            balance: client.balance,
            accounts: client.accounts.iter().map(AccountView::from_account).collect(),
            loans: client.loans.iter().map(LoanView::from_loan).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl AccountView {
    pub fn from_account(account: &BankAccount) -> Self {
        AccountView {
            number: account.number,
            account_type: account.account_type,
            balance: account.balance,
            interest_rate: account.interest_rate,
            open_date: account.open_date,
        }
    }
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        LoanView {
            id: loan.id,
            principal: loan.principal,
            interest_rate: loan.interest_rate,
            monthly_payment: loan.monthly_payment,
            remaining_balance: loan.remaining_balance(),
            months_paid: loan.months_paid,
            term_months: loan.term_months,
            progress: format!("{}/{}", loan.months_paid, loan.term_months),
            missed_payments: loan.missed_payments,
            start_date: loan.start_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LendingPolicy;
    use chrono::TimeZone;
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;

    fn seeded_bank() -> (Bank, ClientId, ClientId) {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        ));
        let mut bank = Bank::with_policy(
            "Financial Bank",
            Money::from_major(1_000_000),
            LendingPolicy::standard(),
            time,
        )
        .unwrap();

        let ivan = bank.add_client("Ivan Petrov");
        let anna = bank.add_client("Anna Sidorova");
        bank.open_account(ivan, Money::from_major(50_000), AccountType::Checking).unwrap();
        bank.open_account(ivan, Money::from_major(100_000), AccountType::Deposit).unwrap();
        bank.open_account(anna, Money::from_major(75_000), AccountType::Savings).unwrap();
        bank.grant_loan(ivan, Money::from_major(20_000), Rate::from_percentage(dec!(12)), 24).unwrap();

        (bank, ivan, anna)
    }

    #[test]
    fn test_bank_summary_totals() {
        let (bank, _, _) = seeded_bank();
        let summary = bank.summary();

        assert_eq!(summary.name, "Financial Bank");
        assert_eq!(summary.client_count, 2);
        assert_eq!(summary.total_deposits, Money::from_major(225_000));
        assert_eq!(summary.total_loans, Money::from_major(20_000));
        assert_eq!(summary.capital, Money::from_major(1_000_000 + 225_000 - 20_000));
        assert_eq!(summary.reserve_fund, Money::from_major(100_000));
        assert_eq!(summary.clients[0].account_count, 2);
        assert_eq!(summary.clients[1].loan_count, 0);
    }

    #[test]
    fn test_client_detail_has_computed_balance() {
        let (mut bank, ivan, _) = seeded_bank();
        bank.process_month();

        let detail = bank.client_detail(ivan).unwrap();
        assert_eq!(detail.accounts.len(), 2);
        assert_eq!(detail.loans.len(), 1);

        let loan = &detail.loans[0];
        assert_eq!(loan.progress, "1/24");
        assert!(loan.remaining_balance < loan.principal);
        assert!(loan.remaining_balance.is_positive());
    }

    #[test]
    fn test_views_render_json() {
        let (bank, ivan, _) = seeded_bank();

        let json = bank.summary().to_json_pretty().unwrap();
        assert!(json.contains("\"total_deposits\""));
        assert!(json.contains("Financial Bank"));

        let json = bank.client_detail(ivan).unwrap().to_json_pretty().unwrap();
        assert!(json.contains("\"remaining_balance\""));
        assert!(json.contains("\"progress\": \"0/24\""));
    }

    #[test]
    fn test_unknown_client_detail() {
        let (bank, _, _) = seeded_bank();
        assert!(bank.client_detail(ClientId(77)).is_err());
    }
}
