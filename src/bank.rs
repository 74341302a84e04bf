use hourglass_rs::{SafeTimeProvider, TimeSource};
use tracing::{debug, info, warn};

use crate::account::BankAccount;
use crate::client::Client;
use crate::config::LendingPolicy;
use crate::decimal::{Money, Rate};
use crate::errors::{BankError, Result};
use crate::events::{Event, EventStore};
use crate::loan::Loan;
use crate::types::{AccountNumber, AccountType, ClientId, LoanId, RejectionReason};
use crate::views::{BankSummary, ClientDetail};

/// owns every client, the capital and reserve fund, and the id counters
///
/// All mutation goes through `&mut self`, so a monthly cycle, a loan grant or
/// a transfer is applied as a whole or not at all.
///
/// Onboarding, lending and transfer events pile up in an internal store until
/// the caller drains it with [`Bank::take_events`]. `process_month` returns its
/// own events and never adds to that store.
pub struct Bank {
    name: String,
    capital: Money,
    reserve_fund: Money,
    clients: Vec<Client>,
    policy: LendingPolicy,
    time: SafeTimeProvider,
    events: EventStore,
    month: u32,
    next_client_id: u32,
    next_loan_id: u32,
    next_account_number: u64,
}

/// Public API
impl Bank {
    /// create a bank on the system clock with the standard policy
    pub fn new(name: impl Into<String>, initial_capital: Money) -> Self {
        let policy = LendingPolicy::standard();
        let time = SafeTimeProvider::new(TimeSource::System);
        Self::build(name.into(), initial_capital, policy, time)
    }

    /// create a bank with an explicit policy and clock
    pub fn with_policy(
        name: impl Into<String>,
        initial_capital: Money,
        policy: LendingPolicy,
        time: SafeTimeProvider,
    ) -> Result<Self> {
        policy.validate()?;
        Ok(Self::build(name.into(), initial_capital, policy, time))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capital(&self) -> Money {
        self.capital
    }

    pub fn reserve_fund(&self) -> Money {
        self.reserve_fund
    }

    /// number of processed months
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    pub fn time(&self) -> &SafeTimeProvider {
        &self.time
    }

    /// events emitted outside the monthly cycle since the last drain
    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    /// drain the store; a long-running driver should call this after each operation
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> + '_ {
        self.clients.iter()
    }

    pub fn client(&self, id: ClientId) -> Result<&Client> {
        self.clients
            .iter()
            .find(|c| c.id == id)
            .ok_or(BankError::UnknownClient { id })
    }

    pub fn summary(&self) -> BankSummary {
        BankSummary::from_bank(self)
    }

    pub fn client_detail(&self, id: ClientId) -> Result<ClientDetail> {
        self.client(id).map(ClientDetail::from_client)
    }

    pub fn add_client(&mut self, name: impl Into<String>) -> ClientId {
        let id = ClientId(self.next_client_id);
        self.next_client_id += 1;

        let client = Client::new(id, name);
        info!(client = %id, name = %client.name, "client added");
        self.events.emit(Event::ClientAdded {
            client_id: id,
            name: client.name.clone(),
        });
        self.clients.push(client);
        id
    }

    /// open an account; the deposit also lands in the client's free balance and the bank's capital
    pub fn open_account(
        &mut self,
        client_id: ClientId,
        initial_deposit: Money,
        account_type: AccountType,
    ) -> Result<AccountNumber> {
        if initial_deposit.is_negative() {
            return Err(BankError::InvalidAmount { amount: initial_deposit });
        }
        let index = self.client_index(client_id)?;

        let number = AccountNumber(self.next_account_number);
        self.next_account_number += 1;

        let rate = self.policy.account_rates.rate_for(account_type);
        let account = BankAccount::new(number, account_type, initial_deposit, rate, self.time.now());

        let client = &mut self.clients[index];
        client.accounts.push(account);
        client.balance += initial_deposit;
        self.capital += initial_deposit;

        info!(
            client = %client_id,
            account = %number,
            kind = %account_type,
            deposit = %initial_deposit,
            "account opened"
        );
        self.events.emit(Event::AccountOpened {
            client_id,
            account: number,
            account_type,
            initial_deposit,
        });

        Ok(number)
    }

    /// pay cash into an existing account
    pub fn deposit(&mut self, client_id: ClientId, number: AccountNumber, amount: Money) -> Result<()> {
        let index = self.client_index(client_id)?;
        let client = &mut self.clients[index];

        client.account_mut(number)?.deposit(amount)?;
        client.balance += amount;
        self.capital += amount;

        info!(client = %client_id, account = %number, amount = %amount, "deposit applied");
        Ok(())
    }

    /// take cash out of an account; both the account and the free balance must cover it
    pub fn withdraw(&mut self, client_id: ClientId, number: AccountNumber, amount: Money) -> Result<()> {
        if !amount.is_positive() {
            return Err(BankError::InvalidAmount { amount });
        }
        let index = self.client_index(client_id)?;
        let client = &mut self.clients[index];

        let free = client.balance;
        let account = client.account_mut(number)?;
        if free < amount {
            return Err(BankError::InsufficientFunds {
                available: free.min(account.balance),
                requested: amount,
            });
        }
        account.withdraw(amount)?;
        client.balance -= amount;
        self.capital -= amount;

        info!(client = %client_id, account = %number, amount = %amount, "withdrawal applied");
        Ok(())
    }

    /// grant a loan after the exposure and own-funds checks
    ///
    /// A rejected application leaves every balance untouched.
    pub fn grant_loan(
        &mut self,
        client_id: ClientId,
        amount: Money,
        rate: Rate,
        term_months: u32,
    ) -> Result<LoanId> {
        if !amount.is_positive() {
            return Err(BankError::InvalidAmount { amount });
        }
        if term_months == 0 {
            return Err(BankError::InvalidTerm { months: term_months });
        }
        if rate.is_negative() {
            return Err(BankError::InvalidInterestRate { rate });
        }
        let index = self.client_index(client_id)?;

        let limit = self.capital.portion(self.policy.exposure_limit);
        if amount > limit {
            warn!(client = %client_id, amount = %amount, limit = %limit, "loan rejected: exposure limit");
            self.events.emit(Event::LoanRejected {
                client_id,
                amount,
                reason: RejectionReason::ExceedsExposureLimit,
            });
            return Err(BankError::ExceedsExposureLimit { limit, requested: amount });
        }

        let required = amount.portion(self.policy.down_payment_ratio);
        let available = self.clients[index].balance;
        if available < required {
            warn!(
                client = %client_id,
                amount = %amount,
                required = %required,
                available = %available,
                "loan rejected: insufficient own funds"
            );
            self.events.emit(Event::LoanRejected {
                client_id,
                amount,
                reason: RejectionReason::InsufficientOwnFunds,
            });
            return Err(BankError::InsufficientOwnFunds { required, available });
        }

        let loan_id = LoanId(self.next_loan_id);
        self.next_loan_id += 1;

        let loan = Loan::new(loan_id, amount, rate, term_months, self.time.now());
        let monthly_payment = loan.monthly_payment;

        let client = &mut self.clients[index];
        client.loans.push(loan);
        client.balance += amount;
        self.capital -= amount;

        info!(
            client = %client_id,
            loan = %loan_id,
            amount = %amount,
            rate = %rate,
            term_months,
            payment = %monthly_payment,
            "loan granted"
        );
        self.events.emit(Event::LoanGranted {
            client_id,
            loan_id,
            amount,
            rate,
            term_months,
            monthly_payment,
        });

        Ok(loan_id)
    }

    /// move free cash between two clients
    pub fn transfer(&mut self, from: ClientId, to: ClientId, amount: Money) -> Result<()> {
        if !amount.is_positive() {
            return Err(BankError::InvalidAmount { amount });
        }
        if from == to {
            return Err(BankError::SelfTransfer { id: from });
        }
        let sender = self.client_index(from)?;
        let receiver = self.client_index(to)?;

        let available = self.clients[sender].balance;
        if available < amount {
            warn!(from = %from, to = %to, amount = %amount, available = %available, "transfer refused");
            return Err(BankError::InsufficientFunds { available, requested: amount });
        }

        self.clients[sender].balance -= amount;
        self.clients[receiver].balance += amount;

        info!(from = %from, to = %to, amount = %amount, "transfer completed");
        self.events.emit(Event::TransferCompleted { from, to, amount });
        Ok(())
    }

    /// advance the simulation by one month
    ///
    /// Order is fixed: account interest for everyone, then loan collection for
    /// everyone, then the reserve yield. Returns the events of this cycle only.
    pub fn process_month(&mut self) -> Vec<Event> {
        let mut cycle = EventStore::new();

        self.accrue_account_interest(&mut cycle);
        self.collect_loan_payments(&mut cycle);
        self.credit_reserve_yield(&mut cycle);

        self.month += 1;
        info!(
            month = self.month,
            capital = %self.capital,
            reserve_fund = %self.reserve_fund,
            events = cycle.events().len(),
            "month processed"
        );

        cycle.take_events()
    }
}

/// Private API
impl Bank {
    fn build(name: String, initial_capital: Money, policy: LendingPolicy, time: SafeTimeProvider) -> Self {
        let reserve_fund = initial_capital.portion(policy.reserve_ratio);
        let next_account_number = policy.first_account_number;
        info!(bank = %name, capital = %initial_capital, reserve_fund = %reserve_fund, "bank created");

        Self {
            name,
            capital: initial_capital,
            reserve_fund,
            clients: Vec::new(),
            policy,
            time,
            events: EventStore::new(),
            month: 0,
            next_client_id: 1,
            next_loan_id: 1,
            next_account_number,
        }
    }

    fn client_index(&self, id: ClientId) -> Result<usize> {
        self.clients
            .iter()
            .position(|c| c.id == id)
            .ok_or(BankError::UnknownClient { id })
    }

    fn accrue_account_interest(&mut self, cycle: &mut EventStore) {
        for client in &mut self.clients {
            for account in &mut client.accounts {
                let interest = account.apply_interest();
                if interest.is_zero() {
                    continue;
                }
                debug!(client = %client.id, account = %account.number, interest = %interest, "interest accrued");
                cycle.emit(Event::InterestAccrued {
                    client_id: client.id,
                    account: account.number,
                    amount: interest,
                    new_balance: account.balance,
                });
            }
        }
    }

    fn collect_loan_payments(&mut self, cycle: &mut EventStore) {
        let penalty = self.policy.delinquency_penalty;
        let profit_share = self.policy.reserve_profit_share;
        let reprice = self.policy.reprice_on_delinquency;

        for client in &mut self.clients {
            // ids taken up front; repaid loans are dropped after the pass
            let snapshot: Vec<LoanId> = client.loans.iter().map(|l| l.id).collect();
            let mut repaid = Vec::new();

            for loan_id in snapshot {
                let available = client.balance;
                let Some(loan) = client.loan_mut(loan_id) else {
                    continue;
                };
                let payment = loan.monthly_payment;

                if available >= payment {
                    if !loan.make_payment() {
                        continue;
                    }
                    let profit = payment - loan.straight_line_principal();
                    let to_reserve = profit * profit_share.as_decimal();
                    let (months_paid, term_months) = (loan.months_paid, loan.term_months);
                    let is_repaid = loan.is_repaid();

                    client.balance -= payment;
                    self.capital += payment;
                    self.reserve_fund += to_reserve;

                    debug!(client = %client.id, loan = %loan_id, payment = %payment, to_reserve = %to_reserve, "loan payment collected");
                    cycle.emit(Event::LoanPaymentCollected {
                        client_id: client.id,
                        loan_id,
                        amount: payment,
                        to_reserve,
                        months_paid,
                        term_months,
                    });

                    if is_repaid {
                        info!(client = %client.id, name = %client.name, loan = %loan_id, "loan fully repaid");
                        cycle.emit(Event::LoanRepaid {
                            client_id: client.id,
                            client_name: client.name.clone(),
                            loan_id,
                        });
                        repaid.push(loan_id);
                    }
                } else {
                    let old_rate = loan.apply_penalty(penalty, reprice);
                    let new_rate = loan.interest_rate;

                    warn!(
                        client = %client.id,
                        name = %client.name,
                        loan = %loan_id,
                        due = %payment,
                        available = %available,
                        new_rate = %new_rate,
                        "loan payment missed"
                    );
                    cycle.emit(Event::PaymentMissed {
                        client_id: client.id,
                        loan_id,
                        expected_amount: payment,
                        available,
                        old_rate,
                        new_rate,
                    });
                }
            }

            if !repaid.is_empty() {
                client.loans.retain(|l| !repaid.contains(&l.id));
            }
        }
    }

    fn credit_reserve_yield(&mut self, cycle: &mut EventStore) {
        let amount = self.reserve_fund.portion(self.policy.reserve_yield);
        self.capital += amount;
        cycle.emit(Event::ReserveYieldCredited {
            amount,
            reserve_fund: self.reserve_fund,
        });
    }
}
