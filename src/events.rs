use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{AccountNumber, AccountType, ClientId, LoanId, RejectionReason};

/// all events that can be emitted by the bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // onboarding events
    ClientAdded {
        client_id: ClientId,
        name: String,
    },
    AccountOpened {
        client_id: ClientId,
        account: AccountNumber,
        account_type: AccountType,
        initial_deposit: Money,
    },

    // lending events
    LoanGranted {
        client_id: ClientId,
        loan_id: LoanId,
        amount: Money,
        rate: Rate,
        term_months: u32,
        monthly_payment: Money,
    },
    LoanRejected {
        client_id: ClientId,
        amount: Money,
        reason: RejectionReason,
    },

    // money movement
    TransferCompleted {
        from: ClientId,
        to: ClientId,
        amount: Money,
    },

    // monthly cycle events
    InterestAccrued {
        client_id: ClientId,
        account: AccountNumber,
        amount: Money,
        new_balance: Money,
    },
    LoanPaymentCollected {
        client_id: ClientId,
        loan_id: LoanId,
        amount: Money,
        to_reserve: Money,
        months_paid: u32,
        term_months: u32,
    },
    PaymentMissed {
        client_id: ClientId,
        loan_id: LoanId,
        expected_amount: Money,
        available: Money,
        old_rate: Rate,
        new_rate: Rate,
    },
    LoanRepaid {
        client_id: ClientId,
        client_name: String,
        loan_id: LoanId,
    },
    ReserveYieldCredited {
        amount: Money,
        reserve_fund: Money,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
