use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::{AccountNumber, ClientId, LoanId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BankError {
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        available: Money,
        requested: Money,
    },

    #[error("exceeds per-client exposure limit: limit {limit}, requested {requested}")]
    ExceedsExposureLimit {
        limit: Money,
        requested: Money,
    },

    #[error("insufficient own funds: required {required}, available {available}")]
    InsufficientOwnFunds {
        required: Money,
        available: Money,
    },

    #[error("client not found: {id}")]
    UnknownClient {
        id: ClientId,
    },

    #[error("account not found: {number}")]
    UnknownAccount {
        number: AccountNumber,
    },

    #[error("loan not found: {id}")]
    UnknownLoan {
        id: LoanId,
    },

    #[error("invalid loan term: {months} months")]
    InvalidTerm {
        months: u32,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("client {id} cannot transfer to itself")]
    SelfTransfer {
        id: ClientId,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, BankError>;
