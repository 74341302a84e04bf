use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{BankError, Result};
use crate::types::AccountType;

/// lending and bookkeeping policy of a bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingPolicy {
    /// largest single loan as a share of current capital
    pub exposure_limit: Rate,
    /// own funds a client must hold as a share of the requested loan
    pub down_payment_ratio: Rate,
    /// share of initial capital set aside as reserve fund
    pub reserve_ratio: Rate,
    /// share of monthly loan profit moved into the reserve fund
    pub reserve_profit_share: Rate,
    /// monthly investment yield earned on the reserve fund
    pub reserve_yield: Rate,
    /// percentage points added to a loan's rate per missed payment
    pub delinquency_penalty: Rate,
    /// recompute the monthly payment after a penalty instead of keeping it fixed
    #[serde(default)]
    pub reprice_on_delinquency: bool,
    pub account_rates: AccountRates,
    pub first_account_number: u64,
}

/// annual interest rate paid per account type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRates {
    pub checking: Rate,
    pub savings: Rate,
    pub deposit: Rate,
}

impl AccountRates {
    pub fn rate_for(&self, account_type: AccountType) -> Rate {
        match account_type {
            AccountType::Checking => self.checking,
            AccountType::Savings => self.savings,
            AccountType::Deposit => self.deposit,
        }
    }
}

impl Default for AccountRates {
    fn default() -> Self {
        Self {
            checking: Rate::from_percentage(dec!(0.5)),
            savings: Rate::from_percentage(dec!(3.5)),
            deposit: Rate::from_percentage(dec!(5.0)),
        }
    }
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl LendingPolicy {
    /// the stock policy: 10% exposure, 20% down payment, 10% reserve
    pub fn standard() -> Self {
        Self {
            exposure_limit: Rate::from_percentage(dec!(10)),
            down_payment_ratio: Rate::from_percentage(dec!(20)),
            reserve_ratio: Rate::from_percentage(dec!(10)),
            reserve_profit_share: Rate::from_percentage(dec!(20)),
            reserve_yield: Rate::from_percentage(dec!(1)),
            delinquency_penalty: Rate::from_percentage(dec!(5)),
            reprice_on_delinquency: false,
            account_rates: AccountRates::default(),
            first_account_number: 1_000_001,
        }
    }

    /// tighter lending: 5% exposure, 30% down payment, 15% reserve
    pub fn conservative() -> Self {
        Self {
            exposure_limit: Rate::from_percentage(dec!(5)),
            down_payment_ratio: Rate::from_percentage(dec!(30)),
            reserve_ratio: Rate::from_percentage(dec!(15)),
            reserve_profit_share: Rate::from_percentage(dec!(30)),
            ..Self::standard()
        }
    }

    pub fn with_repricing(mut self, reprice: bool) -> Self {
        self.reprice_on_delinquency = reprice;
        self
    }

    /// parse a policy from json and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json).map_err(|e| BankError::InvalidConfiguration {
            message: e.to_string(),
        })?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| BankError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    /// ratios must lie in [0, 1], rates and the penalty must not be negative
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("exposure_limit", self.exposure_limit),
            ("down_payment_ratio", self.down_payment_ratio),
            ("reserve_ratio", self.reserve_ratio),
            ("reserve_profit_share", self.reserve_profit_share),
            ("reserve_yield", self.reserve_yield),
        ];
        for (name, ratio) in ratios {
            let value = ratio.as_decimal();
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(BankError::InvalidConfiguration {
                    message: format!("{} must be between 0% and 100%, got {}", name, ratio),
                });
            }
        }

        let rates = [
            ("delinquency_penalty", self.delinquency_penalty),
            ("account_rates.checking", self.account_rates.checking),
            ("account_rates.savings", self.account_rates.savings),
            ("account_rates.deposit", self.account_rates.deposit),
        ];
        for (name, rate) in rates {
            if rate.is_negative() {
                return Err(BankError::InvalidConfiguration {
                    message: format!("{} must not be negative, got {}", name, rate),
                });
            }
        }

        Ok(())
    }
}
