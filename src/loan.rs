use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{discount_factor, Money, Rate};
use crate::types::LoanId;

/// an annuity loan held by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub principal: Money,
    /// current annual rate; raised by delinquency penalties
    pub interest_rate: Rate,
    pub term_months: u32,
    /// fixed at origination unless the loan is repriced
    pub monthly_payment: Money,
    pub months_paid: u32,
    pub missed_payments: u32,
    pub start_date: DateTime<Utc>,
}

impl Loan {
    /// `term_months` must be non-zero; the bank validates it before calling
    pub fn new(
        id: LoanId,
        principal: Money,
        interest_rate: Rate,
        term_months: u32,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            principal,
            interest_rate,
            term_months,
            monthly_payment: annuity_payment(principal, interest_rate, term_months),
            months_paid: 0,
            missed_payments: 0,
            start_date,
        }
    }

    /// count one scheduled payment; false once the loan is fully paid
    pub fn make_payment(&mut self) -> bool {
        if self.months_paid < self.term_months {
            self.months_paid += 1;
            true
        } else {
            false
        }
    }

    pub fn remaining_months(&self) -> u32 {
        self.term_months.saturating_sub(self.months_paid)
    }

    pub fn is_repaid(&self) -> bool {
        self.months_paid >= self.term_months
    }

    /// present value of the outstanding payments at the current rate
    ///
    /// After a penalty this discounts the original payment at the raised rate,
    /// so the figure drops even though nothing was paid.
    pub fn remaining_balance(&self) -> Money {
        if self.is_repaid() {
            return Money::ZERO;
        }
        present_value(self.monthly_payment, self.interest_rate, self.remaining_months())
    }

    /// principal share of one payment, spread evenly over the term
    pub fn straight_line_principal(&self) -> Money {
        self.principal / Decimal::from(self.term_months)
    }

    /// raise the rate by `points` for a missed payment and return the previous rate
    ///
    /// With `reprice` the payment is recomputed at the raised rate; otherwise it stays fixed.
    pub fn apply_penalty(&mut self, points: Rate, reprice: bool) -> Rate {
        let old_rate = self.interest_rate;
        if reprice {
            self.reprice(old_rate + points);
        } else {
            self.interest_rate += points;
        }
        self.missed_payments += 1;
        old_rate
    }

    /// switch to `new_rate` and re-amortize what is still owed over the remaining months
    pub fn reprice(&mut self, new_rate: Rate) {
        if self.is_repaid() {
            self.interest_rate = new_rate;
            return;
        }
        let outstanding = self.remaining_balance();
        let months = self.remaining_months();
        self.interest_rate = new_rate;
        self.monthly_payment = annuity_payment(outstanding, new_rate, months);
    }
}

/// fixed monthly payment that amortizes `principal` over `months`
///
/// P * r / (1 - v^n) with v = 1 / (1 + r), or P / n when the rate is zero
pub fn annuity_payment(principal: Money, annual_rate: Rate, months: u32) -> Money {
    if months == 0 {
        return principal;
    }

    let r = annual_rate.monthly_rate().as_decimal();
    if r.is_zero() {
        return principal / Decimal::from(months);
    }

    let discount = discount_factor(r, months);
    Money::from_decimal(principal.as_decimal() * r / (Decimal::ONE - discount))
}

/// value today of `months` payments of `payment`
///
/// A * (1 - v^m) / r with v = 1 / (1 + r), or A * m when the rate is zero
pub fn present_value(payment: Money, annual_rate: Rate, months: u32) -> Money {
    if months == 0 {
        return Money::ZERO;
    }

    let r = annual_rate.monthly_rate().as_decimal();
    if r.is_zero() {
        return payment * Decimal::from(months);
    }

    let discount = discount_factor(r, months);
    Money::from_decimal(payment.as_decimal() * (Decimal::ONE - discount) / r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn loan(amount: i64, percent: Decimal, term: u32) -> Loan {
        Loan::new(
            LoanId(1),
            Money::from_major(amount),
            Rate::from_percentage(percent),
            term,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_annuity_payment() {
        // 20,000 at 12% over 24 months, r = 1%
        let l = loan(20_000, dec!(12), 24);
        assert_eq!(l.monthly_payment.round_dp(2).as_decimal(), dec!(941.47));

        // 100,000 at 10% over 12 months
        let l = loan(100_000, dec!(10), 12);
        assert_eq!(l.monthly_payment.round_dp(2).as_decimal(), dec!(8791.59));
    }

    #[test]
    fn test_zero_rate_is_straight_division() {
        let l = loan(12_000, dec!(0), 12);
        assert_eq!(l.monthly_payment, Money::from_major(1_000));
        assert_eq!(l.remaining_balance(), Money::from_major(12_000));
    }

    #[test]
    fn test_remaining_balance_starts_at_principal() {
        let l = loan(20_000, dec!(12), 24);
        let diff = (l.remaining_balance() - Money::from_major(20_000)).as_decimal().abs();
        assert!(diff < dec!(0.0001), "remaining {} should equal principal", l.remaining_balance());
    }

    #[test]
    fn test_remaining_balance_declines_and_hits_zero() {
        let mut l = loan(20_000, dec!(12), 24);
        let mut previous = l.remaining_balance();

        for _ in 0..23 {
            assert!(l.make_payment());
            let current = l.remaining_balance();
            assert!(current < previous);
            previous = current;
        }

        // last payment leaves one payment's worth before it is made
        assert_eq!(previous.round_dp(2), (l.monthly_payment / dec!(1.01)).round_dp(2));

        assert!(l.make_payment());
        assert!(l.is_repaid());
        assert_eq!(l.remaining_balance(), Money::ZERO);
    }

    #[test]
    fn test_make_payment_past_term_is_noop() {
        let mut l = loan(1_000, dec!(6), 2);
        assert!(l.make_payment());
        assert!(l.make_payment());
        assert!(!l.make_payment());
        assert_eq!(l.months_paid, 2);
        assert_eq!(l.remaining_balance(), Money::ZERO);
    }

    #[test]
    fn test_penalty_keeps_payment_and_lowers_present_value() {
        let mut l = loan(20_000, dec!(12), 24);
        let payment = l.monthly_payment;
        let before = l.remaining_balance();

        let old = l.apply_penalty(Rate::from_percentage(dec!(5)), false);

        assert_eq!(old.as_percentage(), dec!(12));
        assert_eq!(l.interest_rate.as_percentage(), dec!(17));
        assert_eq!(l.monthly_payment, payment);
        assert_eq!(l.missed_payments, 1);
        assert_eq!(l.months_paid, 0);
        // same payment discounted at a higher rate
        assert!(l.remaining_balance() < before);
    }

    #[test]
    fn test_reprice_raises_payment_and_keeps_balance() {
        let mut l = loan(20_000, dec!(12), 24);
        let payment = l.monthly_payment;
        let outstanding = l.remaining_balance();

        l.reprice(Rate::from_percentage(dec!(17)));

        assert!(l.monthly_payment > payment);
        let diff = (l.remaining_balance() - outstanding).as_decimal().abs();
        assert!(diff < dec!(0.0001));
    }

    #[test]
    fn test_repricing_penalty() {
        let mut l = loan(20_000, dec!(12), 24);
        let outstanding = l.remaining_balance();

        let old = l.apply_penalty(Rate::from_percentage(dec!(5)), true);

        assert_eq!(old.as_percentage(), dec!(12));
        assert_eq!(l.interest_rate.as_percentage(), dec!(17));
        assert_eq!(l.missed_payments, 1);
        let diff = (l.remaining_balance() - outstanding).as_decimal().abs();
        assert!(diff < dec!(0.0001));
    }

    #[test]
    fn test_straight_line_principal() {
        let l = loan(20_000, dec!(12), 24);
        assert_eq!(l.straight_line_principal().round_dp(2).as_decimal(), dec!(833.33));
    }

    #[test]
    fn test_high_rate_long_term_stays_finite() {
        // 1000% a year over ten years: the payment is essentially the monthly interest
        let l = loan(1_000, dec!(1000), 120);
        assert_eq!(l.monthly_payment.round_dp(2).as_decimal(), dec!(833.33));
        let diff = (l.remaining_balance() - Money::from_major(1_000)).as_decimal().abs();
        assert!(diff < dec!(0.0001));
    }

    #[test]
    fn test_years_of_penalties_keep_balance_computable() {
        let mut fixed = loan(50_000, dec!(12), 360);
        let mut repriced = fixed.clone();

        for _ in 0..60 {
            fixed.apply_penalty(Rate::from_percentage(dec!(5)), false);
            repriced.apply_penalty(Rate::from_percentage(dec!(5)), true);
        }

        assert_eq!(fixed.interest_rate.as_percentage(), dec!(312));
        assert!(fixed.remaining_balance().is_positive());
        assert!(fixed.remaining_balance() < fixed.principal);

        assert_eq!(repriced.missed_payments, 60);
        assert!(repriced.monthly_payment > fixed.monthly_payment);
        let drift = (repriced.remaining_balance() - Money::from_major(50_000)).as_decimal().abs();
        assert!(drift < dec!(0.01));
    }
}
