use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// internal precision; display is always 2 places
const MONEY_DP: u32 = 8;

/// money type with 8 decimal places of internal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(MONEY_DP))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.round_dp(MONEY_DP)))
    }

    /// create from integer amount (whole currency units)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor amount (cents)
    pub fn from_minor(amount: i64) -> Self {
        Money((Decimal::from(amount) / dec!(100)).round_dp(MONEY_DP))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// share of this amount at the given rate (e.g. 20% of a loan)
    pub fn portion(&self, rate: Rate) -> Self {
        Money((self.0 * rate.as_decimal()).round_dp(MONEY_DP))
    }

    /// one month of simple interest at an annual rate
    pub fn monthly_interest(&self, annual_rate: Rate) -> Self {
        Money((self.0 * annual_rate.as_decimal() / dec!(12)).round_dp(MONEY_DP))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0.round_dp(2))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money((self.0 + other.0).round_dp(MONEY_DP))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = (self.0 + other.0).round_dp(MONEY_DP);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money((self.0 - other.0).round_dp(MONEY_DP))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = (self.0 - other.0).round_dp(MONEY_DP);
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money((self.0 * other).round_dp(MONEY_DP))
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money((self.0 / other).round_dp(MONEY_DP))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// rate type for interest rates and policy ratios, stored as a fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 3.5 for 3.5%)
    pub fn from_percentage(p: Decimal) -> Self {
        Rate(p / dec!(100))
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * dec!(100)
    }

    /// monthly rate from annual rate
    pub fn monthly_rate(&self) -> Rate {
        Rate(self.0 / dec!(12))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = self.as_percentage().normalize();
        if pct.scale() == 0 {
            write!(f, "{}.0%", pct)
        } else {
            write!(f, "{}%", pct)
        }
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

/// adding rates adds percentage points
impl Add for Rate {
    type Output = Rate;

    fn add(self, other: Rate) -> Rate {
        Rate(self.0 + other.0)
    }
}

impl AddAssign for Rate {
    fn add_assign(&mut self, other: Rate) {
        self.0 += other.0;
    }
}

/// (1 + r)^-n by repeated multiplication
///
/// Stays in (0, 1] for any non-negative rate, so long terms at high rates
/// shrink towards zero instead of overflowing.
pub(crate) fn discount_factor(rate: Decimal, periods: u32) -> Decimal {
    let v = Decimal::ONE / (Decimal::ONE + rate);
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor *= v;
        if factor.is_zero() {
            break;
        }
    }
    factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.as_decimal(), dec!(100.12345679)); // rounded to 8 places
        assert_eq!(m.to_string(), "100.12");
    }

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Money::from_major(5).to_string(), "5.00");
        assert_eq!(Money::from_minor(1999).to_string(), "19.99");
        assert_eq!(Money::from_decimal(dec!(-0.125)).to_string(), "-0.12");
    }

    #[test]
    fn test_monthly_interest() {
        let balance = Money::from_major(12_000);
        let interest = balance.monthly_interest(Rate::from_percentage(dec!(5)));
        assert_eq!(interest, Money::from_major(50));

        let small = Money::from_major(1_200).monthly_interest(Rate::from_percentage(dec!(3.5)));
        assert_eq!(small, Money::from_decimal(dec!(3.5)));
    }

    #[test]
    fn test_portion_and_sum() {
        let amount = Money::from_major(20_000);
        assert_eq!(amount.portion(Rate::from_percentage(dec!(20))), Money::from_major(4_000));

        let total: Money = [Money::from_major(1), Money::from_minor(50)].iter().sum();
        assert_eq!(total, Money::from_decimal(dec!(1.5)));
    }

    #[test]
    fn test_rate_points() {
        let rate = Rate::from_percentage(dec!(12)) + Rate::from_percentage(dec!(5));
        assert_eq!(rate.as_percentage(), dec!(17));
        assert_eq!(rate.to_string(), "17.0%");
        assert_eq!(Rate::from_percentage(dec!(5)).to_string(), "5.0%");
        assert_eq!(Rate::from_percentage(dec!(3.5)).to_string(), "3.5%");
        assert_eq!(Rate::from_percentage(dec!(12)).monthly_rate().as_decimal(), dec!(0.01));
    }

    #[test]
    fn test_discount_factor() {
        assert_eq!(discount_factor(dec!(0.25), 2), dec!(0.64));
        assert_eq!(discount_factor(dec!(0.5), 0), Decimal::ONE);

        // 1000% a year for 30 years would be far past Decimal::MAX compounded up
        let tiny = discount_factor(dec!(1000) / dec!(1200), 360);
        assert!(tiny >= Decimal::ZERO);
        assert!(tiny < dec!(0.0000000001));
    }
}
