use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// decimal places every reported money amount is rounded to
pub const CENT_SCALE: u32 = 2;

/// Money type backed by an exact decimal.
///
/// Arithmetic never rounds implicitly; callers round explicitly with
/// [`Money::round_cents`] at the points where a reported amount is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal, keeping every digit
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str_exact(s.trim())?))
    }

    /// create from integer amount (dollars, euros, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to cents, ties going to the even neighbour
    pub fn round_cents(&self) -> Self {
        Money(round_bankers(self.0, CENT_SCALE))
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// addition reporting overflow as `None`
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// subtraction reporting overflow as `None`
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// same value without trailing zeros, e.g. `2000.0` becomes `2000`
    pub fn normalize(&self) -> Self {
        Money(self.0.normalize())
    }
}

/// round `value` to `dp` places with banker's rounding
pub fn round_bankers(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
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

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

/// rate type for nominal interest rates, stored as a fraction (0.05 for 5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal fraction (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5.0 for 5%)
    pub fn from_percentage(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    /// parse a percentage string such as `"5.0"`
    pub fn from_percentage_str(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Rate::from_percentage(Decimal::from_str_exact(s.trim())?))
    }

    /// get as decimal fraction
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage, `None` when it does not fit a decimal
    pub fn as_percentage(&self) -> Option<Decimal> {
        self.0.checked_mul(Decimal::ONE_HUNDRED)
    }

    /// check if strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// monthly rate from annual rate
    pub fn monthly_rate(&self) -> Rate {
        Rate(self.0 / Decimal::from(12))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_percentage() {
            Some(percentage) => write!(f, "{}%", percentage.normalize()),
            None => write!(f, "{}", self.0.normalize()),
        }
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}
