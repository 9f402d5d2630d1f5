use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// 30/360 convention: every month counts 30 days of a 360 day year
pub const DAYS_IN_MONTH: u32 = 30;
pub const DAYS_IN_YEAR: u32 = 360;

/// simple interest owed on `outstanding` for one 30/360 month, unrounded
pub fn simple_interest(annual_rate: Rate, outstanding: Money) -> Result<Money> {
    annual_rate
        .as_decimal()
        .checked_mul(Decimal::from(DAYS_IN_MONTH))
        .and_then(|d| d.checked_mul(outstanding.as_decimal()))
        .and_then(|d| d.checked_div(Decimal::from(DAYS_IN_YEAR)))
        .map(Money::from_decimal)
        .ok_or_else(|| {
            LoanError::calculation(format!(
                "overflow computing interest on {outstanding} at {annual_rate}"
            ))
        })
}
