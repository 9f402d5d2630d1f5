use rust_decimal::{Decimal, MathematicalOps};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::validate_terms;

/// Calculate the fixed monthly installment that pays off a loan.
///
/// Uses the standard annuity payment formula
/// `P * r / (1 - (1 + r)^-n)` where `r` is the monthly rate, and rounds the
/// result to cents with banker's rounding. `annual_interest_rate` is the
/// nominal yearly rate.
///
/// Fails with [`LoanError::InvalidParameter`] when the duration, the amount or
/// the rate is not strictly positive (checked in that order).
pub fn calculate_annuity(
    total_loan_amount: Money,
    annual_interest_rate: Rate,
    duration_in_months: i32,
) -> Result<Money> {
    let months = validate_terms(total_loan_amount, annual_interest_rate, duration_in_months)?;
    let monthly_rate = annual_interest_rate.monthly_rate().as_decimal();

    annuity_payment(total_loan_amount.as_decimal(), monthly_rate, months)
        .map(|payment| Money::from_decimal(payment).round_cents())
        .ok_or_else(|| {
            LoanError::calculation(format!(
                "annuity of {total_loan_amount} at {annual_interest_rate} over {months} months is not representable"
            ))
        })
}

fn annuity_payment(principal: Decimal, monthly_rate: Decimal, months: u32) -> Option<Decimal> {
    // (1 + r)^-n taken as (1 / (1 + r))^n so long terms shrink towards zero instead of overflowing
    let base = Decimal::ONE.checked_add(monthly_rate)?;
    let discount = Decimal::ONE.checked_div(base)?.checked_powu(u64::from(months))?;

    let numerator = principal.checked_mul(monthly_rate)?;
    let denominator = Decimal::ONE.checked_sub(discount)?;

    numerator.checked_div(denominator)
}
