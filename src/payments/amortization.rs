use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::interest::simple_interest;
use crate::payments::annuity::calculate_annuity;
use crate::types::{validate_start_date, validate_terms, LoanParameters, Payment};

/// amortization schedule with its totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmortizationSchedule {
    pub parameters: LoanParameters,
    pub annuity: Money,
    pub payments: Vec<Payment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl AmortizationSchedule {
    /// generate payment schedule
    pub fn generate(parameters: &LoanParameters) -> Result<Self> {
        let months = i32::try_from(parameters.duration_in_months).map_err(|_| {
            LoanError::invalid(
                "durationInMonths",
                parameters.duration_in_months,
                "is too large",
            )
        })?;
        // fields are public, so a hand-built value is checked like a fresh one
        validate_terms(
            parameters.total_loan_amount,
            parameters.annual_interest_rate,
            months,
        )?;
        validate_start_date(&parameters.start_date)?;

        let (annuity, payments) = plan_payments(parameters)?;

        let total_interest = checked_sum(payments.iter().map(|p| p.interest), "interest")?;
        let total_payment =
            checked_sum(payments.iter().map(|p| p.payment_amount), "payment amounts")?;

        Ok(Self {
            parameters: *parameters,
            annuity,
            payments,
            total_interest,
            total_payment,
        })
    }
}

/// Create the monthly payment plan of an annuity loan.
///
/// The first payment falls on the calendar date of `start_date` (time of day
/// and offset are dropped) and each following one a month later on the same
/// day, at midnight UTC. Interest accrues on the outstanding principal using
/// 30/360; the last payment absorbs any rounding residue so the loan ends at
/// exactly zero.
///
/// Either the whole plan is returned or an error: an invalid parameter is
/// reported before anything is computed.
pub fn create_plan<D: Datelike>(
    total_loan_amount: Money,
    annual_interest_rate: Rate,
    duration_in_months: i32,
    start_date: &D,
) -> Result<Vec<Payment>> {
    let parameters = LoanParameters::new(
        total_loan_amount,
        annual_interest_rate,
        duration_in_months,
        start_date,
    )?;

    plan_payments(&parameters).map(|(_, payments)| payments)
}

/// annuity and payments of already validated parameters
fn plan_payments(parameters: &LoanParameters) -> Result<(Money, Vec<Payment>)> {
    // the whole plan must fit in the supported calendar before anything is computed
    payment_date(
        parameters.start_date,
        parameters.duration_in_months.saturating_sub(1),
    )?;

    let months = i32::try_from(parameters.duration_in_months)
        .map_err(|_| LoanError::calculation("duration does not fit a month count"))?;
    let annuity = calculate_annuity(
        parameters.total_loan_amount,
        parameters.annual_interest_rate,
        months,
    )?;
    let payments = build_payments(parameters, annuity)?;

    Ok((annuity, payments))
}

fn build_payments(parameters: &LoanParameters, annuity: Money) -> Result<Vec<Payment>> {
    let months = parameters.duration_in_months;
    let rate = parameters.annual_interest_rate;

    let mut payments = Vec::with_capacity(months as usize);
    let mut outstanding = parameters.total_loan_amount;

    for i in 0..months {
        let date = payment_date(parameters.start_date, i)?;
        let interest = simple_interest(rate, outstanding)?.round_cents();

        let is_last = i + 1 == months;
        let due = annuity.checked_sub(interest).ok_or_else(overflow)?;
        // the last installment settles whatever is left, sub-cent digits included
        let (principal, payment_amount) = if is_last || due > outstanding {
            (outstanding, outstanding.checked_add(interest).ok_or_else(overflow)?)
        } else {
            let principal = due.round_cents();
            let payment_amount = principal.checked_add(interest).ok_or_else(overflow)?;
            (principal, payment_amount.round_cents())
        };

        let remaining = outstanding.checked_sub(principal).ok_or_else(overflow)?;

        payments.push(Payment {
            date,
            payment_amount,
            interest,
            principal,
            initial_outstanding_principal: outstanding,
            remaining_outstanding_principal: remaining,
        });

        outstanding = remaining;
    }

    Ok(payments)
}

fn overflow() -> LoanError {
    LoanError::calculation("overflow building payment plan")
}

fn checked_sum(mut amounts: impl Iterator<Item = Money>, what: &str) -> Result<Money> {
    amounts
        .try_fold(Money::ZERO, Money::checked_add)
        .ok_or_else(|| LoanError::calculation(format!("total of {what} is not representable")))
}

/// date of the payment `offset` months after `start`, at midnight UTC
fn payment_date(start: NaiveDate, offset: u32) -> Result<DateTime<Utc>> {
    let month0 = i64::from(start.month0()) + i64::from(offset);
    let year = i64::from(start.year()) + month0 / 12;
    let month = (month0 % 12) as u32 + 1;

    i32::try_from(year)
        .ok()
        .and_then(|year| {
            Utc.with_ymd_and_hms(year, month, start.day(), 0, 0, 0)
                .single()
        })
        .ok_or_else(|| {
            LoanError::calculation(format!(
                "payment date {offset} months after {start} is out of range"
            ))
        })
}
