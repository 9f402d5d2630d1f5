use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// latest day of month a plan may start on; every month has at least this many days
pub const MAX_START_DAY: u32 = 28;

/// validated inputs of a loan plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub total_loan_amount: Money,
    pub annual_interest_rate: Rate,
    pub duration_in_months: u32,
    pub start_date: NaiveDate,
}

impl LoanParameters {
    /// validate every field, reporting the first violation
    pub fn new<D: Datelike>(
        total_loan_amount: Money,
        annual_interest_rate: Rate,
        duration_in_months: i32,
        start_date: &D,
    ) -> Result<Self> {
        let duration_in_months =
            validate_terms(total_loan_amount, annual_interest_rate, duration_in_months)?;
        let start_date = validate_start_date(start_date)?;

        Ok(Self {
            total_loan_amount,
            annual_interest_rate,
            duration_in_months,
            start_date,
        })
    }
}

/// check the preconditions shared by the annuity and the plan, returning the duration as a count
pub(crate) fn validate_terms(
    total_loan_amount: Money,
    annual_interest_rate: Rate,
    duration_in_months: i32,
) -> Result<u32> {
    if duration_in_months <= 0 {
        return Err(LoanError::invalid(
            "durationInMonths",
            duration_in_months,
            "must be greater than zero",
        ));
    }
    if !total_loan_amount.is_positive() {
        return Err(LoanError::invalid(
            "totalLoanAmount",
            total_loan_amount,
            "must be greater than zero",
        ));
    }
    if !annual_interest_rate.is_positive() {
        return Err(LoanError::invalid(
            "annualInterestRate",
            annual_interest_rate,
            "must be greater than zero",
        ));
    }
    Ok(duration_in_months.unsigned_abs())
}

/// keep only the calendar date, rejecting days that some months lack
pub(crate) fn validate_start_date<D: Datelike>(start_date: &D) -> Result<NaiveDate> {
    if start_date.day() > MAX_START_DAY {
        return Err(LoanError::invalid(
            "startDate",
            format!(
                "{:04}-{:02}-{:02}",
                start_date.year(),
                start_date.month(),
                start_date.day()
            ),
            "day of month must not be after the 28th",
        ));
    }
    NaiveDate::from_ymd_opt(start_date.year(), start_date.month(), start_date.day())
        .ok_or_else(|| LoanError::calculation("start date is not a valid calendar date"))
}

/// one installment of an amortization plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub date: DateTime<Utc>,
    pub payment_amount: Money,
    pub interest: Money,
    pub principal: Money,
    pub initial_outstanding_principal: Money,
    pub remaining_outstanding_principal: Money,
}
