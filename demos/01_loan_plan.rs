/// full amortization plan with totals
use loan_plan_rs::chrono::NaiveDate;
use loan_plan_rs::{AmortizationSchedule, LoanParameters, Money, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2020, 12, 28).ok_or("bad start date")?;
    let params = LoanParameters::new(
        Money::from_major(12_000),
        Rate::from_percentage(dec!(4.5)),
        12,
        &start,
    )?;

    let schedule = AmortizationSchedule::generate(&params)?;

    println!("{:<12} {:>10} {:>10} {:>10} {:>12}", "date", "payment", "interest", "principal", "remaining");
    for p in &schedule.payments {
        println!(
            "{:<12} {:>10} {:>10} {:>10} {:>12}",
            p.date.format("%Y-%m-%d"),
            p.payment_amount,
            p.interest,
            p.principal,
            p.remaining_outstanding_principal.normalize(),
        );
    }

    println!("total interest: {}", schedule.total_interest);
    println!("total paid:     {}", schedule.total_payment);

    Ok(())
}
