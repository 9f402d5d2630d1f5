/// quick start - monthly installment of a loan
use loan_plan_rs::{calculate_annuity, Money, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 5,000 borrowed at 5% a year over two years
    let installment = calculate_annuity(
        Money::from_major(5_000),
        Rate::from_percentage(dec!(5.0)),
        24,
    )?;

    println!("monthly installment: {installment}");

    Ok(())
}
