pub mod amortization;
pub mod annuity;

pub use amortization::{create_plan, AmortizationSchedule};
pub use annuity::calculate_annuity;
