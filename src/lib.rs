pub mod api;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod interest;
pub mod payments;
pub mod types;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use payments::{calculate_annuity, create_plan, AmortizationSchedule};
pub use types::{LoanParameters, Payment};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
