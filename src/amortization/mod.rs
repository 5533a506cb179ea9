//! Amortization engine: level payments and month-by-month schedules

mod state;
mod engine;
mod schedule;

pub use state::AmortizationState;
pub use engine::{calculate_monthly_payment, generate_amortization_schedule, payment_date};
pub use schedule::{AmortizationEntry, ScheduleSummary};
