//! Loan feature calculators
//!
//! Independent pure functions layered on top of the amortization engine:
//! - **Points**: effective rate after discount points, cost of discount/origination points
//! - **Closing**: closing-cost aggregation and cash needed at closing
//! - **PMI**: LTV, monthly premium, automatic-termination month, schedule annotation
//! - **Down payment**: percent/dollar/loan-amount recompute
//! - **Extra payments**: full re-amortization with prepayments
//! - **ARM**: worst-case capped rate path with re-amortized payments

mod points;
mod closing;
mod pmi;
mod down_payment;
mod extra;
mod arm;

pub use points::{calculate_effective_rate, calculate_points_cost, RATE_REDUCTION_PER_POINT};
pub use closing::{calculate_total_closing_costs, calculate_gross_closing_costs, calculate_cash_at_closing};
pub use pmi::{
    calculate_ltv, calculate_monthly_pmi, find_pmi_removal_month, find_pmi_removal_month_at,
    annotate_pmi, PMI_TERMINATION_LTV,
};
pub use down_payment::{sync_down_payment, DownPaymentInput, DownPaymentSync, DEFAULT_DOWN_PAYMENT_PERCENT};
pub use extra::recalculate_with_extra_payments;
pub use arm::{generate_arm_projections, worst_case_payment, ArmRateEntry};
