//! Adjustable-rate worst-case projections

use serde::{Deserialize, Serialize};
use crate::amortization::{calculate_monthly_payment, AmortizationState};
use crate::loan::ArmConfig;

/// Projected rate and payment for one loan year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmRateEntry {
    /// 1-indexed loan year
    pub year: u32,
    /// Annual rate in percent
    pub rate: f64,
    /// P&I payment re-amortized over the remaining term at `rate`
    pub monthly_payment: f64,
}

/// Worst-case rate path: every allowed adjustment moves the rate up by its full cap.
///
/// - Years within the initial fixed period keep `initial_rate`
/// - The first adjustment year adds the initial cap
/// - Each later year adds the periodic cap
/// - No year exceeds `initial_rate + lifetime_cap`
///
/// Each year's payment re-amortizes the balance left at the start of that year over the
/// remaining term.
pub fn generate_arm_projections(
    arm_config: &ArmConfig,
    initial_rate: f64,
    loan_amount: f64,
    term_years: u32,
) -> Vec<ArmRateEntry> {
    let max_rate = arm_config.max_rate(initial_rate);
    let fixed_years = arm_config.initial_fixed_period_years;
    let final_month = term_years * 12;

    let mut state = AmortizationState::new(loan_amount, initial_rate);
    let mut projections = Vec::with_capacity(term_years as usize);
    let mut rate = initial_rate;

    for year in 1..=term_years {
        rate = if year <= fixed_years {
            initial_rate
        } else if year == fixed_years + 1 {
            (initial_rate + arm_config.initial_cap).min(max_rate)
        } else {
            (rate + arm_config.periodic_cap).min(max_rate)
        };

        let remaining_years = term_years - year + 1;
        let monthly_payment = calculate_monthly_payment(state.balance, rate, remaining_years);

        projections.push(ArmRateEntry { year, rate, monthly_payment });

        // Roll the balance forward through this year's 12 payments
        state.annual_rate = rate;
        for _ in 0..12 {
            state.advance_month();
            let interest = state.period_interest();
            let principal = if state.payment_number == final_month {
                state.balance
            } else {
                (monthly_payment - interest).min(state.balance)
            };
            state.apply_payment(principal);
        }
    }

    projections
}

/// Highest projected monthly payment, 0 for an empty projection
pub fn worst_case_payment(projections: &[ArmRateEntry]) -> f64 {
    projections
        .iter()
        .map(|p| p.monthly_payment)
        .fold(0.0, f64::max)
}
