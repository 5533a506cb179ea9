//! Core amortization math: level payment and schedule generation

use chrono::{Months, NaiveDate};
use super::state::AmortizationState;
use super::schedule::AmortizationEntry;

/// Level monthly principal-and-interest payment.
///
/// # Arguments
/// * `principal` - Loan amount in USD
/// * `annual_rate_percent` - Annual rate in percent (5.0 = 5%)
/// * `term_years` - Loan term in years
///
/// A zero rate is plain division over the term, which avoids the 0/0 in the annuity formula.
pub fn calculate_monthly_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> f64 {
    let n = (term_years * 12) as f64;

    if annual_rate_percent == 0.0 {
        return principal / n;
    }

    let r = annual_rate_percent / 12.0 / 100.0;

    // M = P * r(1+r)^n / ((1+r)^n - 1)
    let growth = (1.0 + r).powf(n);
    principal * r * growth / (growth - 1.0)
}

/// Date of payment `n`: `n` calendar months after `start_date`.
/// Day-of-month clamps to the end of shorter months; saturates at the calendar limit.
pub fn payment_date(start_date: NaiveDate, n: u32) -> NaiveDate {
    start_date
        .checked_add_months(Months::new(n))
        .unwrap_or(NaiveDate::MAX)
}

/// Full amortization schedule of `term_years * 12` entries.
///
/// The final payment retires whatever balance remains so the schedule always closes at exactly 0.
pub fn generate_amortization_schedule(
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
    start_date: NaiveDate,
) -> Vec<AmortizationEntry> {
    let monthly_payment = calculate_monthly_payment(principal, annual_rate_percent, term_years);
    let n = term_years * 12;

    let mut state = AmortizationState::new(principal, annual_rate_percent);
    let mut schedule = Vec::with_capacity(n as usize);

    for _ in 1..=n {
        state.advance_month();

        let interest_paid = state.period_interest();
        let principal_paid = if state.payment_number == n {
            state.balance
        } else {
            monthly_payment - interest_paid
        };

        state.apply_payment(principal_paid);

        schedule.push(AmortizationEntry::new(
            state.payment_number,
            payment_date(start_date, state.payment_number),
            principal_paid,
            interest_paid,
            state.balance,
            annual_rate_percent,
        ));
    }

    schedule
}
