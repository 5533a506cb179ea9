//! Private mortgage insurance: LTV, premium, and automatic termination

use crate::amortization::AmortizationEntry;
use crate::loan::PmiConfig;

/// Balance-to-original-price ratio at which borrower-paid PMI terminates automatically
pub const PMI_TERMINATION_LTV: f64 = 0.78;

/// Loan-to-value ratio in percent
pub fn calculate_ltv(loan_amount: f64, property_price: f64) -> f64 {
    loan_amount / property_price * 100.0
}

/// Monthly PMI premium; only borrower-paid monthly PMI costs anything per month
pub fn calculate_monthly_pmi(loan_amount: f64, pmi_config: &PmiConfig) -> f64 {
    match pmi_config {
        PmiConfig::Monthly { annual_rate } => loan_amount * annual_rate / 12.0,
        PmiConfig::SinglePremium { .. } | PmiConfig::LenderPaid | PmiConfig::NotRequired => 0.0,
    }
}

/// First payment number at which the balance is at or below 78% of the original price
pub fn find_pmi_removal_month(schedule: &[AmortizationEntry], original_property_price: f64) -> Option<u32> {
    find_pmi_removal_month_at(schedule, original_property_price, PMI_TERMINATION_LTV)
}

/// Same as [`find_pmi_removal_month`] with an explicit termination ratio (0.78 = 78%)
pub fn find_pmi_removal_month_at(
    schedule: &[AmortizationEntry],
    original_property_price: f64,
    termination_ltv: f64,
) -> Option<u32> {
    let threshold = termination_ltv * original_property_price;
    schedule
        .iter()
        .find(|entry| entry.remaining_balance <= threshold)
        .map(|entry| entry.payment_number)
}

/// Annotate a schedule with PMI charges and LTV.
///
/// PMI is charged on every payment before `removal_month`; with no removal month it runs
/// for the whole schedule.
pub fn annotate_pmi(
    schedule: Vec<AmortizationEntry>,
    monthly_pmi: f64,
    removal_month: Option<u32>,
    property_price: Option<f64>,
) -> Vec<AmortizationEntry> {
    schedule
        .into_iter()
        .map(|mut entry| {
            entry.pmi_active = monthly_pmi > 0.0
                && removal_month.map_or(true, |month| entry.payment_number < month);
            entry.pmi_paid = if entry.pmi_active { monthly_pmi } else { 0.0 };
            entry.ltv_percent = property_price
                .filter(|price| *price > 0.0)
                .map(|price| calculate_ltv(entry.remaining_balance, price));
            entry.refresh_total();
            entry
        })
        .collect()
}
