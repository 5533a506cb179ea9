//! Comprehensive per-loan result assembly
//!
//! Runs validation, then composes the feature calculators into one [`LoanResults`].

use chrono::{Local, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::amortization::{
    calculate_monthly_payment, generate_amortization_schedule, AmortizationEntry, ScheduleSummary,
};
use crate::error::MortgageResult;
use crate::features::{
    annotate_pmi, calculate_cash_at_closing, calculate_effective_rate, calculate_gross_closing_costs,
    calculate_ltv, calculate_monthly_pmi, calculate_points_cost, calculate_total_closing_costs,
    find_pmi_removal_month_at, generate_arm_projections, recalculate_with_extra_payments,
    sync_down_payment, worst_case_payment, ArmRateEntry, DownPaymentInput, PMI_TERMINATION_LTV,
};
use crate::loan::{LoanInputs, PmiConfig};
use crate::validation::LoanValidator;

/// Settings that are not part of a loan itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationConfig {
    /// Date the schedule counts from; payment 1 falls one month later
    pub start_date: NaiveDate,
    /// Balance / original price ratio that ends borrower-paid PMI (0.78 = 78%)
    pub pmi_termination_ltv: f64,
}

impl CalculationConfig {
    pub fn starting(start_date: NaiveDate) -> Self {
        Self { start_date, ..Self::default() }
    }
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            start_date: Local::now().date_naive(),
            pmi_termination_ltv: PMI_TERMINATION_LTV,
        }
    }
}

/// Everything derived from one `LoanInputs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResults {
    // Payment
    /// Annual rate after discount points, in percent
    pub effective_rate: f64,
    pub monthly_payment_pi: f64,
    /// Property tax, insurance, and HOA per month
    pub monthly_escrow: f64,
    pub monthly_payment_total: f64,
    pub total_interest: f64,
    /// Total monthly payment x term months
    pub total_cost: f64,
    pub amortization_schedule: Vec<AmortizationEntry>,

    // Closing
    pub points_cost: f64,
    /// Line items plus points
    pub total_closing_costs: f64,
    /// After seller concessions and lender credits; may be negative
    pub net_closing_costs: f64,
    pub down_payment: f64,
    pub cash_needed_at_closing: f64,
    pub loan_to_value: Option<f64>,

    // PMI, measured on the accelerated schedule when extra payments apply
    pub monthly_pmi: f64,
    pub pmi_removal_month: Option<u32>,
    pub pmi_removal_date: Option<NaiveDate>,
    pub total_pmi_paid: f64,

    // Extra payments
    pub original_term_months: u32,
    pub accelerated_term_months: Option<u32>,
    pub accelerated_schedule: Option<Vec<AmortizationEntry>>,
    pub total_interest_saved: Option<f64>,
    pub early_payoff_date: Option<NaiveDate>,

    // ARM
    pub arm_projections: Option<Vec<ArmRateEntry>>,
    pub worst_case_max_payment: Option<f64>,
    /// Worst-case P&I over the term plus escrow and PMI on the same basis as `total_cost`
    pub worst_case_total_cost: Option<f64>,
}

impl LoanResults {
    /// Schedule the borrower actually follows: accelerated when extra payments apply
    pub fn effective_schedule(&self) -> &[AmortizationEntry] {
        self.accelerated_schedule
            .as_deref()
            .unwrap_or(&self.amortization_schedule)
    }

    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.effective_schedule().last().map(|e| e.payment_date)
    }
}

/// Full results with a schedule starting today
pub fn calculate_comprehensive_loan_results(inputs: &LoanInputs) -> MortgageResult<LoanResults> {
    calculate_comprehensive_loan_results_with(inputs, &CalculationConfig::default(), &LoanValidator::default())
}

/// Full results under an explicit config and validator
pub fn calculate_comprehensive_loan_results_with(
    inputs: &LoanInputs,
    config: &CalculationConfig,
    validator: &LoanValidator,
) -> MortgageResult<LoanResults> {
    validator.validate_loan(inputs)?;

    let principal = inputs.principal;
    let term_months = inputs.term_months();

    // Rate and base payment
    let effective_rate = calculate_effective_rate(inputs.interest_rate, inputs.discount_points.unwrap_or(0.0));
    let monthly_payment_pi = calculate_monthly_payment(principal, effective_rate, inputs.term_years);

    // Closing
    let points_cost = calculate_points_cost(
        principal,
        inputs.discount_points.unwrap_or(0.0),
        inputs.origination_points.unwrap_or(0.0),
    );
    let total_closing_costs = calculate_gross_closing_costs(&inputs.closing_costs, points_cost);
    let net_closing_costs = calculate_total_closing_costs(
        &inputs.closing_costs,
        points_cost,
        inputs.seller_concessions.unwrap_or(0.0),
        inputs.lender_credits.unwrap_or(0.0),
    );

    let down_payment = match inputs.property_price {
        Some(price) => {
            let driving = DownPaymentInput::from_options(inputs.down_payment_percent, inputs.down_payment_dollar);
            sync_down_payment(price, driving).dollar
        }
        None => inputs.down_payment_dollar.unwrap_or(0.0),
    };
    let cash_needed_at_closing = calculate_cash_at_closing(down_payment, net_closing_costs);
    let loan_to_value = inputs.property_price.map(|price| calculate_ltv(principal, price));

    // Schedule and PMI
    let monthly_pmi = calculate_monthly_pmi(principal, &inputs.pmi_config);
    let base_schedule = generate_amortization_schedule(principal, effective_rate, inputs.term_years, config.start_date);

    let removal_month_in = |schedule: &[AmortizationEntry]| match inputs.property_price {
        Some(price) if inputs.pmi_config.is_monthly() => {
            find_pmi_removal_month_at(schedule, price, config.pmi_termination_ltv)
        }
        _ => None,
    };

    let base_removal_month = removal_month_in(&base_schedule);
    let amortization_schedule = annotate_pmi(base_schedule, monthly_pmi, base_removal_month, inputs.property_price);

    let monthly_escrow = inputs.monthly_escrow();
    let monthly_payment_total = monthly_payment_pi + monthly_escrow + monthly_pmi;

    let base_summary = ScheduleSummary::from_entries(&amortization_schedule);
    let total_interest = base_summary.total_interest;
    let total_cost = monthly_payment_total * term_months as f64;

    // Extra payments
    let accelerated_schedule = if inputs.extra_payments.has_any() {
        let recalculated = recalculate_with_extra_payments(&amortization_schedule, &inputs.extra_payments, monthly_payment_pi);
        let removal = removal_month_in(&recalculated);
        Some(annotate_pmi(recalculated, monthly_pmi, removal, inputs.property_price))
    } else {
        None
    };
    let accelerated_summary = accelerated_schedule.as_deref().map(ScheduleSummary::from_entries);

    // PMI figures follow the schedule the borrower actually pays
    let followed_schedule = accelerated_schedule.as_deref().unwrap_or(&amortization_schedule);
    let pmi_removal_month = removal_month_in(followed_schedule);
    let pmi_removal_date = pmi_removal_month.and_then(|month| {
        followed_schedule
            .iter()
            .find(|e| e.payment_number == month)
            .map(|e| e.payment_date)
    });

    let total_pmi_paid = match inputs.pmi_config {
        PmiConfig::Monthly { .. } => accelerated_summary
            .as_ref()
            .map_or(base_summary.total_pmi, |summary| summary.total_pmi),
        PmiConfig::SinglePremium { amount } => amount,
        PmiConfig::LenderPaid | PmiConfig::NotRequired => 0.0,
    };

    // ARM
    let arm_projections = match (&inputs.arm_config, inputs.is_arm()) {
        (Some(arm), true) => Some(generate_arm_projections(arm, effective_rate, principal, inputs.term_years)),
        _ => None,
    };
    let worst_case_max_payment = arm_projections.as_deref().map(worst_case_payment);
    let worst_case_total_cost = arm_projections.as_deref().map(|projections| {
        let pi: f64 = projections.iter().map(|p| p.monthly_payment * 12.0).sum();
        pi + (monthly_escrow + monthly_pmi) * term_months as f64
    });

    debug!(
        "Loan {:.0} @ {:.3}% ({} months): P&I {:.2}, total {:.2}, interest {:.2}",
        principal, effective_rate, term_months, monthly_payment_pi, monthly_payment_total, total_interest
    );

    Ok(LoanResults {
        effective_rate,
        monthly_payment_pi,
        monthly_escrow,
        monthly_payment_total,
        total_interest,
        total_cost,
        amortization_schedule,
        points_cost,
        total_closing_costs,
        net_closing_costs,
        down_payment,
        cash_needed_at_closing,
        loan_to_value,
        monthly_pmi,
        pmi_removal_month,
        pmi_removal_date,
        total_pmi_paid,
        original_term_months: term_months,
        accelerated_term_months: accelerated_summary.as_ref().map(|s| s.total_payments),
        total_interest_saved: accelerated_summary.as_ref().map(|s| total_interest - s.total_interest),
        early_payoff_date: accelerated_summary.as_ref().and_then(|s| s.payoff_date),
        accelerated_schedule,
        arm_projections,
        worst_case_max_payment,
        worst_case_total_cost,
    })
}
