//! Itemized-vs-standard comparison and effective payment after tax savings

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use super::tables::{FilingStatus, TaxTables, QUALIFIED_DEBT_LIMIT, SALT_CAP};
use crate::amortization::{calculate_monthly_payment, generate_amortization_schedule, ScheduleSummary};
use crate::features::calculate_monthly_pmi;
use crate::loan::LoanInputs;

/// Borrower's tax situation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxProfile {
    /// Annual taxable income in USD
    pub annual_income: f64,
    pub filing_status: FilingStatus,
    /// Estimated annual property taxes in USD
    pub property_tax_annual: f64,
}

/// Deduction method that yields the larger deduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionMethod {
    Itemized,
    Standard,
}

/// Snapshot combining a loan's first-year interest with a tax profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBenefitCalculation {
    // Inputs
    pub loan_amount: f64,
    pub first_year_interest: f64,

    // Deductions
    /// Interest prorated to the qualified debt limit
    pub mortgage_interest_deduction: f64,
    /// Property tax capped at the SALT cap
    pub property_tax_deduction: f64,
    pub total_itemized_deductions: f64,
    pub standard_deduction: f64,

    // Method selection
    pub recommended_method: DeductionMethod,
    /// Itemized minus standard when itemizing wins, else 0
    pub additional_itemized_benefit: f64,
    pub itemization_beneficial: bool,

    // Savings
    pub marginal_tax_rate: f64,
    pub annual_tax_savings: f64,
    pub monthly_tax_savings: f64,

    // Payment impact
    /// Quoted P&I at the stated rate (before any discount-point buy-down) plus escrow and PMI
    pub original_monthly_payment: f64,
    pub effective_monthly_payment: f64,

    // Flags
    pub exceeds_750k_limit: bool,
    pub exceeds_salt_cap: bool,
}

/// Interest paid over the first 12 payments at the loan's stated rate
pub fn calculate_first_year_interest(loan: &LoanInputs) -> f64 {
    if loan.interest_rate == 0.0 {
        return 0.0;
    }

    // Payment dates don't affect interest
    let schedule = generate_amortization_schedule(
        loan.principal,
        loan.interest_rate,
        loan.term_years,
        NaiveDate::default(),
    );

    ScheduleSummary::interest_through(&schedule, 12)
}

/// Tax benefits under the 2025 tables
pub fn calculate_tax_benefits(loan: &LoanInputs, profile: &TaxProfile) -> TaxBenefitCalculation {
    calculate_tax_benefits_with(loan, profile, &TaxTables::tax_year_2025())
}

/// Tax benefits under the given tables
pub fn calculate_tax_benefits_with(
    loan: &LoanInputs,
    profile: &TaxProfile,
    tables: &TaxTables,
) -> TaxBenefitCalculation {
    let first_year_interest = calculate_first_year_interest(loan);

    // Interest on debt above the limit is not deductible; prorate
    let mortgage_interest_deduction = if loan.principal > QUALIFIED_DEBT_LIMIT {
        first_year_interest * (QUALIFIED_DEBT_LIMIT / loan.principal)
    } else {
        first_year_interest
    };

    let property_tax_deduction = profile.property_tax_annual.min(SALT_CAP);
    let total_itemized_deductions = mortgage_interest_deduction + property_tax_deduction;
    let standard_deduction = tables.standard_deduction(profile.filing_status);

    let itemization_beneficial = total_itemized_deductions > standard_deduction;
    let (recommended_method, additional_itemized_benefit) = if itemization_beneficial {
        (DeductionMethod::Itemized, total_itemized_deductions - standard_deduction)
    } else {
        (DeductionMethod::Standard, 0.0)
    };

    let marginal_tax_rate = tables.marginal_rate(profile.annual_income, profile.filing_status);
    let annual_tax_savings = additional_itemized_benefit * marginal_tax_rate;
    let monthly_tax_savings = annual_tax_savings / 12.0;

    let original_monthly_payment =
        calculate_monthly_payment(loan.principal, loan.interest_rate, loan.term_years)
            + loan.monthly_escrow()
            + calculate_monthly_pmi(loan.principal, &loan.pmi_config);
    let effective_monthly_payment = original_monthly_payment - monthly_tax_savings;

    debug!(
        "Tax benefit: itemized {:.2} vs standard {:.2} ({}), savings {:.2}/yr",
        total_itemized_deductions, standard_deduction, profile.filing_status, annual_tax_savings
    );

    TaxBenefitCalculation {
        loan_amount: loan.principal,
        first_year_interest,
        mortgage_interest_deduction,
        property_tax_deduction,
        total_itemized_deductions,
        standard_deduction,
        recommended_method,
        additional_itemized_benefit,
        itemization_beneficial,
        marginal_tax_rate,
        annual_tax_savings,
        monthly_tax_savings,
        original_monthly_payment,
        effective_monthly_payment,
        exceeds_750k_limit: loan.principal > QUALIFIED_DEBT_LIMIT,
        exceeds_salt_cap: profile.property_tax_annual > SALT_CAP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::PmiConfig;
    use approx::assert_abs_diff_eq;

    fn standard_loan() -> LoanInputs {
        LoanInputs {
            property_tax: Some(12_000.0),
            insurance: Some(1_200.0),
            hoa_fees: Some(0.0),
            ..LoanInputs::new(400_000.0, 6.5, 30)
        }
    }

    fn profile(income: f64, filing_status: FilingStatus, property_tax_annual: f64) -> TaxProfile {
        TaxProfile { annual_income: income, filing_status, property_tax_annual }
    }

    #[test]
    fn test_first_year_interest() {
        let thirty = calculate_first_year_interest(&LoanInputs::new(400_000.0, 6.5, 30));
        assert_abs_diff_eq!(thirty, 25_868.36, epsilon = 0.01);

        let fifteen = calculate_first_year_interest(&LoanInputs::new(300_000.0, 5.5, 15));
        assert!(fifteen > 16_000.0 && fifteen < 17_000.0);

        assert_eq!(calculate_first_year_interest(&LoanInputs::new(300_000.0, 0.0, 30)), 0.0);
    }

    #[test]
    fn test_itemized_recommended() {
        let result = calculate_tax_benefits(&standard_loan(), &profile(120_000.0, FilingStatus::MarriedJoint, 12_000.0));

        assert_eq!(result.recommended_method, DeductionMethod::Itemized);
        assert!(result.itemization_beneficial);
        assert_eq!(result.marginal_tax_rate, 0.22);
        assert_eq!(result.property_tax_deduction, 10_000.0);
        assert!(result.exceeds_salt_cap);
        assert_eq!(
            result.total_itemized_deductions,
            result.mortgage_interest_deduction + result.property_tax_deduction
        );
        assert_abs_diff_eq!(result.additional_itemized_benefit, 5_868.36, epsilon = 0.01);
        assert_abs_diff_eq!(result.annual_tax_savings, 1_291.04, epsilon = 0.01);
        assert_eq!(result.monthly_tax_savings, result.annual_tax_savings / 12.0);

        // P&I 2528.27 + 1000 tax + 100 insurance
        assert_abs_diff_eq!(result.original_monthly_payment, 3_628.27, epsilon = 0.01);
        assert_eq!(
            result.effective_monthly_payment,
            result.original_monthly_payment - result.monthly_tax_savings
        );
        assert!(result.effective_monthly_payment < result.original_monthly_payment);
    }

    #[test]
    fn test_standard_recommended() {
        let loan = LoanInputs::new(100_000.0, 3.0, 30);
        let result = calculate_tax_benefits(&loan, &profile(80_000.0, FilingStatus::MarriedJoint, 3_000.0));

        assert_eq!(result.recommended_method, DeductionMethod::Standard);
        assert!(!result.itemization_beneficial);
        assert_eq!(result.additional_itemized_benefit, 0.0);
        assert_eq!(result.annual_tax_savings, 0.0);
        assert_eq!(result.monthly_tax_savings, 0.0);
        assert_eq!(result.effective_monthly_payment, result.original_monthly_payment);
    }

    #[test]
    fn test_qualified_debt_limit_prorates_interest() {
        let loan = LoanInputs::new(800_000.0, 6.5, 30);
        let result = calculate_tax_benefits(&loan, &profile(300_000.0, FilingStatus::MarriedJoint, 15_000.0));

        assert!(result.exceeds_750k_limit);
        assert_eq!(result.loan_amount, 800_000.0);
        assert_abs_diff_eq!(
            result.mortgage_interest_deduction,
            result.first_year_interest * 750_000.0 / 800_000.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(result.mortgage_interest_deduction, 48_503.18, epsilon = 0.01);
    }

    #[test]
    fn test_limit_boundaries() {
        let at_limit = LoanInputs::new(750_000.0, 6.0, 30);
        let result = calculate_tax_benefits(&at_limit, &profile(200_000.0, FilingStatus::MarriedJoint, 10_000.0));
        assert!(!result.exceeds_750k_limit);
        assert_eq!(result.mortgage_interest_deduction, result.first_year_interest);
        assert_eq!(result.property_tax_deduction, 10_000.0);
        assert!(!result.exceeds_salt_cap);

        let no_tax = calculate_tax_benefits(
            &LoanInputs::new(300_000.0, 5.5, 30),
            &profile(100_000.0, FilingStatus::Single, 0.0),
        );
        assert_eq!(no_tax.property_tax_deduction, 0.0);
        assert!(!no_tax.exceeds_salt_cap);
    }

    #[test]
    fn test_all_filing_statuses() {
        let loan = LoanInputs::new(350_000.0, 6.0, 30);
        for status in FilingStatus::ALL {
            let result = calculate_tax_benefits(&loan, &profile(100_000.0, status, 8_000.0));
            assert!(result.standard_deduction > 0.0);
            assert!(result.marginal_tax_rate > 0.0);
            assert_eq!(result.monthly_tax_savings, result.annual_tax_savings / 12.0);
        }
    }

    #[test]
    fn test_original_payment_includes_hoa_and_pmi() {
        let loan = LoanInputs {
            hoa_fees: Some(200.0),
            pmi_config: PmiConfig::Monthly { annual_rate: 0.006 },
            ..LoanInputs::new(300_000.0, 6.0, 30)
        };
        let result = calculate_tax_benefits(&loan, &profile(90_000.0, FilingStatus::Single, 4_000.0));

        let expected = calculate_monthly_payment(300_000.0, 6.0, 30) + 200.0 + 150.0;
        assert_abs_diff_eq!(result.original_monthly_payment, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_stated_rate_ignores_discount_points() {
        let bought_down = LoanInputs {
            discount_points: Some(2.0),
            ..LoanInputs::new(300_000.0, 6.0, 30)
        };
        let result = calculate_tax_benefits(&bought_down, &profile(90_000.0, FilingStatus::Single, 4_000.0));
        assert_abs_diff_eq!(
            result.original_monthly_payment,
            calculate_monthly_payment(300_000.0, 6.0, 30),
            epsilon = 1e-9
        );
    }
}
