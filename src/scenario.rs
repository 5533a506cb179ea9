//! Scenario runner for batch and side-by-side loan evaluation
//!
//! Holds the calculation config, tax tables, and validator once, then evaluates any
//! number of loans against them.

use std::path::Path;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::MortgageResult;
use crate::loan::LoanInputs;
use crate::results::{calculate_comprehensive_loan_results_with, CalculationConfig, LoanResults};
use crate::tax::{calculate_tax_benefits_with, TaxBenefitCalculation, TaxProfile, TaxTables};
use crate::validation::LoanValidator;

/// Pre-configured runner for many loan evaluations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let results = runner.run_batch(&loans);
/// let comparison = runner.compare(&loans[0], &loans[1])?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: CalculationConfig,
    tax_tables: TaxTables,
    validator: LoanValidator,
}

impl ScenarioRunner {
    /// Runner with today's start date and the built-in 2025 tax tables
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CalculationConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Runner using tax tables loaded from a directory of CSV files
    pub fn from_csv_path(tax_year: i32, path: &Path) -> MortgageResult<Self> {
        Ok(Self {
            tax_tables: TaxTables::from_csv_path(tax_year, path)?,
            ..Self::default()
        })
    }

    pub fn with_tax_tables(mut self, tax_tables: TaxTables) -> Self {
        self.tax_tables = tax_tables;
        self
    }

    pub fn with_validator(mut self, validator: LoanValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Full results for one loan
    pub fn run(&self, loan: &LoanInputs) -> MortgageResult<LoanResults> {
        calculate_comprehensive_loan_results_with(loan, &self.config, &self.validator)
    }

    /// Results for many loans, evaluated in parallel. Order matches the input.
    pub fn run_batch(&self, loans: &[LoanInputs]) -> Vec<MortgageResult<LoanResults>> {
        info!("Evaluating {} loans", loans.len());
        loans.par_iter().map(|loan| self.run(loan)).collect()
    }

    /// Tax benefit for a loan under this runner's tables; both inputs are validated first
    pub fn tax_benefits(&self, loan: &LoanInputs, profile: &TaxProfile) -> MortgageResult<TaxBenefitCalculation> {
        self.validator.validate_loan(loan)?;
        self.validator.validate_tax_profile(profile)?;
        Ok(calculate_tax_benefits_with(loan, profile, &self.tax_tables))
    }

    /// Evaluate two loans and compare them
    pub fn compare(&self, first: &LoanInputs, second: &LoanInputs) -> MortgageResult<LoanComparison> {
        let first = self.run(first)?;
        let second = self.run(second)?;
        Ok(LoanComparison::from_results(&first, &second))
    }

    pub fn tax_tables(&self) -> &TaxTables {
        &self.tax_tables
    }
}

/// Which side of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparedLoan {
    First,
    Second,
}

/// Side-by-side differences between two loans.
/// Every difference is second minus first, so a negative value favors the second loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanComparison {
    pub monthly_payment_difference: f64,
    pub total_interest_difference: f64,
    pub total_cost_difference: f64,
    pub cash_at_closing_difference: f64,
    /// Total cost plus net closing costs
    pub lifetime_cost_difference: f64,
    /// None when lifetime costs are equal
    pub cheaper: Option<ComparedLoan>,
}

impl LoanComparison {
    pub fn from_results(first: &LoanResults, second: &LoanResults) -> Self {
        let lifetime = |r: &LoanResults| r.total_cost + r.net_closing_costs;
        let lifetime_cost_difference = lifetime(second) - lifetime(first);

        let cheaper = if lifetime_cost_difference < 0.0 {
            Some(ComparedLoan::Second)
        } else if lifetime_cost_difference > 0.0 {
            Some(ComparedLoan::First)
        } else {
            None
        };

        Self {
            monthly_payment_difference: second.monthly_payment_total - first.monthly_payment_total,
            total_interest_difference: second.total_interest - first.total_interest,
            total_cost_difference: second.total_cost - first.total_cost,
            cash_at_closing_difference: second.cash_needed_at_closing - first.cash_needed_at_closing,
            lifetime_cost_difference,
            cheaper,
        }
    }
}
