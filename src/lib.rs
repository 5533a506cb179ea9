//! Mortgage Engine - loan economics and mortgage tax-benefit calculations
//!
//! This library provides:
//! - Monthly payment and amortization schedule generation
//! - Financing features (discount points, closing costs, PMI, extra payments, ARM projections)
//! - Comprehensive per-loan result assembly
//! - Federal tax benefit of mortgage interest and property tax deductions (2025 tables)
//! - Input validation, flat-file loading, and batch/comparison runs

pub mod error;
pub mod loan;
pub mod amortization;
pub mod features;
pub mod results;
pub mod tax;
pub mod validation;
pub mod scenario;

// Re-export commonly used types
pub use error::{MortgageError, MortgageResult};
pub use loan::{LoanInputs, LoanType, PmiConfig, ExtraPayments, LumpSumPayment, ArmConfig, ClosingCosts};
pub use amortization::{AmortizationEntry, calculate_monthly_payment, generate_amortization_schedule};
pub use results::{LoanResults, CalculationConfig, calculate_comprehensive_loan_results};
pub use tax::{FilingStatus, TaxProfile, TaxBenefitCalculation, TaxTables, calculate_tax_benefits};
pub use validation::{LoanValidator, ValidationMessages};
pub use scenario::{ScenarioRunner, LoanComparison};
