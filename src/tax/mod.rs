//! Federal tax benefit of mortgage interest and property tax deductions

mod tables;
pub mod loader;
mod benefits;

pub use tables::{
    FilingStatus, TaxBracket, TaxTables, calculate_marginal_tax_rate, get_standard_deduction,
    QUALIFIED_DEBT_LIMIT, SALT_CAP,
};
pub use benefits::{
    TaxProfile, TaxBenefitCalculation, DeductionMethod, calculate_first_year_interest,
    calculate_tax_benefits, calculate_tax_benefits_with,
};
