//! Loan input structures and loan file loading

mod data;
pub mod loader;

pub use data::{
    LoanInputs, LoanType, ClosingCosts, PmiConfig, ExtraPayments, LumpSumPayment,
    ArmConfig, AdjustmentFrequency,
};
pub use loader::{load_loans, load_loans_from_reader, load_loan_json, load_loan_json_from_reader};
