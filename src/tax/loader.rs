//! CSV-based tax table loader
//!
//! Loads alternative bracket data from a directory containing:
//! - `tax_brackets.csv`: FilingStatus,Rate,MinIncome,MaxIncome (blank MaxIncome = top bracket)
//! - `standard_deductions.csv`: FilingStatus,Amount

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::tables::{FilingStatus, TaxBracket, TaxTables};
use crate::error::{MortgageError, MortgageResult};

/// Default path to the tax table directory
pub const DEFAULT_TAX_TABLES_PATH: &str = "data/tax";

#[derive(Debug, serde::Deserialize)]
struct BracketRow {
    #[serde(rename = "FilingStatus")]
    filing_status: String,
    #[serde(rename = "Rate")]
    rate: f64,
    #[serde(rename = "MinIncome")]
    min_income: f64,
    #[serde(rename = "MaxIncome")]
    max_income: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
struct DeductionRow {
    #[serde(rename = "FilingStatus")]
    filing_status: String,
    #[serde(rename = "Amount")]
    amount: f64,
}

/// Load brackets grouped by filing status
pub fn load_brackets<R: Read>(reader: R) -> MortgageResult<[Vec<TaxBracket>; 4]> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut brackets: [Vec<TaxBracket>; 4] = Default::default();

    for result in csv_reader.deserialize() {
        let row: BracketRow = result?;
        let status: FilingStatus = row.filing_status.parse()?;
        brackets[status.index()].push(TaxBracket {
            rate: row.rate,
            min_income: row.min_income,
            max_income: row.max_income,
        });
    }

    for (status, list) in FilingStatus::ALL.iter().zip(brackets.iter()) {
        if list.is_empty() {
            return Err(MortgageError::invalid(
                "tax_brackets.csv",
                format!("no brackets for {}", status),
            ));
        }
    }

    Ok(brackets)
}

/// Load one standard deduction per filing status
pub fn load_standard_deductions<R: Read>(reader: R) -> MortgageResult<[f64; 4]> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut deductions: [Option<f64>; 4] = [None; 4];

    for result in csv_reader.deserialize() {
        let row: DeductionRow = result?;
        let status: FilingStatus = row.filing_status.parse()?;
        deductions[status.index()] = Some(row.amount);
    }

    let mut amounts = [0.0; 4];
    for status in FilingStatus::ALL {
        amounts[status.index()] = deductions[status.index()].ok_or_else(|| {
            MortgageError::invalid(
                "standard_deductions.csv",
                format!("no standard deduction for {}", status),
            )
        })?;
    }

    Ok(amounts)
}

impl TaxTables {
    /// Load tables from CSV readers
    pub fn from_readers<B: Read, D: Read>(tax_year: i32, brackets: B, deductions: D) -> MortgageResult<Self> {
        Ok(Self::new(
            tax_year,
            load_brackets(brackets)?,
            load_standard_deductions(deductions)?,
        ))
    }

    /// Load tables from `tax_brackets.csv` and `standard_deductions.csv` in `path`
    pub fn from_csv_path(tax_year: i32, path: &Path) -> MortgageResult<Self> {
        let brackets = File::open(path.join("tax_brackets.csv"))?;
        let deductions = File::open(path.join("standard_deductions.csv"))?;
        let tables = Self::from_readers(tax_year, brackets, deductions)?;
        log::info!("Loaded {} tax tables from {}", tax_year, path.display());
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRACKETS: &str = "\
FilingStatus,Rate,MinIncome,MaxIncome
single,0.10,0,20000
single,0.30,20001,
married_joint,0.10,0,40000
married_joint,0.30,40001,
married_separate,0.15,0,
head_of_household,0.30,30001,
head_of_household,0.10,0,30000
";

    const DEDUCTIONS: &str = "\
FilingStatus,Amount
single,10000
married_joint,20000
married_separate,10000
head_of_household,15000
";

    #[test]
    fn test_load_tables_from_readers() {
        let tables = TaxTables::from_readers(2030, BRACKETS.as_bytes(), DEDUCTIONS.as_bytes())
            .expect("valid tables");

        assert_eq!(tables.tax_year, 2030);
        assert_eq!(tables.marginal_rate(20_000.0, FilingStatus::Single), 0.10);
        assert_eq!(tables.marginal_rate(20_001.0, FilingStatus::Single), 0.30);
        assert_eq!(tables.marginal_rate(1_000_000.0, FilingStatus::MarriedSeparate), 0.15);
        assert_eq!(tables.standard_deduction(FilingStatus::HeadOfHousehold), 15_000.0);

        // Out-of-order rows are sorted by lower bound
        assert_eq!(tables.brackets(FilingStatus::HeadOfHousehold)[0].rate, 0.10);
        assert_eq!(tables.marginal_rate(25_000.0, FilingStatus::HeadOfHousehold), 0.10);
    }

    #[test]
    fn test_missing_status_rejected() {
        let partial = "FilingStatus,Amount\nsingle,10000\n";
        let err = load_standard_deductions(partial.as_bytes()).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { .. }));

        let brackets = "FilingStatus,Rate,MinIncome,MaxIncome\nsingle,0.1,0,\n";
        assert!(load_brackets(brackets.as_bytes()).is_err());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let bad = "FilingStatus,Amount\nwidowed,10000\n";
        let err = load_standard_deductions(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, MortgageError::UnknownVariant { .. }));
    }

    #[test]
    fn test_shipped_tables_match_built_in() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_TAX_TABLES_PATH);
        let loaded = TaxTables::from_csv_path(2025, &dir).expect("shipped tables load");
        assert_eq!(loaded, TaxTables::tax_year_2025());
    }
}
