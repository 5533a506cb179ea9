//! Bracket and standard deduction tables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::MortgageError;

/// Qualified residence debt limit (post-TCJA)
pub const QUALIFIED_DEBT_LIMIT: f64 = 750_000.0;

/// State and local tax deduction cap
pub const SALT_CAP: f64 = 10_000.0;

/// Federal filing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        FilingStatus::Single,
        FilingStatus::MarriedJoint,
        FilingStatus::MarriedSeparate,
        FilingStatus::HeadOfHousehold,
    ];

    /// Slot of this status in per-status tables
    pub(crate) fn index(self) -> usize {
        match self {
            FilingStatus::Single => 0,
            FilingStatus::MarriedJoint => 1,
            FilingStatus::MarriedSeparate => 2,
            FilingStatus::HeadOfHousehold => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedJoint => "married_joint",
            FilingStatus::MarriedSeparate => "married_separate",
            FilingStatus::HeadOfHousehold => "head_of_household",
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilingStatus {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| MortgageError::UnknownVariant {
                kind: "FilingStatus".to_string(),
                value: s.to_string(),
            })
    }
}

/// One marginal bracket; both bounds inclusive, as published
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Rate as a decimal (0.22 = 22%)
    pub rate: f64,
    pub min_income: f64,
    /// None for the top bracket
    pub max_income: Option<f64>,
}

impl TaxBracket {
    const fn new(rate: f64, min_income: f64, max_income: Option<f64>) -> Self {
        Self { rate, min_income, max_income }
    }
}

/// Brackets and standard deductions for every filing status
#[derive(Debug, Clone, PartialEq)]
pub struct TaxTables {
    pub tax_year: i32,
    /// Indexed by filing status, each sorted by `min_income`
    brackets: [Vec<TaxBracket>; 4],
    standard_deductions: [f64; 4],
}

impl TaxTables {
    /// Build tables from per-status data. Brackets are sorted by lower bound.
    pub fn new(
        tax_year: i32,
        mut brackets: [Vec<TaxBracket>; 4],
        standard_deductions: [f64; 4],
    ) -> Self {
        for list in brackets.iter_mut() {
            list.sort_by(|a, b| a.min_income.total_cmp(&b.min_income));
        }
        Self { tax_year, brackets, standard_deductions }
    }

    /// 2025 federal brackets and standard deductions
    pub fn tax_year_2025() -> Self {
        let single = vec![
            TaxBracket::new(0.10, 0.0, Some(11_600.0)),
            TaxBracket::new(0.12, 11_601.0, Some(47_150.0)),
            TaxBracket::new(0.22, 47_151.0, Some(100_525.0)),
            TaxBracket::new(0.24, 100_526.0, Some(191_950.0)),
            TaxBracket::new(0.32, 191_951.0, Some(243_725.0)),
            TaxBracket::new(0.35, 243_726.0, Some(609_350.0)),
            TaxBracket::new(0.37, 609_351.0, None),
        ];
        let married_joint = vec![
            TaxBracket::new(0.10, 0.0, Some(23_200.0)),
            TaxBracket::new(0.12, 23_201.0, Some(94_300.0)),
            TaxBracket::new(0.22, 94_301.0, Some(201_050.0)),
            TaxBracket::new(0.24, 201_051.0, Some(383_900.0)),
            TaxBracket::new(0.32, 383_901.0, Some(487_450.0)),
            TaxBracket::new(0.35, 487_451.0, Some(731_200.0)),
            TaxBracket::new(0.37, 731_201.0, None),
        ];
        let married_separate = vec![
            TaxBracket::new(0.10, 0.0, Some(11_600.0)),
            TaxBracket::new(0.12, 11_601.0, Some(47_150.0)),
            TaxBracket::new(0.22, 47_151.0, Some(100_525.0)),
            TaxBracket::new(0.24, 100_526.0, Some(191_950.0)),
            TaxBracket::new(0.32, 191_951.0, Some(243_725.0)),
            TaxBracket::new(0.35, 243_726.0, Some(365_600.0)),
            TaxBracket::new(0.37, 365_601.0, None),
        ];
        let head_of_household = vec![
            TaxBracket::new(0.10, 0.0, Some(16_550.0)),
            TaxBracket::new(0.12, 16_551.0, Some(63_100.0)),
            TaxBracket::new(0.22, 63_101.0, Some(100_500.0)),
            TaxBracket::new(0.24, 100_501.0, Some(191_950.0)),
            TaxBracket::new(0.32, 191_951.0, Some(243_700.0)),
            TaxBracket::new(0.35, 243_701.0, Some(609_350.0)),
            TaxBracket::new(0.37, 609_351.0, None),
        ];

        Self::new(
            2025,
            [single, married_joint, married_separate, head_of_household],
            [15_000.0, 30_000.0, 15_000.0, 22_500.0],
        )
    }

    pub fn brackets(&self, filing_status: FilingStatus) -> &[TaxBracket] {
        &self.brackets[filing_status.index()]
    }

    /// Marginal rate for `income`: the first bracket whose ceiling is at or above it.
    /// Incomes between two published integer bounds fall into the upper bracket.
    pub fn marginal_rate(&self, income: f64, filing_status: FilingStatus) -> f64 {
        let brackets = self.brackets(filing_status);
        brackets
            .iter()
            .find(|bracket| bracket.max_income.map_or(true, |max| income <= max))
            .or(brackets.last())
            .map_or(0.0, |bracket| bracket.rate)
    }

    pub fn standard_deduction(&self, filing_status: FilingStatus) -> f64 {
        self.standard_deductions[filing_status.index()]
    }
}

impl Default for TaxTables {
    fn default() -> Self {
        Self::tax_year_2025()
    }
}

/// Marginal rate under the 2025 tables
pub fn calculate_marginal_tax_rate(income: f64, filing_status: FilingStatus) -> f64 {
    TaxTables::tax_year_2025().marginal_rate(income, filing_status)
}

/// Standard deduction under the 2025 tables
pub fn get_standard_deduction(filing_status: FilingStatus) -> f64 {
    TaxTables::tax_year_2025().standard_deduction(filing_status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_boundaries_single() {
        assert_eq!(calculate_marginal_tax_rate(47_150.0, FilingStatus::Single), 0.12);
        assert_eq!(calculate_marginal_tax_rate(47_151.0, FilingStatus::Single), 0.22);
        assert_eq!(calculate_marginal_tax_rate(11_600.0, FilingStatus::Single), 0.10);
        assert_eq!(calculate_marginal_tax_rate(11_601.0, FilingStatus::Single), 0.12);
    }

    #[test]
    fn test_rates_by_status() {
        assert_eq!(calculate_marginal_tax_rate(80_000.0, FilingStatus::Single), 0.22);
        assert_eq!(calculate_marginal_tax_rate(80_000.0, FilingStatus::MarriedJoint), 0.12);
        assert_eq!(calculate_marginal_tax_rate(120_000.0, FilingStatus::MarriedJoint), 0.22);
        assert_eq!(calculate_marginal_tax_rate(150_000.0, FilingStatus::HeadOfHousehold), 0.24);
        assert_eq!(calculate_marginal_tax_rate(400_000.0, FilingStatus::MarriedSeparate), 0.37);
        assert_eq!(calculate_marginal_tax_rate(5_000.0, FilingStatus::Single), 0.10);
    }

    #[test]
    fn test_top_bracket_open_ended() {
        assert_eq!(calculate_marginal_tax_rate(609_351.0, FilingStatus::Single), 0.37);
        assert_eq!(calculate_marginal_tax_rate(5_000_000.0, FilingStatus::MarriedJoint), 0.37);
    }

    #[test]
    fn test_fractional_income_between_bounds() {
        assert_eq!(calculate_marginal_tax_rate(47_150.5, FilingStatus::Single), 0.22);
    }

    #[test]
    fn test_standard_deductions() {
        assert_eq!(get_standard_deduction(FilingStatus::Single), 15_000.0);
        assert_eq!(get_standard_deduction(FilingStatus::MarriedJoint), 30_000.0);
        assert_eq!(get_standard_deduction(FilingStatus::MarriedSeparate), 15_000.0);
        assert_eq!(get_standard_deduction(FilingStatus::HeadOfHousehold), 22_500.0);
    }

    #[test]
    fn test_brackets_are_contiguous() {
        let tables = TaxTables::tax_year_2025();
        for status in FilingStatus::ALL {
            let brackets = tables.brackets(status);
            assert_eq!(brackets[0].min_income, 0.0);
            assert!(brackets.last().unwrap().max_income.is_none());
            for pair in brackets.windows(2) {
                assert_eq!(pair[0].max_income, Some(pair[1].min_income - 1.0));
                assert!(pair[1].rate > pair[0].rate);
            }
        }
    }

    #[test]
    fn test_filing_status_parse() {
        assert_eq!("married_joint".parse::<FilingStatus>().unwrap(), FilingStatus::MarriedJoint);
        assert_eq!(FilingStatus::HeadOfHousehold.to_string(), "head_of_household");
        assert!("joint".parse::<FilingStatus>().is_err());
    }
}
