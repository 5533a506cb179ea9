//! Input validation for loans and tax profiles
//!
//! The engine itself assumes in-range inputs; callers run a [`LoanValidator`] first.
//! Message text comes from a [`ValidationMessages`] table so front ends can reword it
//! without touching the rules.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{MortgageError, MortgageResult};
use crate::loan::{ArmConfig, ClosingCosts, ExtraPayments, LoanInputs, PmiConfig};
use crate::tax::TaxProfile;

pub const MIN_PRINCIPAL: f64 = 1_000.0;
pub const MAX_PRINCIPAL: f64 = 10_000_000.0;
pub const MIN_INTEREST_RATE: f64 = 0.01;
pub const MAX_INTEREST_RATE: f64 = 20.0;
pub const MIN_TERM_YEARS: u32 = 1;
pub const MAX_TERM_YEARS: u32 = 50;
pub const MAX_DISCOUNT_POINTS: f64 = 4.0;
pub const MAX_ORIGINATION_POINTS: f64 = 3.0;
/// Annual PMI rate bounds as decimals
pub const MIN_PMI_RATE: f64 = 0.003;
pub const MAX_PMI_RATE: f64 = 0.015;
pub const MAX_LUMP_SUMS: usize = 10;
pub const MAX_ARM_CAP: f64 = 10.0;
pub const ARM_FIXED_PERIODS: [u32; 4] = [3, 5, 7, 10];
pub const MAX_ANNUAL_INCOME: f64 = 10_000_000.0;

/// A single validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    NotANumber,
    NonNegative,
    PrincipalMin,
    PrincipalMax,
    InterestRateMin,
    InterestRateMax,
    TermMin,
    TermMax,
    PropertyPricePositive,
    DownPaymentPercentMax,
    DiscountPointsMax,
    OriginationPointsMax,
    PmiRateMin,
    PmiRateMax,
    SinglePremiumPositive,
    LumpSumAmountPositive,
    LumpSumMonthMin,
    LumpSumCountMax,
    ExtraAnnualMonthRange,
    ExtraAnnualMonthRequired,
    ArmFixedPeriod,
    ArmCapMax,
    ArmConfigRequired,
    IncomePositive,
    IncomeMax,
}

/// Message text per rule. `{label}` in a template is replaced by the field's display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessages {
    messages: HashMap<Rule, String>,
}

impl ValidationMessages {
    /// Replace the text for one rule
    pub fn with_message(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.messages.insert(rule, message.into());
        self
    }

    /// Render the message for a rule against a field label
    pub fn render(&self, rule: Rule, label: &str) -> String {
        match self.messages.get(&rule) {
            Some(template) => template.replace("{label}", label),
            None => "Invalid input".to_string(),
        }
    }
}

impl Default for ValidationMessages {
    fn default() -> Self {
        let messages = [
            (Rule::NotANumber, "{label} must be a number"),
            (Rule::NonNegative, "{label} cannot be negative"),
            (Rule::PrincipalMin, "Principal must be at least $1,000"),
            (Rule::PrincipalMax, "Principal cannot exceed $10,000,000"),
            (Rule::InterestRateMin, "Interest rate must be at least 0.01%"),
            (Rule::InterestRateMax, "Interest rate cannot exceed 20%"),
            (Rule::TermMin, "Loan term must be at least 1 year"),
            (Rule::TermMax, "Loan term cannot exceed 50 years"),
            (Rule::PropertyPricePositive, "Property price must be positive"),
            (Rule::DownPaymentPercentMax, "Down payment percent cannot exceed 100%"),
            (Rule::DiscountPointsMax, "Discount points typically don't exceed 4"),
            (Rule::OriginationPointsMax, "Origination points typically don't exceed 3"),
            (Rule::PmiRateMin, "PMI rate must be at least 0.3%"),
            (Rule::PmiRateMax, "PMI rate cannot exceed 1.5%"),
            (Rule::SinglePremiumPositive, "Single premium amount must be positive"),
            (Rule::LumpSumAmountPositive, "Lump sum amount must be positive"),
            (Rule::LumpSumMonthMin, "Payment month must be at least 1"),
            (Rule::LumpSumCountMax, "Maximum 10 lump sum payments allowed"),
            (Rule::ExtraAnnualMonthRange, "Month must be 1-12"),
            (
                Rule::ExtraAnnualMonthRequired,
                "Extra annual month is required when extra annual payment is specified",
            ),
            (Rule::ArmFixedPeriod, "Initial fixed period must be 3, 5, 7, or 10 years"),
            (Rule::ArmCapMax, "{label} cannot exceed 10%"),
            (Rule::ArmConfigRequired, "ARM configuration is required when loan type is ARM"),
            (Rule::IncomePositive, "Income must be positive"),
            (Rule::IncomeMax, "Income must be reasonable"),
        ];

        Self {
            messages: messages
                .into_iter()
                .map(|(rule, text)| (rule, text.to_string()))
                .collect(),
        }
    }
}

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Field path, e.g. `extra_payments.lump_sums[2].amount`
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

impl From<ValidationIssue> for MortgageError {
    fn from(issue: ValidationIssue) -> Self {
        match issue.rule {
            Rule::ArmConfigRequired => MortgageError::MissingArmConfig,
            _ => MortgageError::invalid(issue.field, issue.message),
        }
    }
}

/// Collects issues for one record
struct IssueCollector<'a> {
    messages: &'a ValidationMessages,
    issues: Vec<ValidationIssue>,
}

impl<'a> IssueCollector<'a> {
    fn new(messages: &'a ValidationMessages) -> Self {
        Self { messages, issues: Vec::new() }
    }

    fn push(&mut self, field: impl Into<String>, label: &str, rule: Rule) {
        self.issues.push(ValidationIssue {
            field: field.into(),
            rule,
            message: self.messages.render(rule, label),
        });
    }

    /// Returns false (after recording) when the value is not finite
    fn finite(&mut self, field: &str, label: &str, value: f64) -> bool {
        if value.is_finite() {
            true
        } else {
            self.push(field, label, Rule::NotANumber);
            false
        }
    }

    fn non_negative(&mut self, field: &str, label: &str, value: Option<f64>) {
        if let Some(value) = value {
            if self.finite(field, label, value) && value < 0.0 {
                self.push(field, label, Rule::NonNegative);
            }
        }
    }

    fn at_most(&mut self, field: &str, label: &str, value: Option<f64>, max: f64, rule: Rule) {
        if let Some(value) = value {
            if self.finite(field, label, value) {
                if value < 0.0 {
                    self.push(field, label, Rule::NonNegative);
                } else if value > max {
                    self.push(field, label, rule);
                }
            }
        }
    }
}

/// Validates loans and tax profiles against the supported input ranges
#[derive(Debug, Clone, Default)]
pub struct LoanValidator {
    messages: ValidationMessages,
}

impl LoanValidator {
    pub fn new(messages: ValidationMessages) -> Self {
        Self { messages }
    }

    /// Every rule a loan breaks, in field order
    pub fn loan_issues(&self, loan: &LoanInputs) -> Vec<ValidationIssue> {
        let mut c = IssueCollector::new(&self.messages);

        if c.finite("principal", "Principal", loan.principal) {
            if loan.principal < MIN_PRINCIPAL {
                c.push("principal", "Principal", Rule::PrincipalMin);
            } else if loan.principal > MAX_PRINCIPAL {
                c.push("principal", "Principal", Rule::PrincipalMax);
            }
        }

        if c.finite("interest_rate", "Interest rate", loan.interest_rate) {
            if loan.interest_rate < MIN_INTEREST_RATE {
                c.push("interest_rate", "Interest rate", Rule::InterestRateMin);
            } else if loan.interest_rate > MAX_INTEREST_RATE {
                c.push("interest_rate", "Interest rate", Rule::InterestRateMax);
            }
        }

        if loan.term_years < MIN_TERM_YEARS {
            c.push("term_years", "Loan term", Rule::TermMin);
        } else if loan.term_years > MAX_TERM_YEARS {
            c.push("term_years", "Loan term", Rule::TermMax);
        }

        c.non_negative("property_tax", "Property tax", loan.property_tax);
        c.non_negative("insurance", "Insurance", loan.insurance);
        c.non_negative("hoa_fees", "HOA fees", loan.hoa_fees);

        if let Some(price) = loan.property_price {
            if c.finite("property_price", "Property price", price) && price <= 0.0 {
                c.push("property_price", "Property price", Rule::PropertyPricePositive);
            }
        }

        c.at_most(
            "down_payment_percent",
            "Down payment percent",
            loan.down_payment_percent,
            100.0,
            Rule::DownPaymentPercentMax,
        );
        c.non_negative("down_payment_dollar", "Down payment", loan.down_payment_dollar);
        c.at_most(
            "discount_points",
            "Discount points",
            loan.discount_points,
            MAX_DISCOUNT_POINTS,
            Rule::DiscountPointsMax,
        );
        c.at_most(
            "origination_points",
            "Origination points",
            loan.origination_points,
            MAX_ORIGINATION_POINTS,
            Rule::OriginationPointsMax,
        );
        c.non_negative("lender_credits", "Lender credits", loan.lender_credits);
        c.non_negative("seller_concessions", "Seller concessions", loan.seller_concessions);

        check_closing_costs(&mut c, &loan.closing_costs);
        check_pmi(&mut c, &loan.pmi_config);
        check_extra_payments(&mut c, &loan.extra_payments);

        match (&loan.arm_config, loan.is_arm()) {
            (Some(arm), _) => check_arm(&mut c, arm),
            (None, true) => c.push("arm_config", "ARM configuration", Rule::ArmConfigRequired),
            (None, false) => {}
        }

        c.issues
    }

    /// Every rule a tax profile breaks
    pub fn tax_profile_issues(&self, profile: &TaxProfile) -> Vec<ValidationIssue> {
        let mut c = IssueCollector::new(&self.messages);

        if c.finite("annual_income", "Income", profile.annual_income) {
            if profile.annual_income <= 0.0 {
                c.push("annual_income", "Income", Rule::IncomePositive);
            } else if profile.annual_income > MAX_ANNUAL_INCOME {
                c.push("annual_income", "Income", Rule::IncomeMax);
            }
        }
        c.non_negative("property_tax_annual", "Property tax", Some(profile.property_tax_annual));

        c.issues
    }

    /// Fail with the first issue, if any
    pub fn validate_loan(&self, loan: &LoanInputs) -> MortgageResult<()> {
        first_issue(self.loan_issues(loan))
    }

    pub fn validate_tax_profile(&self, profile: &TaxProfile) -> MortgageResult<()> {
        first_issue(self.tax_profile_issues(profile))
    }
}

fn first_issue(issues: Vec<ValidationIssue>) -> MortgageResult<()> {
    match issues.into_iter().next() {
        Some(issue) => {
            warn!("Rejected input: {}: {}", issue.field, issue.message);
            Err(issue.into())
        }
        None => Ok(()),
    }
}

fn check_closing_costs(c: &mut IssueCollector<'_>, costs: &ClosingCosts) {
    for (name, value) in costs.line_items() {
        let field = format!("closing_costs.{}", name);
        c.non_negative(&field, &closing_cost_label(name), value);
    }
}

/// "title_search_fee" -> "Title search fee"
fn closing_cost_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

fn check_pmi(c: &mut IssueCollector<'_>, pmi: &PmiConfig) {
    match pmi {
        PmiConfig::Monthly { annual_rate } => {
            if c.finite("pmi_config.annual_rate", "PMI rate", *annual_rate) {
                if *annual_rate < MIN_PMI_RATE {
                    c.push("pmi_config.annual_rate", "PMI rate", Rule::PmiRateMin);
                } else if *annual_rate > MAX_PMI_RATE {
                    c.push("pmi_config.annual_rate", "PMI rate", Rule::PmiRateMax);
                }
            }
        }
        PmiConfig::SinglePremium { amount } => {
            if c.finite("pmi_config.amount", "Single premium", *amount) && *amount <= 0.0 {
                c.push("pmi_config.amount", "Single premium", Rule::SinglePremiumPositive);
            }
        }
        PmiConfig::LenderPaid | PmiConfig::NotRequired => {}
    }
}

fn check_extra_payments(c: &mut IssueCollector<'_>, extra: &ExtraPayments) {
    c.non_negative("extra_payments.extra_monthly", "Extra monthly payment", extra.extra_monthly);
    c.non_negative("extra_payments.extra_annual", "Extra annual payment", extra.extra_annual);

    match extra.extra_annual_month {
        Some(month) if !(1..=12).contains(&month) => {
            c.push("extra_payments.extra_annual_month", "Month", Rule::ExtraAnnualMonthRange);
        }
        None if extra.extra_annual.unwrap_or(0.0) > 0.0 => {
            c.push("extra_payments.extra_annual_month", "Month", Rule::ExtraAnnualMonthRequired);
        }
        _ => {}
    }

    if extra.lump_sums.len() > MAX_LUMP_SUMS {
        c.push("extra_payments.lump_sums", "Lump sums", Rule::LumpSumCountMax);
    }
    for (i, lump) in extra.lump_sums.iter().enumerate() {
        let amount_field = format!("extra_payments.lump_sums[{}].amount", i);
        if c.finite(&amount_field, "Lump sum amount", lump.amount) && lump.amount <= 0.0 {
            c.push(amount_field, "Lump sum amount", Rule::LumpSumAmountPositive);
        }
        if lump.payment_month < 1 {
            c.push(
                format!("extra_payments.lump_sums[{}].payment_month", i),
                "Payment month",
                Rule::LumpSumMonthMin,
            );
        }
    }
}

fn check_arm(c: &mut IssueCollector<'_>, arm: &ArmConfig) {
    if !ARM_FIXED_PERIODS.contains(&arm.initial_fixed_period_years) {
        c.push("arm_config.initial_fixed_period_years", "Initial fixed period", Rule::ArmFixedPeriod);
    }
    let caps = [
        ("arm_config.initial_cap", "Initial cap", arm.initial_cap),
        ("arm_config.periodic_cap", "Periodic cap", arm.periodic_cap),
        ("arm_config.lifetime_cap", "Lifetime cap", arm.lifetime_cap),
    ];
    for (field, label, value) in caps {
        c.at_most(field, label, Some(value), MAX_ARM_CAP, Rule::ArmCapMax);
    }
}

/// Validate a loan with the default message table
pub fn validate_loan_inputs(loan: &LoanInputs) -> MortgageResult<()> {
    LoanValidator::default().validate_loan(loan)
}

/// Validate a tax profile with the default message table
pub fn validate_tax_profile(profile: &TaxProfile) -> MortgageResult<()> {
    LoanValidator::default().validate_tax_profile(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{LoanType, LumpSumPayment};
    use crate::tax::FilingStatus;

    fn rules(loan: &LoanInputs) -> Vec<Rule> {
        LoanValidator::default()
            .loan_issues(loan)
            .into_iter()
            .map(|issue| issue.rule)
            .collect()
    }

    #[test]
    fn test_valid_loan_passes() {
        let loan = LoanInputs {
            property_tax: Some(6_000.0),
            insurance: Some(1_200.0),
            property_price: Some(500_000.0),
            discount_points: Some(4.0),
            origination_points: Some(3.0),
            pmi_config: PmiConfig::Monthly { annual_rate: 0.005 },
            ..LoanInputs::new(400_000.0, 6.5, 30)
        };
        assert!(validate_loan_inputs(&loan).is_ok());
        assert!(validate_loan_inputs(&LoanInputs::new(1_000.0, 0.01, 1)).is_ok());
        assert!(validate_loan_inputs(&LoanInputs::new(10_000_000.0, 20.0, 50)).is_ok());
    }

    #[test]
    fn test_core_ranges() {
        assert_eq!(rules(&LoanInputs::new(999.0, 6.0, 30)), vec![Rule::PrincipalMin]);
        assert_eq!(rules(&LoanInputs::new(10_000_001.0, 6.0, 30)), vec![Rule::PrincipalMax]);
        assert_eq!(rules(&LoanInputs::new(200_000.0, 0.0, 30)), vec![Rule::InterestRateMin]);
        assert_eq!(rules(&LoanInputs::new(200_000.0, 20.5, 30)), vec![Rule::InterestRateMax]);
        assert_eq!(rules(&LoanInputs::new(200_000.0, 6.0, 0)), vec![Rule::TermMin]);
        assert_eq!(rules(&LoanInputs::new(200_000.0, 6.0, 51)), vec![Rule::TermMax]);
        assert_eq!(rules(&LoanInputs::new(f64::NAN, 6.0, 30)), vec![Rule::NotANumber]);
    }

    #[test]
    fn test_error_names_field_and_bound() {
        let err = validate_loan_inputs(&LoanInputs::new(500.0, 6.0, 30)).unwrap_err();
        match err {
            MortgageError::InvalidInput { field, reason } => {
                assert_eq!(field, "principal");
                assert_eq!(reason, "Principal must be at least $1,000");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_optional_fields() {
        let loan = LoanInputs {
            property_tax: Some(-1.0),
            property_price: Some(0.0),
            down_payment_percent: Some(101.0),
            discount_points: Some(4.5),
            origination_points: Some(-0.5),
            ..LoanInputs::new(200_000.0, 6.0, 30)
        };
        assert_eq!(
            rules(&loan),
            vec![
                Rule::NonNegative,
                Rule::PropertyPricePositive,
                Rule::DownPaymentPercentMax,
                Rule::DiscountPointsMax,
                Rule::NonNegative,
            ]
        );
    }

    #[test]
    fn test_closing_cost_messages() {
        let mut loan = LoanInputs::new(200_000.0, 6.0, 30);
        loan.closing_costs.title_search_fee = Some(-50.0);
        let issues = LoanValidator::default().loan_issues(&loan);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "closing_costs.title_search_fee");
        assert_eq!(issues[0].message, "Title search fee cannot be negative");
    }

    #[test]
    fn test_pmi_rules() {
        let mut loan = LoanInputs::new(200_000.0, 6.0, 30);
        loan.pmi_config = PmiConfig::Monthly { annual_rate: 0.002 };
        assert_eq!(rules(&loan), vec![Rule::PmiRateMin]);
        loan.pmi_config = PmiConfig::Monthly { annual_rate: 0.02 };
        assert_eq!(rules(&loan), vec![Rule::PmiRateMax]);
        loan.pmi_config = PmiConfig::SinglePremium { amount: 0.0 };
        assert_eq!(rules(&loan), vec![Rule::SinglePremiumPositive]);
        loan.pmi_config = PmiConfig::LenderPaid;
        assert!(rules(&loan).is_empty());
    }

    #[test]
    fn test_extra_payment_rules() {
        let mut loan = LoanInputs::new(200_000.0, 6.0, 30);
        loan.extra_payments.extra_annual = Some(5_000.0);
        assert_eq!(rules(&loan), vec![Rule::ExtraAnnualMonthRequired]);

        loan.extra_payments.extra_annual_month = Some(13);
        assert_eq!(rules(&loan), vec![Rule::ExtraAnnualMonthRange]);

        loan.extra_payments.extra_annual_month = Some(12);
        loan.extra_payments.lump_sums = vec![LumpSumPayment { amount: 1_000.0, payment_month: 12 }; 11];
        assert_eq!(rules(&loan), vec![Rule::LumpSumCountMax]);

        loan.extra_payments.lump_sums = vec![
            LumpSumPayment { amount: -5.0, payment_month: 12 },
            LumpSumPayment { amount: 5_000.0, payment_month: 0 },
        ];
        let issues = LoanValidator::default().loan_issues(&loan);
        assert_eq!(issues[0].field, "extra_payments.lump_sums[0].amount");
        assert_eq!(issues[1].field, "extra_payments.lump_sums[1].payment_month");
    }

    #[test]
    fn test_arm_rules() {
        let mut loan = LoanInputs::new(300_000.0, 5.0, 30);
        loan.loan_type = LoanType::Arm;
        assert!(matches!(validate_loan_inputs(&loan), Err(MortgageError::MissingArmConfig)));

        loan.arm_config = Some(ArmConfig::new(4, 2.0, 11.0, 5.0));
        assert_eq!(rules(&loan), vec![Rule::ArmFixedPeriod, Rule::ArmCapMax]);

        loan.arm_config = Some(ArmConfig::new(5, 2.0, 2.0, 5.0));
        assert!(validate_loan_inputs(&loan).is_ok());
    }

    #[test]
    fn test_tax_profile_rules() {
        let ok = TaxProfile {
            annual_income: 120_000.0,
            filing_status: FilingStatus::Single,
            property_tax_annual: 0.0,
        };
        assert!(validate_tax_profile(&ok).is_ok());

        let zero_income = TaxProfile { annual_income: 0.0, ..ok };
        assert!(validate_tax_profile(&zero_income).is_err());

        let huge = TaxProfile { annual_income: 10_000_001.0, ..ok };
        let negative_tax = TaxProfile { property_tax_annual: -1.0, ..ok };
        let validator = LoanValidator::default();
        assert_eq!(validator.tax_profile_issues(&huge)[0].rule, Rule::IncomeMax);
        assert_eq!(validator.tax_profile_issues(&negative_tax)[0].rule, Rule::NonNegative);
    }

    #[test]
    fn test_custom_messages() {
        let messages = ValidationMessages::default()
            .with_message(Rule::PrincipalMin, "Loan amount too small");
        let validator = LoanValidator::new(messages);
        let issues = validator.loan_issues(&LoanInputs::new(10.0, 6.0, 30));
        assert_eq!(issues[0].message, "Loan amount too small");
    }
}
