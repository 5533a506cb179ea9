//! Loan configuration records supplied to the calculation engine

use serde::{Deserialize, Serialize};

/// Rate structure of the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    /// Rate fixed for the full term
    #[default]
    Fixed,
    /// Adjustable rate after an initial fixed period
    Arm,
}

/// Itemized closing cost line items, all optional USD amounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosingCosts {
    pub appraisal_fee: Option<f64>,
    pub title_insurance: Option<f64>,
    pub title_search_fee: Option<f64>,
    pub recording_fees: Option<f64>,
    pub attorney_fees: Option<f64>,
    pub transfer_tax: Option<f64>,
    pub survey_fee: Option<f64>,
    pub prepaid_escrow: Option<f64>,
    pub other_closing_costs: Option<f64>,
    pub buyer_agent_commission: Option<f64>,
}

impl ClosingCosts {
    /// Named line items in display order
    pub fn line_items(&self) -> [(&'static str, Option<f64>); 10] {
        [
            ("appraisal_fee", self.appraisal_fee),
            ("title_insurance", self.title_insurance),
            ("title_search_fee", self.title_search_fee),
            ("recording_fees", self.recording_fees),
            ("attorney_fees", self.attorney_fees),
            ("transfer_tax", self.transfer_tax),
            ("survey_fee", self.survey_fee),
            ("prepaid_escrow", self.prepaid_escrow),
            ("other_closing_costs", self.other_closing_costs),
            ("buyer_agent_commission", self.buyer_agent_commission),
        ]
    }

    /// Sum of all line items that are present
    pub fn total(&self) -> f64 {
        self.line_items().iter().filter_map(|(_, amount)| *amount).sum()
    }
}

/// Private mortgage insurance arrangement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PmiConfig {
    /// Borrower-paid monthly premium; `annual_rate` is a decimal of the loan amount per year
    /// (0.005 = 0.5%)
    Monthly { annual_rate: f64 },
    /// One-time premium paid at closing
    SinglePremium { amount: f64 },
    /// Lender pays PMI, usually priced into the rate
    LenderPaid,
    /// No PMI
    #[default]
    #[serde(rename = "none")]
    NotRequired,
}

impl PmiConfig {
    pub fn is_monthly(&self) -> bool {
        matches!(self, PmiConfig::Monthly { .. })
    }
}

/// One-time extra principal payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LumpSumPayment {
    pub amount: f64,
    /// Payment number (1-indexed) the lump sum is applied with
    pub payment_month: u32,
}

/// Prepayment plan applied on top of the scheduled payment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraPayments {
    /// Added to every payment
    pub extra_monthly: Option<f64>,

    /// Added once per year
    pub extra_annual: Option<f64>,

    /// Calendar month (1-12) in which `extra_annual` is paid
    pub extra_annual_month: Option<u32>,

    /// At most 10 one-time payments
    pub lump_sums: Vec<LumpSumPayment>,

    /// Biweekly schedule, modeled as one extra monthly payment per year
    pub biweekly_enabled: bool,
}

impl ExtraPayments {
    /// True when any prepayment would change the schedule
    pub fn has_any(&self) -> bool {
        self.extra_monthly.unwrap_or(0.0) > 0.0
            || (self.extra_annual.unwrap_or(0.0) > 0.0 && self.extra_annual_month.is_some())
            || self.lump_sums.iter().any(|l| l.amount > 0.0)
            || self.biweekly_enabled
    }
}

/// How often an ARM may reset after the initial fixed period.
/// Recorded with the loan terms; worst-case projections step annually for either value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdjustmentFrequency {
    #[default]
    #[serde(rename = "annual")]
    Annual,
    /// Projected with the same annual steps as `Annual`
    #[serde(rename = "semi-annual")]
    SemiAnnual,
}

/// Adjustable-rate terms; caps are percentage points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmConfig {
    /// 3, 5, 7 or 10
    pub initial_fixed_period_years: u32,
    #[serde(default)]
    pub adjustment_frequency: AdjustmentFrequency,
    pub initial_cap: f64,
    pub periodic_cap: f64,
    pub lifetime_cap: f64,
}

impl ArmConfig {
    /// Annual-adjusting ARM with the given fixed period and caps
    pub fn new(initial_fixed_period_years: u32, initial_cap: f64, periodic_cap: f64, lifetime_cap: f64) -> Self {
        Self {
            initial_fixed_period_years,
            adjustment_frequency: AdjustmentFrequency::Annual,
            initial_cap,
            periodic_cap,
            lifetime_cap,
        }
    }

    /// Absolute rate ceiling over the life of the loan
    pub fn max_rate(&self, initial_rate: f64) -> f64 {
        initial_rate + self.lifetime_cap
    }
}

/// Complete configuration of a single loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    /// Loan amount in USD
    pub principal: f64,

    /// Annual interest rate in percent (6.5 = 6.5%)
    pub interest_rate: f64,

    /// Loan term in whole years
    pub term_years: u32,

    /// Annual property tax
    #[serde(default)]
    pub property_tax: Option<f64>,

    /// Annual homeowner's insurance
    #[serde(default)]
    pub insurance: Option<f64>,

    /// Monthly HOA dues
    #[serde(default)]
    pub hoa_fees: Option<f64>,

    #[serde(default)]
    pub property_price: Option<f64>,

    #[serde(default)]
    pub down_payment_percent: Option<f64>,

    #[serde(default)]
    pub down_payment_dollar: Option<f64>,

    /// Each point costs 1% of the loan and lowers the rate by 0.25%
    #[serde(default)]
    pub discount_points: Option<f64>,

    /// Each point costs 1% of the loan
    #[serde(default)]
    pub origination_points: Option<f64>,

    #[serde(default)]
    pub lender_credits: Option<f64>,

    #[serde(default)]
    pub seller_concessions: Option<f64>,

    #[serde(default)]
    pub closing_costs: ClosingCosts,

    #[serde(default)]
    pub pmi_config: PmiConfig,

    #[serde(default)]
    pub extra_payments: ExtraPayments,

    #[serde(default)]
    pub loan_type: LoanType,

    #[serde(default)]
    pub arm_config: Option<ArmConfig>,
}

impl LoanInputs {
    /// Create a plain fixed-rate loan with no add-ons
    pub fn new(principal: f64, interest_rate: f64, term_years: u32) -> Self {
        Self {
            principal,
            interest_rate,
            term_years,
            property_tax: None,
            insurance: None,
            hoa_fees: None,
            property_price: None,
            down_payment_percent: None,
            down_payment_dollar: None,
            discount_points: None,
            origination_points: None,
            lender_credits: None,
            seller_concessions: None,
            closing_costs: ClosingCosts::default(),
            pmi_config: PmiConfig::default(),
            extra_payments: ExtraPayments::default(),
            loan_type: LoanType::Fixed,
            arm_config: None,
        }
    }

    /// Create an adjustable-rate loan
    pub fn arm(principal: f64, interest_rate: f64, term_years: u32, arm_config: ArmConfig) -> Self {
        Self {
            loan_type: LoanType::Arm,
            arm_config: Some(arm_config),
            ..Self::new(principal, interest_rate, term_years)
        }
    }

    /// Total number of scheduled payments
    pub fn term_months(&self) -> u32 {
        self.term_years * 12
    }

    /// Monthly escrow add-ons: property tax and insurance (annual) plus HOA (monthly)
    pub fn monthly_escrow(&self) -> f64 {
        self.property_tax.unwrap_or(0.0) / 12.0
            + self.insurance.unwrap_or(0.0) / 12.0
            + self.hoa_fees.unwrap_or(0.0)
    }

    pub fn is_arm(&self) -> bool {
        self.loan_type == LoanType::Arm
    }
}
