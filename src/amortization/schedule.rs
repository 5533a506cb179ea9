//! Schedule output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One payment period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// 1-indexed payment number
    pub payment_number: u32,
    pub payment_date: NaiveDate,

    // Payment split
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub remaining_balance: f64,

    /// Annual rate in percent used for this period
    pub interest_rate: f64,

    // Prepayment
    pub extra_principal_paid: f64,

    // PMI tracking
    pub pmi_paid: f64,
    pub pmi_active: bool,
    /// Remaining balance / property price x 100, when the price is known
    pub ltv_percent: Option<f64>,

    /// Scheduled principal + interest + extra principal + PMI
    pub total_payment: f64,
}

impl AmortizationEntry {
    /// Create an entry with the payment split only
    pub fn new(
        payment_number: u32,
        payment_date: NaiveDate,
        principal_paid: f64,
        interest_paid: f64,
        remaining_balance: f64,
        interest_rate: f64,
    ) -> Self {
        Self {
            payment_number,
            payment_date,
            principal_paid,
            interest_paid,
            remaining_balance,
            interest_rate,
            extra_principal_paid: 0.0,
            pmi_paid: 0.0,
            pmi_active: false,
            ltv_percent: None,
            total_payment: principal_paid + interest_paid,
        }
    }

    /// Recompute `total_payment` after extra principal or PMI changed
    pub fn refresh_total(&mut self) {
        self.total_payment =
            self.principal_paid + self.interest_paid + self.extra_principal_paid + self.pmi_paid;
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_payments: u32,
    pub total_principal: f64,
    pub total_interest: f64,
    pub total_extra_principal: f64,
    pub total_pmi: f64,
    pub payoff_date: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn from_entries(entries: &[AmortizationEntry]) -> Self {
        Self {
            total_payments: entries.len() as u32,
            total_principal: entries
                .iter()
                .map(|e| e.principal_paid + e.extra_principal_paid)
                .sum(),
            total_interest: entries.iter().map(|e| e.interest_paid).sum(),
            total_extra_principal: entries.iter().map(|e| e.extra_principal_paid).sum(),
            total_pmi: entries.iter().map(|e| e.pmi_paid).sum(),
            payoff_date: entries.last().map(|e| e.payment_date),
        }
    }

    /// Interest paid over the first `months` payments
    pub fn interest_through(entries: &[AmortizationEntry], months: usize) -> f64 {
        entries.iter().take(months).map(|e| e.interest_paid).sum()
    }
}
