//! Running balance state while stepping through a schedule

/// State of a loan at a point in its amortization
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Payment number of the period just processed (0 before the first payment)
    pub payment_number: u32,

    /// Outstanding balance after the last processed payment
    pub balance: f64,

    /// Annual rate in percent currently in force
    pub annual_rate: f64,
}

impl AmortizationState {
    /// Initialize state at loan origination
    pub fn new(principal: f64, annual_rate: f64) -> Self {
        Self {
            payment_number: 0,
            balance: principal,
            annual_rate,
        }
    }

    /// Monthly periodic rate as a decimal
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0 / 100.0
    }

    /// Advance to the next payment period
    pub fn advance_month(&mut self) {
        self.payment_number += 1;
    }

    /// Interest accrued on the outstanding balance for the current period
    pub fn period_interest(&self) -> f64 {
        self.balance * self.monthly_rate()
    }

    /// Apply a payment's principal; balance is floored at zero
    pub fn apply_payment(&mut self, principal: f64) {
        self.balance = (self.balance - principal).max(0.0);
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_interest() {
        let mut state = AmortizationState::new(120_000.0, 6.0);
        state.advance_month();
        assert_eq!(state.payment_number, 1);
        assert!((state.period_interest() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_payment_floors_balance() {
        let mut state = AmortizationState::new(1_000.0, 5.0);
        state.apply_payment(1_000.5);
        assert_eq!(state.balance, 0.0);
        assert!(state.is_paid_off());
    }
}
