//! Down payment percent / dollar / loan amount recompute

use serde::{Deserialize, Serialize};

/// Down payment percent assumed when the borrower gives neither figure
pub const DEFAULT_DOWN_PAYMENT_PERCENT: f64 = 20.0;

/// The field the borrower just edited
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DownPaymentInput {
    /// Percent of property price (20.0 = 20%)
    Percent(f64),
    /// Dollar amount
    Dollar(f64),
}

impl DownPaymentInput {
    /// Pick the driving field from two optional values; percent wins when both are set
    pub fn from_options(percent: Option<f64>, dollar: Option<f64>) -> Option<Self> {
        percent
            .map(DownPaymentInput::Percent)
            .or(dollar.map(DownPaymentInput::Dollar))
    }
}

/// Mutually consistent down payment figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownPaymentSync {
    pub percent: f64,
    pub dollar: f64,
    pub loan_amount: f64,
}

/// Recompute the other down payment field and the loan amount from the edited one.
/// Defaults to 20% down when nothing was entered.
pub fn sync_down_payment(property_price: f64, changed: Option<DownPaymentInput>) -> DownPaymentSync {
    let (percent, dollar) = match changed.unwrap_or(DownPaymentInput::Percent(DEFAULT_DOWN_PAYMENT_PERCENT)) {
        DownPaymentInput::Percent(percent) => (percent, property_price * percent / 100.0),
        DownPaymentInput::Dollar(dollar) => {
            let percent = if property_price > 0.0 {
                dollar / property_price * 100.0
            } else {
                0.0
            };
            (percent, dollar)
        }
    };

    DownPaymentSync {
        percent,
        dollar,
        loan_amount: property_price - dollar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_drives_dollar() {
        let sync = sync_down_payment(500_000.0, Some(DownPaymentInput::Percent(10.0)));
        assert_eq!(sync.dollar, 50_000.0);
        assert_eq!(sync.loan_amount, 450_000.0);
        assert_eq!(sync.percent, 10.0);
    }

    #[test]
    fn test_dollar_drives_percent() {
        let sync = sync_down_payment(400_000.0, Some(DownPaymentInput::Dollar(100_000.0)));
        assert_eq!(sync.percent, 25.0);
        assert_eq!(sync.loan_amount, 300_000.0);
    }

    #[test]
    fn test_default_twenty_percent() {
        let sync = sync_down_payment(500_000.0, None);
        assert_eq!(sync.percent, 20.0);
        assert_eq!(sync.dollar, 100_000.0);
        assert_eq!(sync.loan_amount, 400_000.0);
    }

    #[test]
    fn test_from_options_prefers_percent() {
        assert_eq!(
            DownPaymentInput::from_options(Some(5.0), Some(1_000.0)),
            Some(DownPaymentInput::Percent(5.0))
        );
        assert_eq!(
            DownPaymentInput::from_options(None, Some(1_000.0)),
            Some(DownPaymentInput::Dollar(1_000.0))
        );
        assert_eq!(DownPaymentInput::from_options(None, None), None);
    }

    #[test]
    fn test_zero_price_dollar_input() {
        let sync = sync_down_payment(0.0, Some(DownPaymentInput::Dollar(0.0)));
        assert_eq!(sync.percent, 0.0);
        assert_eq!(sync.loan_amount, 0.0);
    }
}
