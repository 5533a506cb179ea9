//! Closing cost aggregation

use crate::loan::ClosingCosts;

/// Line items plus points, before any credits
pub fn calculate_gross_closing_costs(costs: &ClosingCosts, points_cost: f64) -> f64 {
    costs.total() + points_cost
}

/// Net closing costs: line items + points - seller concessions - lender credits.
/// Negative when credits exceed costs.
pub fn calculate_total_closing_costs(
    costs: &ClosingCosts,
    points_cost: f64,
    seller_concessions: f64,
    lender_credits: f64,
) -> f64 {
    calculate_gross_closing_costs(costs, points_cost) - seller_concessions - lender_credits
}

/// Cash the borrower brings to closing
pub fn calculate_cash_at_closing(down_payment: f64, net_closing_costs: f64) -> f64 {
    down_payment + net_closing_costs
}
