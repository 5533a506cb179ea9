//! Discount and origination points

/// Rate reduction bought by one discount point, in percentage points
pub const RATE_REDUCTION_PER_POINT: f64 = 0.25;

/// Annual rate after discount points, floored at 0
pub fn calculate_effective_rate(base_rate: f64, discount_points: f64) -> f64 {
    (base_rate - RATE_REDUCTION_PER_POINT * discount_points).max(0.0)
}

/// Cost of all points; one point is 1% of the loan amount
pub fn calculate_points_cost(loan_amount: f64, discount_points: f64, origination_points: f64) -> f64 {
    loan_amount * (discount_points + origination_points) / 100.0
}
