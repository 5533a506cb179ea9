//! Re-amortization with extra principal payments

use chrono::Datelike;
use crate::amortization::{AmortizationEntry, AmortizationState};
use crate::loan::ExtraPayments;

/// Extra principal requested for one period, before capping at the balance
fn requested_extra(extra: &ExtraPayments, entry: &AmortizationEntry, biweekly_share: f64) -> f64 {
    let monthly = extra.extra_monthly.unwrap_or(0.0);

    let annual = match (extra.extra_annual, extra.extra_annual_month) {
        (Some(amount), Some(month)) if entry.payment_date.month() == month => amount,
        _ => 0.0,
    };

    let lump: f64 = extra
        .lump_sums
        .iter()
        .filter(|lump| lump.payment_month == entry.payment_number)
        .map(|lump| lump.amount)
        .sum();

    monthly + annual + lump + biweekly_share
}

/// Re-simulate a schedule period by period with prepayments applied.
///
/// Each period keeps the base entry's date and rate, charges interest on the reduced
/// balance, pays the scheduled principal, then applies extra principal (capped at what is
/// still owed). The returned schedule stops at the payment that retires the loan, so it is
/// never longer than `base_schedule`.
///
/// Biweekly payments are modeled as one extra `monthly_payment` per year, spread evenly.
pub fn recalculate_with_extra_payments(
    base_schedule: &[AmortizationEntry],
    extra_payments: &ExtraPayments,
    monthly_payment: f64,
) -> Vec<AmortizationEntry> {
    let (first, last) = match (base_schedule.first(), base_schedule.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Vec::new(),
    };

    // Balance before the first payment
    let original_principal = first.remaining_balance + first.principal_paid;
    let biweekly_share = if extra_payments.biweekly_enabled {
        monthly_payment / 12.0
    } else {
        0.0
    };

    let mut state = AmortizationState::new(original_principal, first.interest_rate);
    let mut schedule = Vec::with_capacity(base_schedule.len());

    for base_entry in base_schedule {
        state.advance_month();
        state.annual_rate = base_entry.interest_rate;

        let interest_paid = state.period_interest();
        let scheduled_principal = if base_entry.payment_number == last.payment_number {
            state.balance
        } else {
            (monthly_payment - interest_paid).max(0.0).min(state.balance)
        };

        let extra_principal = requested_extra(extra_payments, base_entry, biweekly_share)
            .min(state.balance - scheduled_principal)
            .max(0.0);

        state.apply_payment(scheduled_principal + extra_principal);

        let mut entry = AmortizationEntry::new(
            base_entry.payment_number,
            base_entry.payment_date,
            scheduled_principal,
            interest_paid,
            state.balance,
            base_entry.interest_rate,
        );
        entry.extra_principal_paid = extra_principal;
        entry.refresh_total();
        schedule.push(entry);

        if state.is_paid_off() {
            break;
        }
    }

    schedule
}
