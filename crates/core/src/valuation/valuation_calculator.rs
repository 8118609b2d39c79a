//! Compounding of monthly returns over an investment's principal.
//!
//! Every function here is pure: it takes a snapshot of the investment and
//! returns fresh values. Returns are re-sorted by month on each call so the
//! result never depends on the order the history was stored in.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::constants::VALUATION_DECIMAL_PRECISION;
use crate::investments::{Investment, MonthlyReturn};
use crate::valuation::{EvolutionPoint, InvestmentValuation};

/// Rounds a value to currency precision (cents, half away from zero).
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        VALUATION_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Multiplicative factor for a signed percentage: `15` -> `1.15`, `-100` -> `0`.
pub fn growth_factor(return_percentage: Decimal) -> Decimal {
    Decimal::ONE + return_percentage / dec!(100)
}

/// Applied returns in chronological order. Staged returns are dropped.
///
/// `YYYY-MM` strings sort chronologically, and the sort is stable so equal
/// months (which the repository forbids) would keep their stored order.
pub fn applied_returns_in_order(returns: &[MonthlyReturn]) -> Vec<&MonthlyReturn> {
    let mut applied: Vec<&MonthlyReturn> = returns.iter().filter(|r| r.applied).collect();
    applied.sort_by(|a, b| a.month.cmp(&b.month));
    applied
}

/// Current value of an investment: the principal compounded by every
/// applied monthly return, rounded to cents.
///
/// With no applied return the principal is returned unchanged, even when
/// staged returns exist or the principal carries sub-cent digits. The
/// evolution series then holds only the raw principal, and the two must
/// agree. A `-100` return zeroes the value and the zero carries through
/// later months.
pub fn calculate_current_value(investment: &Investment) -> Decimal {
    let applied = applied_returns_in_order(&investment.monthly_returns);
    if applied.is_empty() {
        return investment.amount;
    }
    let compounded = applied.iter().fold(investment.amount, |value, r| {
        value.saturating_mul(growth_factor(r.return_percentage))
    });
    round_currency(compounded)
}

/// Value history of an investment, starting at the acquisition month.
///
/// The first point carries the raw principal with a zero return; each
/// following point applies one more applied return. Values are rounded from
/// the unrounded running product, so the last point always equals
/// [`calculate_current_value`].
pub fn calculate_evolution(investment: &Investment) -> Vec<EvolutionPoint> {
    let applied = applied_returns_in_order(&investment.monthly_returns);
    let mut series = Vec::with_capacity(applied.len() + 1);
    series.push(EvolutionPoint {
        month: investment.acquisition_month(),
        value: investment.amount,
        return_percentage: Decimal::ZERO,
    });

    let mut running = investment.amount;
    for r in applied {
        running = running.saturating_mul(growth_factor(r.return_percentage));
        series.push(EvolutionPoint {
            month: r.month.clone(),
            value: round_currency(running),
            return_percentage: r.return_percentage,
        });
    }
    series
}

/// Full valuation view: current value, cumulative return and history.
pub fn calculate_valuation(investment: &Investment) -> InvestmentValuation {
    let evolution = calculate_evolution(investment);
    let current_value = evolution
        .last()
        .map(|p| p.value)
        .unwrap_or(investment.amount);

    let total_return_percentage = if investment.amount.is_zero() {
        Decimal::ZERO
    } else {
        round_currency((current_value / investment.amount - Decimal::ONE) * dec!(100))
    };

    InvestmentValuation {
        investment_id: investment.id.clone(),
        principal: investment.amount,
        current_value,
        total_return_percentage,
        evolution,
    }
}
