//! Forward projections for the investment simulator.
//!
//! Projections are emitted in whole currency units while valuations use
//! cents. The simulator only displays rounded reais, so the coarser
//! precision is kept here and asserted in the tests below.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{
    AGGRESSIVE_RATE_FACTOR, BASE_MONTHLY_RATE, CONSERVATIVE_RATE_FACTOR,
    PROJECTION_DECIMAL_PRECISION,
};
use crate::projection::{ProjectionInput, ProjectionScenario, ProjectionSet, ScenarioKind};

fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        PROJECTION_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Generates `months + 1` projected values.
///
/// Index 0 is `initial_amount` as given. Each step grows the running value
/// by `monthly_rate` when `reinvest` is set, then adds `monthly_deposit`.
/// Rounding applies to the emitted values only; the running value keeps
/// full precision.
pub fn generate_projection(
    initial_amount: Decimal,
    months: u32,
    monthly_deposit: Decimal,
    reinvest: bool,
    monthly_rate: Decimal,
) -> Vec<Decimal> {
    let mut values = Vec::with_capacity(months as usize + 1);
    values.push(initial_amount);

    let growth = Decimal::ONE + monthly_rate;
    let mut current = initial_amount;
    for _ in 0..months {
        if reinvest {
            current = current.saturating_mul(growth);
        }
        current = current.saturating_add(monthly_deposit);
        values.push(round_whole(current));
    }
    values
}

/// Conservative, base and aggressive rates derived from a base rate.
pub fn scenario_rates(base_rate: Decimal) -> [(ScenarioKind, Decimal); 3] {
    [
        (ScenarioKind::Conservative, base_rate * CONSERVATIVE_RATE_FACTOR),
        (ScenarioKind::Base, base_rate),
        (ScenarioKind::Aggressive, base_rate * AGGRESSIVE_RATE_FACTOR),
    ]
}

/// Builds the three canonical scenarios from one simulator input.
pub fn generate_projection_set(input: &ProjectionInput) -> ProjectionSet {
    let base_rate = input
        .pool
        .map(|pool| pool.target_monthly_rate())
        .unwrap_or(BASE_MONTHLY_RATE);

    let [conservative, base, aggressive] = scenario_rates(base_rate).map(|(kind, rate)| {
        ProjectionScenario {
            kind,
            monthly_rate: rate,
            values: generate_projection(
                input.initial_amount,
                input.months,
                input.monthly_deposit,
                input.reinvest,
                rate,
            ),
        }
    });

    ProjectionSet {
        conservative,
        base,
        aggressive,
        total_contributed: input.initial_amount + input.monthly_deposit * Decimal::from(input.months),
    }
}
