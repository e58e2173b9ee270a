//! The per-tick production cascade.
//!
//! Tiers are processed highest to lowest, and each tier's output lands
//! in the tier below it *immediately* — a lower tier's own production
//! in the same tick already includes what the tier above just fed it.
//! That forward propagation is load-bearing for game balance; do not
//! buffer or snapshot pre-tick amounts.

use crate::{
    big_number::BigNumber,
    dimension::DimensionLedger,
    multiplier::MultiplierSource,
    types::{Tier, DIMENSION_COUNT},
};

/// Advance every dimension and the root currency by `effective_delta`
/// simulated seconds. Returns the tiers newly unlocked this tick.
pub fn advance(
    dimensions: &mut [DimensionLedger; DIMENSION_COUNT],
    antimatter: &mut BigNumber,
    effective_delta: f64,
    mults: &dyn MultiplierSource,
) -> Vec<Tier> {
    let dt = BigNumber::new(effective_delta);

    for i in (0..DIMENSION_COUNT).rev() {
        if !dimensions[i].unlocked || dimensions[i].amount.is_zero() {
            continue;
        }
        let produced = dimensions[i].production(mults) * dt;
        if i == 0 {
            *antimatter = *antimatter + produced;
        } else {
            dimensions[i - 1].amount = dimensions[i - 1].amount + produced;
        }
    }

    let mut newly_unlocked = Vec::new();
    for i in FREE_SLOTS..DIMENSION_COUNT {
        let (lower, upper) = dimensions.split_at_mut(i);
        if upper[0].check_unlock(&lower[i - 1]) {
            newly_unlocked.push(upper[0].tier);
        }
    }
    newly_unlocked
}

/// Tiers 1 and 2 never need an unlock check.
const FREE_SLOTS: usize = 2;
