//! The multiplier capability seam.
//!
//! RULE: Production math never reaches into other components. Anything
//! that scales dimension output implements `MultiplierSource`; the
//! engine stacks the active sources and hands the stack to
//! `DimensionLedger::production`.

use crate::types::Tier;

pub trait MultiplierSource {
    /// Flat production multiplier for one tier. Stacks multiplicatively.
    fn tier_multiplier(&self, _tier: Tier) -> f64 {
        1.0
    }

    /// Additive increase on the per-set bulk bonus base. Stacks additively.
    fn bulk_bonus_increase(&self) -> f64 {
        0.0
    }
}

/// Combines several sources: product of tier multipliers, sum of bulk
/// bonus increases.
pub struct StackedMultipliers<'a> {
    sources: &'a [&'a dyn MultiplierSource],
}

impl<'a> StackedMultipliers<'a> {
    pub fn new(sources: &'a [&'a dyn MultiplierSource]) -> Self {
        Self { sources }
    }
}

impl MultiplierSource for StackedMultipliers<'_> {
    fn tier_multiplier(&self, tier: Tier) -> f64 {
        self.sources.iter().map(|s| s.tier_multiplier(tier)).product()
    }

    fn bulk_bonus_increase(&self) -> f64 {
        self.sources.iter().map(|s| s.bulk_bonus_increase()).sum()
    }
}

/// The empty stack; used when production runs with no boosts attached.
pub struct NoMultipliers;

impl MultiplierSource for NoMultipliers {}
