//! Prestige: reset bookkeeping, permanent point-bought upgrades, and
//! milestone unlocks.
//!
//! RULES:
//!   - Points, upgrade levels, and unlocked milestones survive every
//!     reset. The engine resets everything else around
//!     `record_prestige`.
//!   - An upgrade's effect is a pure function of (effect, level),
//!     fixed as a tagged variant at construction — no id dispatch in
//!     the production path.

use crate::{
    big_number::BigNumber,
    multiplier::MultiplierSource,
    types::{Tier, DIMENSION_COUNT},
};
use serde::{Deserialize, Serialize};

/// Upgrade costs grow 30% per level, floored.
const UPGRADE_COST_GROWTH: f64 = 1.3;

/// Per-tier base cost of the dimension multiplier upgrades.
const DIM_UPGRADE_BASE_COSTS: [u64; DIMENSION_COUNT] = [1, 2, 3, 4, 6, 8, 10, 12];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeEffect {
    /// +0.01 per level on the base tickspeed multiplier.
    TickspeedBoost,
    /// x2 per level on one tier's production.
    DimensionMultiplier(Tier),
    /// +0.05 per level on the per-set bulk bonus base.
    BulkBonus,
}

impl UpgradeEffect {
    /// Stable upgrade id, used in commands and the save schema.
    pub fn id(&self) -> String {
        match self {
            Self::TickspeedBoost => "tickspeed_boost".to_string(),
            Self::DimensionMultiplier(tier) => format!("dim{tier}_mult"),
            Self::BulkBonus => "bulk_bonus".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrestigeUpgrade {
    pub effect: UpgradeEffect,
    pub level: u32,
    pub max_level: u32,
    pub base_cost: u64,
}

impl PrestigeUpgrade {
    /// Cost of the next level, or None at the cap.
    pub fn next_cost(&self) -> Option<u64> {
        if self.level >= self.max_level {
            return None;
        }
        Some((self.base_cost as f64 * UPGRADE_COST_GROWTH.powi(self.level as i32)).floor() as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneReward {
    /// Auto-buyers for tiers 1-4.
    AutoBuyersLow,
    /// Auto-buyers for tiers 5-8.
    AutoBuyersHigh,
    /// Bulk purchase of tickspeed levels.
    TickspeedBulkBuy,
    /// Start each subsequent run with 100 antimatter instead of 10.
    BoostedStart,
}

#[derive(Debug, Clone)]
pub struct Milestone {
    pub required_prestiges: u64,
    pub reward: MilestoneReward,
    pub unlocked: bool,
}

#[derive(Debug, Clone)]
pub struct PrestigeEngine {
    pub points: u64,
    pub total_prestiges: u64,
    threshold: BigNumber,
    upgrades: Vec<PrestigeUpgrade>,
    milestones: Vec<Milestone>,
}

impl PrestigeEngine {
    pub fn new(threshold: BigNumber) -> Self {
        let mut upgrades = vec![PrestigeUpgrade {
            effect: UpgradeEffect::TickspeedBoost,
            level: 0,
            max_level: 50,
            base_cost: 2,
        }];
        for tier in 1..=DIMENSION_COUNT as Tier {
            upgrades.push(PrestigeUpgrade {
                effect: UpgradeEffect::DimensionMultiplier(tier),
                level: 0,
                max_level: 99,
                base_cost: DIM_UPGRADE_BASE_COSTS[tier as usize - 1],
            });
        }
        upgrades.push(PrestigeUpgrade {
            effect: UpgradeEffect::BulkBonus,
            level: 0,
            max_level: 20,
            base_cost: 5,
        });

        let milestones = [
            (1, MilestoneReward::AutoBuyersLow),
            (3, MilestoneReward::AutoBuyersHigh),
            (5, MilestoneReward::TickspeedBulkBuy),
            (10, MilestoneReward::BoostedStart),
        ]
        .into_iter()
        .map(|(required_prestiges, reward)| Milestone {
            required_prestiges,
            reward,
            unlocked: false,
        })
        .collect();

        Self {
            points: 0,
            total_prestiges: 0,
            threshold,
            upgrades,
            milestones,
        }
    }

    pub fn can_prestige(&self, antimatter: BigNumber) -> bool {
        antimatter >= self.threshold
    }

    /// Point payout for resetting at the given currency:
    /// floor(exponent / 10), floored at zero. The 1e10 threshold pays
    /// exactly one point.
    pub fn points_gained(&self, antimatter: BigNumber) -> u64 {
        if antimatter.is_zero() || antimatter.exponent() <= 0 {
            return 0;
        }
        (antimatter.exponent() / 10) as u64
    }

    /// Bank the payout and bump the counter. The engine resets
    /// ledgers, currency, and tickspeed around this call.
    pub fn record_prestige(&mut self, points_gained: u64) {
        self.points += points_gained;
        self.total_prestiges += 1;
    }

    pub fn upgrade(&self, id: &str) -> Option<&PrestigeUpgrade> {
        self.upgrades.iter().find(|u| u.effect.id() == id)
    }

    /// Buy one level of the upgrade. Returns (new level, cost paid),
    /// or None when unknown, capped, or unaffordable — the caller
    /// derives the precise rejection.
    pub fn buy_upgrade(&mut self, id: &str) -> Option<(u32, u64)> {
        let upgrade = self.upgrades.iter_mut().find(|u| u.effect.id() == id)?;
        let cost = upgrade.next_cost()?;
        if self.points < cost {
            return None;
        }
        self.points -= cost;
        upgrade.level += 1;
        Some((upgrade.level, cost))
    }

    fn level_of(&self, effect: UpgradeEffect) -> u32 {
        self.upgrades
            .iter()
            .find(|u| u.effect == effect)
            .map(|u| u.level)
            .unwrap_or(0)
    }

    /// Contribution to the base tickspeed multiplier.
    pub fn tickspeed_boost(&self) -> f64 {
        0.01 * f64::from(self.level_of(UpgradeEffect::TickspeedBoost))
    }

    /// Unlock every milestone whose requirement is now met. Returns the
    /// newly unlocked ones; already-unlocked milestones never repeat.
    pub fn check_milestones(&mut self) -> Vec<(u64, MilestoneReward)> {
        let mut newly = Vec::new();
        for milestone in &mut self.milestones {
            if !milestone.unlocked && self.total_prestiges >= milestone.required_prestiges {
                milestone.unlocked = true;
                newly.push((milestone.required_prestiges, milestone.reward));
            }
        }
        newly
    }

    pub fn milestone_unlocked(&self, reward: MilestoneReward) -> bool {
        self.milestones
            .iter()
            .any(|m| m.reward == reward && m.unlocked)
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn upgrades(&self) -> &[PrestigeUpgrade] {
        &self.upgrades
    }

    /// Save-schema view of the upgrade levels.
    pub fn upgrade_levels(&self) -> Vec<(String, u32)> {
        self.upgrades
            .iter()
            .map(|u| (u.effect.id(), u.level))
            .collect()
    }

    pub fn restore(&mut self, points: u64, total_prestiges: u64, levels: &[(String, u32)]) {
        self.points = points;
        self.total_prestiges = total_prestiges;
        for (id, level) in levels {
            if let Some(upgrade) = self.upgrades.iter_mut().find(|u| &u.effect.id() == id) {
                upgrade.level = (*level).min(upgrade.max_level);
            }
        }
    }
}

impl MultiplierSource for PrestigeEngine {
    fn tier_multiplier(&self, tier: Tier) -> f64 {
        2f64.powi(self.level_of(UpgradeEffect::DimensionMultiplier(tier)) as i32)
    }

    fn bulk_bonus_increase(&self) -> f64 {
        0.05 * f64::from(self.level_of(UpgradeEffect::BulkBonus))
    }
}
