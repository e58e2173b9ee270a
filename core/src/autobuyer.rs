//! Auto-buyers: timed automatic dimension purchases, unlocked through
//! prestige milestones.
//!
//! The fire timer runs on real time, not simulated time — tickspeed
//! accelerates production, never the purchase cadence.

use crate::types::{dimension_index, Tier, DIMENSION_COUNT};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const BASE_INTERVAL: f64 = 1.0;
pub const INTERVAL_REDUCTION: f64 = 0.1;
pub const MIN_INTERVAL: f64 = 0.1;
pub const MAX_SPEED_LEVEL: u32 = 10;

/// Prestige-point cost of each speed level, indexed by current level.
pub const SPEED_UPGRADE_COSTS: [u64; MAX_SPEED_LEVEL as usize] =
    [5, 10, 15, 25, 40, 60, 90, 130, 180, 250];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyMode {
    Single,
    UntilNextSet,
}

#[derive(Debug, Clone, Copy)]
pub struct AutoBuyerSlot {
    pub unlocked: bool,
    pub enabled: bool,
    pub mode: BuyMode,
}

impl AutoBuyerSlot {
    fn locked() -> Self {
        Self { unlocked: false, enabled: false, mode: BuyMode::Single }
    }
}

#[derive(Debug, Clone)]
pub struct AutoBuyers {
    slots: [AutoBuyerSlot; DIMENSION_COUNT],
    pub speed_level: u32,
    timer: f64,
}

impl AutoBuyers {
    pub fn new() -> Self {
        Self {
            slots: [AutoBuyerSlot::locked(); DIMENSION_COUNT],
            speed_level: 0,
            timer: 0.0,
        }
    }

    pub fn interval(&self) -> f64 {
        (BASE_INTERVAL - f64::from(self.speed_level) * INTERVAL_REDUCTION).max(MIN_INTERVAL)
    }

    /// Advance the fire timer by `dt` real seconds. True when the
    /// auto-buyers should run this tick.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.timer += dt;
        if self.timer >= self.interval() {
            self.timer = 0.0;
            return true;
        }
        false
    }

    pub fn slot(&self, tier: Tier) -> Option<AutoBuyerSlot> {
        dimension_index(tier).map(|i| self.slots[i])
    }

    pub fn unlock_range(&mut self, tiers: RangeInclusive<Tier>) {
        for tier in tiers {
            if let Some(i) = dimension_index(tier) {
                self.slots[i].unlocked = true;
            }
        }
    }

    /// False when the slot is still milestone-locked.
    pub fn set_enabled(&mut self, tier: Tier, enabled: bool) -> bool {
        let Some(i) = dimension_index(tier) else { return false };
        if !self.slots[i].unlocked {
            return false;
        }
        self.slots[i].enabled = enabled;
        true
    }

    pub fn set_mode(&mut self, tier: Tier, mode: BuyMode) -> bool {
        let Some(i) = dimension_index(tier) else { return false };
        self.slots[i].mode = mode;
        true
    }

    /// None once the speed cap is reached.
    pub fn speed_upgrade_cost(&self) -> Option<u64> {
        SPEED_UPGRADE_COSTS.get(self.speed_level as usize).copied()
    }

    /// Record a purchased speed level. The caller has already deducted
    /// the prestige-point cost.
    pub fn upgrade_speed(&mut self) {
        if self.speed_level < MAX_SPEED_LEVEL {
            self.speed_level += 1;
        }
    }

    /// Prestige reset: enabled flags clear, milestone unlocks and the
    /// speed level survive.
    pub fn disable_all(&mut self) {
        for slot in &mut self.slots {
            slot.enabled = false;
        }
        self.timer = 0.0;
    }

    pub fn restore(
        &mut self,
        unlocked: &[bool],
        enabled: &[bool],
        modes: &[BuyMode],
        speed_level: u32,
    ) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.unlocked = unlocked.get(i).copied().unwrap_or(false);
            slot.enabled = enabled.get(i).copied().unwrap_or(false) && slot.unlocked;
            slot.mode = modes.get(i).copied().unwrap_or(BuyMode::Single);
        }
        self.speed_level = speed_level.min(MAX_SPEED_LEVEL);
        self.timer = 0.0;
    }

    pub fn snapshot(&self) -> (Vec<bool>, Vec<bool>, Vec<BuyMode>) {
        (
            self.slots.iter().map(|s| s.unlocked).collect(),
            self.slots.iter().map(|s| s.enabled).collect(),
            self.slots.iter().map(|s| s.mode).collect(),
        )
    }
}

impl Default for AutoBuyers {
    fn default() -> Self {
        Self::new()
    }
}
