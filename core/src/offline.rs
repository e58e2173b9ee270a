//! The offline bank: a capped reservoir of banked real time, and the
//! boost state machine that burns it for a production multiplier.
//!
//! The consumption rate (multiplier / efficiency) and the advertised
//! duration (stored / multiplier) are deliberately kept on different
//! scales: with efficiency below 100% the reservoir drains to zero
//! before the advertised duration elapses, and the boost ends at
//! whichever limit is hit first.

use serde::{Deserialize, Serialize};

pub const BASE_MAX_SECONDS: f64 = 86_400.0;
pub const MAX_SECONDS_PER_LEVEL: f64 = 21_600.0;
pub const BASE_EFFICIENCY: f64 = 0.5;
pub const EFFICIENCY_PER_LEVEL: f64 = 0.05;
pub const EFFICIENCY_MAX_LEVEL: u32 = 10;

const MAX_TIME_BASE_COST: f64 = 72_000.0;
const MAX_TIME_COST_INCREASE: f64 = 21_600.0;
const EFFICIENCY_BASE_COST: f64 = 43_200.0;
const EFFICIENCY_COST_INCREASE: f64 = 21_600.0;

pub const MIN_BOOST_MULTIPLIER: f64 = 1.0;
pub const MAX_BOOST_MULTIPLIER: f64 = 20.0;

/// Offline gaps shorter than this are applied silently on load.
pub const NOTIFY_THRESHOLD_SECONDS: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub enum BoostPhase {
    Idle,
    Active { multiplier: f64, remaining_seconds: f64 },
}

/// Which bank upgrade was purchased; both are paid in banked seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineUpgrade {
    MaxTime,
    Efficiency,
}

#[derive(Debug, Clone)]
pub struct OfflineBank {
    pub stored_seconds: f64,
    pub max_time_level: u32,
    pub efficiency_level: u32,
    phase: BoostPhase,
}

impl OfflineBank {
    pub fn new() -> Self {
        Self {
            stored_seconds: 0.0,
            max_time_level: 0,
            efficiency_level: 0,
            phase: BoostPhase::Idle,
        }
    }

    pub fn max_seconds(&self) -> f64 {
        BASE_MAX_SECONDS + f64::from(self.max_time_level) * MAX_SECONDS_PER_LEVEL
    }

    pub fn efficiency_ratio(&self) -> f64 {
        (BASE_EFFICIENCY + f64::from(self.efficiency_level) * EFFICIENCY_PER_LEVEL).min(1.0)
    }

    /// Bank real elapsed seconds at the current efficiency, capped at
    /// the reservoir maximum. Returns what was actually banked.
    pub fn accumulate(&mut self, real_seconds: f64) -> f64 {
        let before = self.stored_seconds;
        self.stored_seconds =
            (self.stored_seconds + real_seconds * self.efficiency_ratio()).min(self.max_seconds());
        self.stored_seconds - before
    }

    /// Duration the player is shown for a boost at `multiplier`; also
    /// seeds the countdown when the boost starts.
    pub fn boost_duration(&self, multiplier: f64) -> f64 {
        self.stored_seconds / multiplier
    }

    pub fn can_start_boost(&self, multiplier: f64) -> bool {
        self.phase == BoostPhase::Idle
            && (MIN_BOOST_MULTIPLIER..=MAX_BOOST_MULTIPLIER).contains(&multiplier)
            && self.stored_seconds > 0.0
    }

    pub fn start_boost(&mut self, multiplier: f64) -> bool {
        if !self.can_start_boost(multiplier) {
            return false;
        }
        self.phase = BoostPhase::Active {
            multiplier,
            remaining_seconds: self.boost_duration(multiplier),
        };
        true
    }

    /// Explicit stop. False when no boost is running.
    pub fn stop_boost(&mut self) -> bool {
        if self.phase == BoostPhase::Idle {
            return false;
        }
        self.phase = BoostPhase::Idle;
        true
    }

    /// Advance consumption by `dt` real seconds. Returns true when the
    /// boost ended this tick — reservoir empty or countdown elapsed,
    /// whichever comes first.
    pub fn tick(&mut self, dt: f64) -> bool {
        let efficiency = self.efficiency_ratio();
        let BoostPhase::Active { multiplier, remaining_seconds } = &mut self.phase else {
            return false;
        };
        self.stored_seconds -= *multiplier / efficiency * dt;
        *remaining_seconds -= dt;
        if self.stored_seconds <= 0.0 || *remaining_seconds <= 0.0 {
            self.stored_seconds = self.stored_seconds.max(0.0);
            self.phase = BoostPhase::Idle;
            return true;
        }
        false
    }

    pub fn boost_active(&self) -> bool {
        matches!(self.phase, BoostPhase::Active { .. })
    }

    pub fn boost_remaining(&self) -> f64 {
        match self.phase {
            BoostPhase::Active { remaining_seconds, .. } => remaining_seconds,
            BoostPhase::Idle => 0.0,
        }
    }

    /// Multiplier the production driver applies while a boost runs.
    pub fn active_multiplier(&self) -> f64 {
        match self.phase {
            BoostPhase::Active { multiplier, .. } => multiplier,
            BoostPhase::Idle => 1.0,
        }
    }

    pub fn max_time_upgrade_cost(&self) -> f64 {
        MAX_TIME_BASE_COST + f64::from(self.max_time_level) * MAX_TIME_COST_INCREASE
    }

    /// None once the efficiency cap is reached.
    pub fn efficiency_upgrade_cost(&self) -> Option<f64> {
        if self.efficiency_level >= EFFICIENCY_MAX_LEVEL {
            return None;
        }
        Some(EFFICIENCY_BASE_COST + f64::from(self.efficiency_level) * EFFICIENCY_COST_INCREASE)
    }

    /// Spend banked seconds to raise the reservoir cap by six hours.
    pub fn upgrade_max_time(&mut self) -> bool {
        let cost = self.max_time_upgrade_cost();
        if self.stored_seconds < cost {
            return false;
        }
        self.stored_seconds -= cost;
        self.max_time_level += 1;
        true
    }

    /// Spend banked seconds to raise efficiency by five points, up to
    /// the ten-level cap (100%).
    pub fn upgrade_efficiency(&mut self) -> bool {
        let Some(cost) = self.efficiency_upgrade_cost() else {
            return false;
        };
        if self.stored_seconds < cost {
            return false;
        }
        self.stored_seconds -= cost;
        self.efficiency_level += 1;
        true
    }

    pub fn restore(&mut self, stored_seconds: f64, max_time_level: u32, efficiency_level: u32) {
        self.max_time_level = max_time_level;
        self.efficiency_level = efficiency_level.min(EFFICIENCY_MAX_LEVEL);
        self.stored_seconds = stored_seconds.clamp(0.0, self.max_seconds());
        self.phase = BoostPhase::Idle;
    }
}

impl Default for OfflineBank {
    fn default() -> Self {
        Self::new()
    }
}
