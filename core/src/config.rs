//! Game balance configuration.
//!
//! `GameConfig::standard()` carries the shipped balance numbers.
//! Hosts may load an overriding JSON file; unknown fields are rejected,
//! missing fields fall back to the shipped values.

use crate::types::DIMENSION_COUNT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Antimatter a fresh run starts with.
    pub starting_antimatter: f64,
    /// Starting antimatter once the ten-prestige milestone is unlocked.
    pub boosted_starting_antimatter: f64,
    /// Root currency required before a prestige is allowed.
    pub prestige_threshold: f64,
    /// Base cost of the first set, per tier.
    pub dimension_base_costs: [f64; DIMENSION_COUNT],
    /// Cost multiplier applied at each completed set of ten, per tier.
    pub dimension_cost_increase_per_10: [f64; DIMENSION_COUNT],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_antimatter: 10.0,
            boosted_starting_antimatter: 100.0,
            prestige_threshold: 1e10,
            dimension_base_costs: [10.0, 1e3, 1e10, 1e20, 1e35, 1e60, 1e80, 1e100],
            dimension_cost_increase_per_10: [1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10],
        }
    }
}

impl GameConfig {
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Ok(serde_json::from_str(&content)?)
    }
}
