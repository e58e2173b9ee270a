//! The save schema and its opaque-string encoding.
//!
//! RULES:
//!   - The schema is versioned. Fields are added, never repurposed.
//!   - Import validates the whole payload before anything else runs;
//!     a malformed string is an error and the running game is left
//!     untouched.
//!   - Derived values (prices, unlock thresholds, multiplier effects)
//!     are never persisted — only the state they derive from.

use crate::{
    autobuyer::BuyMode,
    big_number::BigNumber,
    error::{GameError, GameResult},
    shop::ShopItem,
    types::{Tier, DIMENSION_COUNT},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub antimatter: BigNumber,
    pub infinity_reached: bool,
    pub dimensions: Vec<DimensionSave>,
    pub prestige: PrestigeSave,
    pub tickspeed_level: u32,
    pub tickspeed_bulk_unlocked: bool,
    pub shop: ShopSave,
    pub offline: OfflineSave,
    pub auto_buyers: AutoBuyerSave,
    /// Wall-clock time of the save; drives offline accumulation on the
    /// next load.
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionSave {
    pub tier: Tier,
    pub amount: BigNumber,
    pub bought: u32,
    pub unlocked: bool,
    pub multiplier: BigNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrestigeSave {
    pub points: u64,
    pub total_prestiges: u64,
    pub upgrade_levels: Vec<UpgradeLevelSave>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeLevelSave {
    pub id: String,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSave {
    pub premium_currency: u64,
    pub item_levels: Vec<ShopItemLevelSave>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopItemLevelSave {
    pub item: ShopItem,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineSave {
    pub stored_seconds: f64,
    pub max_time_level: u32,
    pub efficiency_level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoBuyerSave {
    pub unlocked: Vec<bool>,
    pub enabled: Vec<bool>,
    pub modes: Vec<BuyMode>,
    pub speed_level: u32,
}

impl SaveGame {
    /// Serialize to the opaque export string (clipboard-safe JSON).
    pub fn export_string(&self) -> GameResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate an exported string. Nothing is mutated here;
    /// the caller decides whether to restore from the result.
    pub fn import_string(payload: &str) -> GameResult<SaveGame> {
        let save: SaveGame = serde_json::from_str(payload.trim())?;
        save.validate()?;
        Ok(save)
    }

    fn corrupt(reason: impl Into<String>) -> GameError {
        GameError::CorruptSave { reason: reason.into() }
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.version == 0 || self.version > SAVE_VERSION {
            return Err(Self::corrupt(format!(
                "unsupported save version {}",
                self.version
            )));
        }
        if self.dimensions.len() != DIMENSION_COUNT {
            return Err(Self::corrupt(format!(
                "expected {DIMENSION_COUNT} dimensions, found {}",
                self.dimensions.len()
            )));
        }
        for (i, dim) in self.dimensions.iter().enumerate() {
            if dim.tier as usize != i + 1 {
                return Err(Self::corrupt(format!(
                    "dimension {} out of order (tier {})",
                    i, dim.tier
                )));
            }
        }
        if !self.offline.stored_seconds.is_finite() || self.offline.stored_seconds < 0.0 {
            return Err(Self::corrupt("offline stored_seconds out of range"));
        }
        Ok(())
    }
}
