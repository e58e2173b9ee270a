//! Events surfaced to the host after ticks, commands, and loads.
//!
//! The engine returns events instead of calling back into UI code; the
//! host decides what deserves a popup, a log line, or nothing.

use crate::{
    big_number::BigNumber,
    offline::OfflineUpgrade,
    prestige::MilestoneReward,
    shop::ShopItem,
    types::Tier,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Dimensions ────────────────────────────────
    DimensionsPurchased {
        tier: Tier,
        count: u32,
        spent: BigNumber,
    },
    DimensionUnlocked {
        tier: Tier,
    },

    // ── Tickspeed ─────────────────────────────────
    TickspeedPurchased {
        levels: u32,
        new_level: u32,
        spent: BigNumber,
    },

    // ── Prestige ──────────────────────────────────
    PrestigePerformed {
        points_gained: u64,
        total_prestiges: u64,
    },
    PrestigeUpgradePurchased {
        id: String,
        new_level: u32,
        cost: u64,
    },
    MilestoneUnlocked {
        required_prestiges: u64,
        reward: MilestoneReward,
    },

    // ── Offline bank ──────────────────────────────
    BoostStarted {
        multiplier: f64,
        duration_seconds: f64,
    },
    BoostEnded,
    OfflineProgressApplied {
        elapsed_seconds: f64,
        accumulated_seconds: f64,
        stored_seconds: f64,
    },
    OfflineUpgradePurchased {
        upgrade: OfflineUpgrade,
        new_level: u32,
    },

    // ── Shop ──────────────────────────────────────
    ShopItemPurchased {
        item: ShopItem,
        new_level: u32,
        price: u64,
    },

    // ── Auto-buyers ───────────────────────────────
    AutoBuyerSpeedUpgraded {
        new_level: u32,
        cost: u64,
    },

    // ── Terminal ──────────────────────────────────
    InfinityReached,
}
