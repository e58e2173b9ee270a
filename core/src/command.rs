use crate::{autobuyer::BuyMode, shop::ShopItem, types::Tier};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
/// Variants are added per feature — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Dimensions ────────────────────────────────
    BuyDimension { tier: Tier, count: u32 },
    BuyMaxDimension { tier: Tier },
    BuyDimensionUntilNextSet { tier: Tier },

    // ── Tickspeed ─────────────────────────────────
    BuyTickspeed,
    BuyTickspeedMax,

    // ── Prestige ──────────────────────────────────
    DoPrestige,
    BuyPrestigeUpgrade { id: String },

    // ── Offline bank ──────────────────────────────
    StartOfflineBoost { multiplier: f64 },
    StopOfflineBoost,
    AccumulateOfflineTime { seconds: f64 },
    UpgradeOfflineMaxTime,
    UpgradeOfflineEfficiency,

    // ── Shop ──────────────────────────────────────
    BuyShopItem { item: ShopItem },

    // ── Auto-buyers ───────────────────────────────
    SetAutoBuyerEnabled { tier: Tier, enabled: bool },
    SetAutoBuyerMode { tier: Tier, mode: BuyMode },
    BuyAutoBuyerSpeed,
}

/// Result of applying a command. Rejections are ordinary gameplay
/// outcomes, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Applied,
    Rejected { reason: RejectReason },
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }

    pub(crate) fn rejected(reason: RejectReason) -> Self {
        CommandOutcome::Rejected { reason }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Not enough antimatter, points, premium currency, or banked time.
    Unaffordable,
    /// The target dimension is still locked.
    Locked,
    /// The feature is still milestone-locked.
    NotUnlocked,
    /// No such upgrade id.
    UnknownUpgrade,
    /// The upgrade is already at its level cap.
    MaxLevel,
    /// Tier outside 1..=8.
    InvalidTier,
    /// Boost cannot start or stop in the current phase.
    BoostUnavailable,
    /// Zero-count or otherwise empty request.
    NothingToBuy,
    /// Argument outside its documented range.
    InvalidArgument,
    /// The run has reached infinity; the engine is terminal.
    Terminal,
}
