//! The premium shop: permanent production boosts bought with premium
//! currency. Purchases survive prestige.

use crate::{multiplier::MultiplierSource, types::Tier};
use serde::{Deserialize, Serialize};

/// Premium currency granted to a fresh game.
pub const STARTING_PREMIUM_CURRENCY: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopItem {
    BoostDim1To4,
    BoostDim5To8,
    BoostAllDimensions,
}

impl ShopItem {
    pub const ALL: [ShopItem; 3] = [
        ShopItem::BoostDim1To4,
        ShopItem::BoostDim5To8,
        ShopItem::BoostAllDimensions,
    ];

    pub fn base_price(&self) -> u64 {
        match self {
            Self::BoostDim1To4 => 100,
            Self::BoostDim5To8 => 200,
            Self::BoostAllDimensions => 500,
        }
    }

    pub fn covers(&self, tier: Tier) -> bool {
        match self {
            Self::BoostDim1To4 => (1..=4).contains(&tier),
            Self::BoostDim5To8 => (5..=8).contains(&tier),
            Self::BoostAllDimensions => true,
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::BoostDim1To4 => 0,
            Self::BoostDim5To8 => 1,
            Self::BoostAllDimensions => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Shop {
    pub premium_currency: u64,
    levels: [u32; 3],
}

impl Shop {
    pub fn new() -> Self {
        Self {
            premium_currency: STARTING_PREMIUM_CURRENCY,
            levels: [0; 3],
        }
    }

    pub fn level(&self, item: ShopItem) -> u32 {
        self.levels[item.index()]
    }

    /// Price of the item's next level:
    /// base + 100 x n(n-1)/2 for the n-th purchase.
    pub fn price(&self, item: ShopItem) -> u64 {
        let next = u64::from(self.level(item)) + 1;
        item.base_price() + 100 * (next - 1) * next / 2
    }

    /// Deducts currency and bumps the level. False when unaffordable.
    pub fn buy(&mut self, item: ShopItem) -> bool {
        let price = self.price(item);
        if self.premium_currency < price {
            return false;
        }
        self.premium_currency -= price;
        self.levels[item.index()] += 1;
        true
    }

    pub fn item_levels(&self) -> Vec<(ShopItem, u32)> {
        ShopItem::ALL.iter().map(|i| (*i, self.level(*i))).collect()
    }

    pub fn restore(&mut self, premium_currency: u64, levels: &[(ShopItem, u32)]) {
        self.premium_currency = premium_currency;
        self.levels = [0; 3];
        for (item, level) in levels {
            self.levels[item.index()] = *level;
        }
    }
}

impl Default for Shop {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiplierSource for Shop {
    /// x2 per purchased level of every item covering the tier.
    fn tier_multiplier(&self, tier: Tier) -> f64 {
        ShopItem::ALL
            .iter()
            .filter(|item| item.covers(tier))
            .map(|item| 2f64.powi(self.level(*item) as i32))
            .product()
    }
}
