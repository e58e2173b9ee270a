//! Tickspeed: antimatter-purchased acceleration of simulated time.

use crate::{big_number::BigNumber, dimension::PURCHASE_SIM_CAP};

pub const BASE_PRICE: f64 = 100.0;
pub const PRICE_MULTIPLIER: f64 = 10.0;

/// Per-level speed factor before prestige boosts.
pub const BASE_SPEED_MULTIPLIER: f64 = 1.1;

#[derive(Debug, Clone)]
pub struct Tickspeed {
    pub level: u32,
    /// Granted by a milestone; survives prestige.
    pub bulk_unlocked: bool,
}

impl Tickspeed {
    pub fn new() -> Self {
        Self { level: 0, bulk_unlocked: false }
    }

    pub fn price(&self) -> BigNumber {
        price_at(self.level)
    }

    /// Global multiplier on simulated time. `boost` is the prestige
    /// tickspeed upgrade contribution (+0.01 per upgrade level).
    pub fn multiplier(&self, boost: f64) -> f64 {
        if self.level == 0 {
            return 1.0;
        }
        (BASE_SPEED_MULTIPLIER + boost).powi(self.level as i32)
    }

    /// Greedy bulk quote: how many levels the currency affords at the
    /// escalating price, and their total cost.
    pub fn max_affordable(&self, currency: BigNumber) -> (u32, BigNumber) {
        let mut count = 0;
        let mut total = BigNumber::ZERO;
        while count < PURCHASE_SIM_CAP {
            let next = price_at(self.level + count);
            if total + next > currency {
                break;
            }
            total = total + next;
            count += 1;
        }
        (count, total)
    }

    /// Record purchased levels. The caller has already deducted the
    /// quoted cost.
    pub fn buy(&mut self, levels: u32) {
        self.level += levels;
    }

    /// Prestige reset. The bulk-buy unlock is a milestone grant and
    /// survives.
    pub fn reset(&mut self) {
        self.level = 0;
    }
}

impl Default for Tickspeed {
    fn default() -> Self {
        Self::new()
    }
}

fn price_at(level: u32) -> BigNumber {
    BigNumber::new(BASE_PRICE) * BigNumber::new(PRICE_MULTIPLIER).pow(level as i32)
}
