//! One dimension slot: cost curve, production formula, purchase
//! mutations.
//!
//! RULE: prices are never stored. The cost of the n-th unit is derived
//! from `bought` alone — purchases group into sets of ten sharing one
//! price, and the price steps up only when `bought` crosses a set
//! boundary.

use crate::{
    big_number::BigNumber,
    multiplier::MultiplierSource,
    types::{Tier, SET_SIZE},
};

/// Base of the per-set production bonus before prestige upgrades.
pub const BULK_BONUS_BASE: f64 = 2.0;

/// Hard ceiling on units simulated in a single purchase call. Far
/// beyond any realistic single-tick purchase; guards the greedy loops
/// against runaway iteration.
pub const PURCHASE_SIM_CAP: u32 = 1000;

/// A tier's `bought` count that unlocks the tier above it.
pub const UNLOCK_THRESHOLD: u32 = 40;

/// Highest tier that starts (and re-locks to) unlocked.
pub const FREE_TIERS: Tier = 2;

#[derive(Debug, Clone)]
pub struct DimensionLedger {
    pub tier: Tier,
    pub amount: BigNumber,
    pub bought: u32,
    pub unlocked: bool,
    /// Permanent multiplier applied between prestiges; reset to 1 on
    /// prestige.
    pub multiplier: BigNumber,
    base_cost: BigNumber,
    cost_increase_per_10: BigNumber,
}

impl DimensionLedger {
    pub fn new(tier: Tier, base_cost: BigNumber, cost_increase_per_10: BigNumber) -> Self {
        Self {
            tier,
            amount: BigNumber::ZERO,
            bought: 0,
            unlocked: tier <= FREE_TIERS,
            multiplier: BigNumber::ONE,
            base_cost,
            cost_increase_per_10,
        }
    }

    /// Set index for the current price: 0 for the first ten units,
    /// 1 for the next ten, and so on.
    pub fn current_set(&self) -> u32 {
        self.bought / SET_SIZE
    }

    /// Price of the whole current set.
    pub fn set_cost(&self) -> BigNumber {
        self.base_cost * self.cost_increase_per_10.pow(self.current_set() as i32)
    }

    /// Price of one unit at the current set.
    pub fn single_unit_cost(&self) -> BigNumber {
        self.set_cost() / BigNumber::new(10.0)
    }

    /// Units left before the next set boundary.
    pub fn remaining_in_set(&self) -> u32 {
        SET_SIZE - self.bought % SET_SIZE
    }

    fn unit_cost_at(&self, bought: u32) -> BigNumber {
        let set = bought / SET_SIZE;
        self.base_cost * self.cost_increase_per_10.pow(set as i32) / BigNumber::new(10.0)
    }

    /// Exact cost of the next `count` units, stepping the price at
    /// every set boundary crossed mid-purchase.
    pub fn cost_for_count(&self, count: u32) -> BigNumber {
        let mut total = BigNumber::ZERO;
        for i in 0..count {
            total = total + self.unit_cost_at(self.bought + i);
        }
        total
    }

    /// How many units the given currency affords, simulated unit by
    /// unit up to the purchase cap.
    pub fn max_affordable(&self, currency: BigNumber) -> u32 {
        if currency <= BigNumber::ZERO {
            return 0;
        }
        let mut count = 0;
        let mut total = BigNumber::ZERO;
        while count < PURCHASE_SIM_CAP {
            let unit = self.unit_cost_at(self.bought + count);
            if total + unit > currency {
                break;
            }
            total = total + unit;
            count += 1;
        }
        count
    }

    /// Record `count` purchased units. The caller has already deducted
    /// the cost reported by `cost_for_count`.
    pub fn buy(&mut self, count: u32) {
        self.bought += count;
        self.amount = self.amount + BigNumber::from(count);
    }

    /// Buy as many units as `currency` affords, up to the purchase
    /// cap. Returns what was actually bought and spent.
    pub fn buy_max(&mut self, currency: BigNumber) -> (u32, BigNumber) {
        let mut bought_now = 0;
        let mut spent = BigNumber::ZERO;
        let mut remaining = currency;
        while bought_now < PURCHASE_SIM_CAP {
            let unit = self.single_unit_cost();
            if remaining < unit {
                break;
            }
            spent = spent + unit;
            remaining = remaining - unit;
            self.bought += 1;
            bought_now += 1;
        }
        if bought_now > 0 {
            self.amount = self.amount + BigNumber::from(bought_now);
        }
        (bought_now, spent)
    }

    /// Buy exactly up to the next set boundary if affordable — the
    /// whole remainder at the constant in-set price — otherwise fall
    /// back to `buy_max`.
    pub fn buy_until_next_set(&mut self, currency: BigNumber) -> (u32, BigNumber) {
        let remaining = self.remaining_in_set();
        let cost = self.single_unit_cost() * BigNumber::from(remaining);
        if currency >= cost {
            self.buy(remaining);
            (remaining, cost)
        } else {
            self.buy_max(currency)
        }
    }

    /// Production per simulated second:
    /// amount x multiplier x bulk^(bought/10) x stacked tier multipliers.
    /// The bulk base is 2 plus whatever the sources add.
    pub fn production(&self, mults: &dyn MultiplierSource) -> BigNumber {
        let bulk = BULK_BONUS_BASE + mults.bulk_bonus_increase();
        let bulk_bonus = BigNumber::new(bulk).pow(self.current_set() as i32);
        self.amount
            * self.multiplier
            * bulk_bonus
            * BigNumber::new(mults.tier_multiplier(self.tier))
    }

    /// Unlock once the tier below has bought enough. Stays unlocked
    /// until an explicit `reset`.
    pub fn check_unlock(&mut self, previous: &DimensionLedger) -> bool {
        if !self.unlocked && previous.bought >= UNLOCK_THRESHOLD {
            self.unlocked = true;
            return true;
        }
        false
    }

    /// Prestige reset. Tiers above the free band re-lock.
    pub fn reset(&mut self) {
        self.amount = BigNumber::ZERO;
        self.bought = 0;
        self.multiplier = BigNumber::ONE;
        if self.tier > FREE_TIERS {
            self.unlocked = false;
        }
    }

    /// Multiplicative, only ever increasing between resets.
    pub fn apply_permanent_multiplier(&mut self, factor: BigNumber) {
        self.multiplier = self.multiplier * factor;
    }
}
