//! The simulation engine — owns every component and drives the tick.
//!
//! TICK ORDER (fixed, documented, never reordered):
//!   1. Offline boost consumption (real time)
//!   2. Production cascade (simulated time = real x tickspeed x boost)
//!   3. Dimension unlock checks
//!   4. Terminal (infinity) check
//!   5. Auto-buyers (real time)
//!
//! RULES:
//!   - All mutation happens inside `tick` or a command application;
//!     the host serializes both onto one thread.
//!   - Rejected player actions are outcomes, never errors.
//!   - Once infinity is reached the engine is terminal: ticks and
//!     commands become no-ops.

use crate::{
    autobuyer::{AutoBuyers, BuyMode},
    big_number::BigNumber,
    cascade,
    command::{CommandOutcome, PlayerCommand, RejectReason},
    config::GameConfig,
    dimension::DimensionLedger,
    error::GameResult,
    event::GameEvent,
    multiplier::{MultiplierSource, StackedMultipliers},
    offline::{OfflineBank, OfflineUpgrade, MAX_BOOST_MULTIPLIER, MIN_BOOST_MULTIPLIER,
        NOTIFY_THRESHOLD_SECONDS},
    prestige::{MilestoneReward, PrestigeEngine},
    save::{
        AutoBuyerSave, DimensionSave, OfflineSave, PrestigeSave, SaveGame, ShopItemLevelSave,
        ShopSave, UpgradeLevelSave, SAVE_VERSION,
    },
    shop::{Shop, ShopItem},
    tickspeed::Tickspeed,
    types::{dimension_index, Tier, DIMENSION_COUNT},
};
use chrono::{DateTime, Utc};

pub struct GameEngine {
    config: GameConfig,
    pub antimatter: BigNumber,
    dimensions: [DimensionLedger; DIMENSION_COUNT],
    pub prestige: PrestigeEngine,
    pub tickspeed: Tickspeed,
    pub shop: Shop,
    pub offline: OfflineBank,
    pub auto_buyers: AutoBuyers,
    infinity_reached: bool,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        let dimensions = std::array::from_fn(|i| {
            DimensionLedger::new(
                (i + 1) as Tier,
                BigNumber::new(config.dimension_base_costs[i]),
                BigNumber::new(config.dimension_cost_increase_per_10[i]),
            )
        });
        let prestige = PrestigeEngine::new(BigNumber::new(config.prestige_threshold));
        Self {
            antimatter: BigNumber::new(config.starting_antimatter),
            dimensions,
            prestige,
            tickspeed: Tickspeed::new(),
            shop: Shop::new(),
            offline: OfflineBank::new(),
            auto_buyers: AutoBuyers::new(),
            infinity_reached: false,
            config,
        }
    }

    pub fn standard() -> Self {
        Self::new(GameConfig::standard())
    }

    pub fn dimension(&self, tier: Tier) -> Option<&DimensionLedger> {
        dimension_index(tier).map(|i| &self.dimensions[i])
    }

    pub fn dimensions(&self) -> &[DimensionLedger; DIMENSION_COUNT] {
        &self.dimensions
    }

    pub fn is_terminal(&self) -> bool {
        self.infinity_reached
    }

    /// Simulated seconds per real second at the current state.
    pub fn effective_time_scale(&self) -> f64 {
        self.tickspeed.multiplier(self.prestige.tickspeed_boost())
            * self.offline.active_multiplier()
    }

    /// Advance the simulation by `delta_seconds` of real time.
    pub fn tick(&mut self, delta_seconds: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.infinity_reached || !(delta_seconds > 0.0) {
            return events;
        }

        if self.offline.tick(delta_seconds) {
            events.push(GameEvent::BoostEnded);
        }

        let effective = delta_seconds * self.effective_time_scale();
        let sources: [&dyn MultiplierSource; 2] = [&self.prestige, &self.shop];
        let mults = StackedMultipliers::new(&sources);
        for tier in cascade::advance(&mut self.dimensions, &mut self.antimatter, effective, &mults)
        {
            events.push(GameEvent::DimensionUnlocked { tier });
        }

        if self.antimatter >= BigNumber::INFINITY {
            self.antimatter = BigNumber::INFINITY;
            self.infinity_reached = true;
            events.push(GameEvent::InfinityReached);
            return events;
        }

        if self.auto_buyers.tick(delta_seconds) {
            self.run_auto_buyers(&mut events);
        }

        events
    }

    /// Apply one player command. Returns the outcome plus whatever
    /// events the command produced.
    pub fn apply(&mut self, command: PlayerCommand) -> (CommandOutcome, Vec<GameEvent>) {
        let mut events = Vec::new();
        if self.infinity_reached {
            return (CommandOutcome::rejected(RejectReason::Terminal), events);
        }
        let outcome = match command {
            PlayerCommand::BuyDimension { tier, count } => {
                self.buy_dimension(tier, count, &mut events)
            }
            PlayerCommand::BuyMaxDimension { tier } => self.buy_max_dimension(tier, &mut events),
            PlayerCommand::BuyDimensionUntilNextSet { tier } => {
                self.buy_dimension_until_next_set(tier, &mut events)
            }
            PlayerCommand::BuyTickspeed => self.buy_tickspeed(&mut events),
            PlayerCommand::BuyTickspeedMax => self.buy_tickspeed_max(&mut events),
            PlayerCommand::DoPrestige => self.do_prestige(&mut events),
            PlayerCommand::BuyPrestigeUpgrade { id } => {
                self.buy_prestige_upgrade(&id, &mut events)
            }
            PlayerCommand::StartOfflineBoost { multiplier } => {
                self.start_offline_boost(multiplier, &mut events)
            }
            PlayerCommand::StopOfflineBoost => {
                if self.offline.stop_boost() {
                    events.push(GameEvent::BoostEnded);
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::rejected(RejectReason::BoostUnavailable)
                }
            }
            PlayerCommand::AccumulateOfflineTime { seconds } => {
                if !seconds.is_finite() || seconds <= 0.0 {
                    CommandOutcome::rejected(RejectReason::InvalidArgument)
                } else {
                    self.offline.accumulate(seconds);
                    CommandOutcome::Applied
                }
            }
            PlayerCommand::UpgradeOfflineMaxTime => {
                if self.offline.upgrade_max_time() {
                    events.push(GameEvent::OfflineUpgradePurchased {
                        upgrade: OfflineUpgrade::MaxTime,
                        new_level: self.offline.max_time_level,
                    });
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::rejected(RejectReason::Unaffordable)
                }
            }
            PlayerCommand::UpgradeOfflineEfficiency => {
                if self.offline.efficiency_upgrade_cost().is_none() {
                    CommandOutcome::rejected(RejectReason::MaxLevel)
                } else if self.offline.upgrade_efficiency() {
                    events.push(GameEvent::OfflineUpgradePurchased {
                        upgrade: OfflineUpgrade::Efficiency,
                        new_level: self.offline.efficiency_level,
                    });
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::rejected(RejectReason::Unaffordable)
                }
            }
            PlayerCommand::BuyShopItem { item } => self.buy_shop_item(item, &mut events),
            PlayerCommand::SetAutoBuyerEnabled { tier, enabled } => {
                if dimension_index(tier).is_none() {
                    CommandOutcome::rejected(RejectReason::InvalidTier)
                } else if self.auto_buyers.set_enabled(tier, enabled) {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::rejected(RejectReason::NotUnlocked)
                }
            }
            PlayerCommand::SetAutoBuyerMode { tier, mode } => {
                if self.auto_buyers.set_mode(tier, mode) {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::rejected(RejectReason::InvalidTier)
                }
            }
            PlayerCommand::BuyAutoBuyerSpeed => self.buy_auto_buyer_speed(&mut events),
        };
        (outcome, events)
    }

    // ── Dimension purchases ────────────────────────────────────────

    fn buy_dimension(&mut self, tier: Tier, count: u32, events: &mut Vec<GameEvent>)
        -> CommandOutcome
    {
        let Some(idx) = dimension_index(tier) else {
            return CommandOutcome::rejected(RejectReason::InvalidTier);
        };
        if count == 0 {
            return CommandOutcome::rejected(RejectReason::NothingToBuy);
        }
        if !self.dimensions[idx].unlocked {
            return CommandOutcome::rejected(RejectReason::Locked);
        }
        let cost = self.dimensions[idx].cost_for_count(count);
        if self.antimatter < cost {
            return CommandOutcome::rejected(RejectReason::Unaffordable);
        }
        self.antimatter = self.antimatter - cost;
        self.dimensions[idx].buy(count);
        events.push(GameEvent::DimensionsPurchased { tier, count, spent: cost });
        CommandOutcome::Applied
    }

    fn buy_max_dimension(&mut self, tier: Tier, events: &mut Vec<GameEvent>) -> CommandOutcome {
        let Some(idx) = dimension_index(tier) else {
            return CommandOutcome::rejected(RejectReason::InvalidTier);
        };
        if !self.dimensions[idx].unlocked {
            return CommandOutcome::rejected(RejectReason::Locked);
        }
        let (count, spent) = self.dimensions[idx].buy_max(self.antimatter);
        if count == 0 {
            return CommandOutcome::rejected(RejectReason::Unaffordable);
        }
        self.antimatter = self.antimatter - spent;
        events.push(GameEvent::DimensionsPurchased { tier, count, spent });
        CommandOutcome::Applied
    }

    fn buy_dimension_until_next_set(
        &mut self,
        tier: Tier,
        events: &mut Vec<GameEvent>,
    ) -> CommandOutcome {
        let Some(idx) = dimension_index(tier) else {
            return CommandOutcome::rejected(RejectReason::InvalidTier);
        };
        if !self.dimensions[idx].unlocked {
            return CommandOutcome::rejected(RejectReason::Locked);
        }
        let (count, spent) = self.dimensions[idx].buy_until_next_set(self.antimatter);
        if count == 0 {
            return CommandOutcome::rejected(RejectReason::Unaffordable);
        }
        self.antimatter = self.antimatter - spent;
        events.push(GameEvent::DimensionsPurchased { tier, count, spent });
        CommandOutcome::Applied
    }

    // ── Tickspeed ──────────────────────────────────────────────────

    fn buy_tickspeed(&mut self, events: &mut Vec<GameEvent>) -> CommandOutcome {
        let price = self.tickspeed.price();
        if self.antimatter < price {
            return CommandOutcome::rejected(RejectReason::Unaffordable);
        }
        self.antimatter = self.antimatter - price;
        self.tickspeed.buy(1);
        events.push(GameEvent::TickspeedPurchased {
            levels: 1,
            new_level: self.tickspeed.level,
            spent: price,
        });
        CommandOutcome::Applied
    }

    fn buy_tickspeed_max(&mut self, events: &mut Vec<GameEvent>) -> CommandOutcome {
        if !self.tickspeed.bulk_unlocked {
            return CommandOutcome::rejected(RejectReason::NotUnlocked);
        }
        let (count, total) = self.tickspeed.max_affordable(self.antimatter);
        if count == 0 {
            return CommandOutcome::rejected(RejectReason::Unaffordable);
        }
        self.antimatter = self.antimatter - total;
        self.tickspeed.buy(count);
        events.push(GameEvent::TickspeedPurchased {
            levels: count,
            new_level: self.tickspeed.level,
            spent: total,
        });
        CommandOutcome::Applied
    }

    // ── Prestige ───────────────────────────────────────────────────

    fn do_prestige(&mut self, events: &mut Vec<GameEvent>) -> CommandOutcome {
        if !self.prestige.can_prestige(self.antimatter) {
            return CommandOutcome::rejected(RejectReason::Unaffordable);
        }
        let gained = self.prestige.points_gained(self.antimatter);
        self.prestige.record_prestige(gained);

        for dim in &mut self.dimensions {
            dim.reset();
        }
        self.antimatter = self.starting_antimatter();
        self.tickspeed.reset();
        self.auto_buyers.disable_all();

        log::info!(
            "prestige #{}: +{} points ({} total)",
            self.prestige.total_prestiges,
            gained,
            self.prestige.points
        );
        events.push(GameEvent::PrestigePerformed {
            points_gained: gained,
            total_prestiges: self.prestige.total_prestiges,
        });

        for (required_prestiges, reward) in self.prestige.check_milestones() {
            self.grant_milestone(reward);
            events.push(GameEvent::MilestoneUnlocked { required_prestiges, reward });
        }
        CommandOutcome::Applied
    }

    fn starting_antimatter(&self) -> BigNumber {
        if self.prestige.milestone_unlocked(MilestoneReward::BoostedStart) {
            BigNumber::new(self.config.boosted_starting_antimatter)
        } else {
            BigNumber::new(self.config.starting_antimatter)
        }
    }

    fn grant_milestone(&mut self, reward: MilestoneReward) {
        match reward {
            MilestoneReward::AutoBuyersLow => self.auto_buyers.unlock_range(1..=4),
            MilestoneReward::AutoBuyersHigh => self.auto_buyers.unlock_range(5..=8),
            MilestoneReward::TickspeedBulkBuy => self.tickspeed.bulk_unlocked = true,
            // Consulted at prestige time; nothing to flip here.
            MilestoneReward::BoostedStart => {}
        }
    }

    fn buy_prestige_upgrade(&mut self, id: &str, events: &mut Vec<GameEvent>) -> CommandOutcome {
        let Some(upgrade) = self.prestige.upgrade(id) else {
            return CommandOutcome::rejected(RejectReason::UnknownUpgrade);
        };
        let Some(cost) = upgrade.next_cost() else {
            return CommandOutcome::rejected(RejectReason::MaxLevel);
        };
        if self.prestige.points < cost {
            return CommandOutcome::rejected(RejectReason::Unaffordable);
        }
        match self.prestige.buy_upgrade(id) {
            Some((new_level, paid)) => {
                events.push(GameEvent::PrestigeUpgradePurchased {
                    id: id.to_string(),
                    new_level,
                    cost: paid,
                });
                CommandOutcome::Applied
            }
            None => CommandOutcome::rejected(RejectReason::Unaffordable),
        }
    }

    // ── Offline bank ───────────────────────────────────────────────

    fn start_offline_boost(&mut self, multiplier: f64, events: &mut Vec<GameEvent>)
        -> CommandOutcome
    {
        if !multiplier.is_finite()
            || !(MIN_BOOST_MULTIPLIER..=MAX_BOOST_MULTIPLIER).contains(&multiplier)
        {
            return CommandOutcome::rejected(RejectReason::InvalidArgument);
        }
        let duration = self.offline.boost_duration(multiplier);
        if !self.offline.start_boost(multiplier) {
            return CommandOutcome::rejected(RejectReason::BoostUnavailable);
        }
        events.push(GameEvent::BoostStarted { multiplier, duration_seconds: duration });
        CommandOutcome::Applied
    }

    // ── Shop ───────────────────────────────────────────────────────

    fn buy_shop_item(&mut self, item: ShopItem, events: &mut Vec<GameEvent>) -> CommandOutcome {
        let price = self.shop.price(item);
        if !self.shop.buy(item) {
            return CommandOutcome::rejected(RejectReason::Unaffordable);
        }
        events.push(GameEvent::ShopItemPurchased {
            item,
            new_level: self.shop.level(item),
            price,
        });
        CommandOutcome::Applied
    }

    // ── Auto-buyers ────────────────────────────────────────────────

    fn buy_auto_buyer_speed(&mut self, events: &mut Vec<GameEvent>) -> CommandOutcome {
        let Some(cost) = self.auto_buyers.speed_upgrade_cost() else {
            return CommandOutcome::rejected(RejectReason::MaxLevel);
        };
        if self.prestige.points < cost {
            return CommandOutcome::rejected(RejectReason::Unaffordable);
        }
        self.prestige.points -= cost;
        self.auto_buyers.upgrade_speed();
        events.push(GameEvent::AutoBuyerSpeedUpgraded {
            new_level: self.auto_buyers.speed_level,
            cost,
        });
        CommandOutcome::Applied
    }

    fn run_auto_buyers(&mut self, events: &mut Vec<GameEvent>) {
        for i in 0..DIMENSION_COUNT {
            let tier = (i + 1) as Tier;
            let Some(slot) = self.auto_buyers.slot(tier) else { continue };
            if !slot.unlocked || !slot.enabled || !self.dimensions[i].unlocked {
                continue;
            }
            // Unaffordable attempts are silent no-ops, same as manual buys.
            let _ = match slot.mode {
                BuyMode::Single => self.buy_dimension(tier, 1, events),
                BuyMode::UntilNextSet => self.buy_dimension_until_next_set(tier, events),
            };
        }
    }

    // ── Persistence ────────────────────────────────────────────────

    /// Point-in-time snapshot of everything the save schema persists.
    pub fn capture(&self, now: DateTime<Utc>) -> SaveGame {
        let (unlocked, enabled, modes) = self.auto_buyers.snapshot();
        SaveGame {
            version: SAVE_VERSION,
            antimatter: self.antimatter,
            infinity_reached: self.infinity_reached,
            dimensions: self
                .dimensions
                .iter()
                .map(|d| DimensionSave {
                    tier: d.tier,
                    amount: d.amount,
                    bought: d.bought,
                    unlocked: d.unlocked,
                    multiplier: d.multiplier,
                })
                .collect(),
            prestige: PrestigeSave {
                points: self.prestige.points,
                total_prestiges: self.prestige.total_prestiges,
                upgrade_levels: self
                    .prestige
                    .upgrade_levels()
                    .into_iter()
                    .map(|(id, level)| UpgradeLevelSave { id, level })
                    .collect(),
            },
            tickspeed_level: self.tickspeed.level,
            tickspeed_bulk_unlocked: self.tickspeed.bulk_unlocked,
            shop: ShopSave {
                premium_currency: self.shop.premium_currency,
                item_levels: self
                    .shop
                    .item_levels()
                    .into_iter()
                    .map(|(item, level)| ShopItemLevelSave { item, level })
                    .collect(),
            },
            offline: OfflineSave {
                stored_seconds: self.offline.stored_seconds,
                max_time_level: self.offline.max_time_level,
                efficiency_level: self.offline.efficiency_level,
            },
            auto_buyers: AutoBuyerSave {
                unlocked,
                enabled,
                modes,
                speed_level: self.auto_buyers.speed_level,
            },
            saved_at: now,
        }
    }

    /// Rebuild an engine from a validated save. Offline time elapsed
    /// since `saved_at` is banked; gaps of a minute or more surface an
    /// `OfflineProgressApplied` event for the host to show.
    pub fn restore(
        config: GameConfig,
        save: SaveGame,
        now: DateTime<Utc>,
    ) -> GameResult<(GameEngine, Vec<GameEvent>)> {
        save.validate()?;
        let mut engine = GameEngine::new(config);
        engine.antimatter = save.antimatter;
        engine.infinity_reached = save.infinity_reached;
        for dim_save in &save.dimensions {
            let dim = &mut engine.dimensions[dim_save.tier as usize - 1];
            dim.amount = dim_save.amount;
            dim.bought = dim_save.bought;
            dim.unlocked = dim_save.unlocked;
            dim.multiplier = dim_save.multiplier;
        }
        let levels: Vec<(String, u32)> = save
            .prestige
            .upgrade_levels
            .iter()
            .map(|u| (u.id.clone(), u.level))
            .collect();
        engine
            .prestige
            .restore(save.prestige.points, save.prestige.total_prestiges, &levels);
        engine.tickspeed.level = save.tickspeed_level;
        engine.tickspeed.bulk_unlocked = save.tickspeed_bulk_unlocked;
        let shop_levels: Vec<(ShopItem, u32)> = save
            .shop
            .item_levels
            .iter()
            .map(|s| (s.item, s.level))
            .collect();
        engine.shop.restore(save.shop.premium_currency, &shop_levels);
        engine.offline.restore(
            save.offline.stored_seconds,
            save.offline.max_time_level,
            save.offline.efficiency_level,
        );
        engine.auto_buyers.restore(
            &save.auto_buyers.unlocked,
            &save.auto_buyers.enabled,
            &save.auto_buyers.modes,
            save.auto_buyers.speed_level,
        );

        // Milestones derive from total_prestiges; re-grant silently.
        for (_, reward) in engine.prestige.check_milestones() {
            engine.grant_milestone(reward);
        }

        let mut events = Vec::new();
        let elapsed = (now - save.saved_at).num_milliseconds() as f64 / 1000.0;
        if elapsed > 0.0 {
            let accumulated = engine.offline.accumulate(elapsed);
            log::debug!("banked {accumulated:.0}s from {elapsed:.0}s offline");
            if elapsed >= NOTIFY_THRESHOLD_SECONDS {
                events.push(GameEvent::OfflineProgressApplied {
                    elapsed_seconds: elapsed,
                    accumulated_seconds: accumulated,
                    stored_seconds: engine.offline.stored_seconds,
                });
            }
        }
        Ok((engine, events))
    }
}
