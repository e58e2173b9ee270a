use antimatter_core::{
    autobuyer::BuyMode,
    big_number::BigNumber,
    command::{CommandOutcome, PlayerCommand, RejectReason},
    engine::GameEngine,
    event::GameEvent,
    multiplier::MultiplierSource,
    shop::ShopItem,
};

fn rejected(reason: RejectReason) -> CommandOutcome {
    CommandOutcome::Rejected { reason }
}

#[test]
fn dimension_purchases_validate_tier_lock_and_funds() {
    let mut engine = GameEngine::standard();

    let (outcome, _) = engine.apply(PlayerCommand::BuyDimension { tier: 9, count: 1 });
    assert_eq!(outcome, rejected(RejectReason::InvalidTier));

    let (outcome, _) = engine.apply(PlayerCommand::BuyDimension { tier: 3, count: 1 });
    assert_eq!(outcome, rejected(RejectReason::Locked));

    let (outcome, _) = engine.apply(PlayerCommand::BuyDimension { tier: 1, count: 0 });
    assert_eq!(outcome, rejected(RejectReason::NothingToBuy));

    // Tier 2 costs 100 per unit; a fresh game holds 10.
    let (outcome, _) = engine.apply(PlayerCommand::BuyDimension { tier: 2, count: 1 });
    assert_eq!(outcome, rejected(RejectReason::Unaffordable));

    let (outcome, events) = engine.apply(PlayerCommand::BuyDimension { tier: 1, count: 5 });
    assert!(outcome.is_applied());
    assert_eq!(engine.antimatter, BigNumber::new(5.0));
    assert!(matches!(
        events.as_slice(),
        [GameEvent::DimensionsPurchased { tier: 1, count: 5, .. }]
    ));
}

#[test]
fn buy_until_next_set_lands_on_the_boundary() {
    let mut engine = GameEngine::standard();
    engine.antimatter = BigNumber::new(1e6);
    engine.apply(PlayerCommand::BuyDimension { tier: 1, count: 7 });

    let (outcome, _) = engine.apply(PlayerCommand::BuyDimensionUntilNextSet { tier: 1 });
    assert!(outcome.is_applied());
    assert_eq!(engine.dimension(1).unwrap().bought % 10, 0);
}

#[test]
fn buy_max_spends_within_the_budget() {
    let mut engine = GameEngine::standard();
    engine.antimatter = BigNumber::new(1234.0);

    let (outcome, events) = engine.apply(PlayerCommand::BuyMaxDimension { tier: 1 });
    assert!(outcome.is_applied());
    let GameEvent::DimensionsPurchased { count, spent, .. } = events[0] else {
        panic!("expected a purchase event");
    };
    assert!(count > 0);
    assert!(spent <= BigNumber::new(1234.0));

    // Nothing affordable afterwards is a rejection, not an error.
    engine.antimatter = BigNumber::ZERO;
    let (outcome, _) = engine.apply(PlayerCommand::BuyMaxDimension { tier: 1 });
    assert_eq!(outcome, rejected(RejectReason::Unaffordable));
}

#[test]
fn tickspeed_accelerates_simulated_time() {
    let mut engine = GameEngine::standard();
    let (outcome, _) = engine.apply(PlayerCommand::BuyTickspeed);
    assert_eq!(outcome, rejected(RejectReason::Unaffordable), "10 < 100");

    engine.antimatter = BigNumber::new(100.0);
    let (outcome, _) = engine.apply(PlayerCommand::BuyTickspeed);
    assert!(outcome.is_applied());
    assert!(engine.antimatter.is_zero());
    assert_eq!(engine.tickspeed.level, 1);
    assert!((engine.effective_time_scale() - 1.1).abs() < 1e-12);

    // Next level is ten times the price.
    assert_eq!(engine.tickspeed.price(), BigNumber::new(1000.0));

    // Production runs on the accelerated clock.
    engine.antimatter = BigNumber::new(1.0);
    engine.apply(PlayerCommand::BuyDimension { tier: 1, count: 1 });
    engine.tick(1.0);
    assert_eq!(engine.antimatter, BigNumber::new(1.1));
}

#[test]
fn tickspeed_bulk_buy_is_milestone_gated() {
    let mut engine = GameEngine::standard();
    engine.antimatter = BigNumber::new(1e6);
    let (outcome, _) = engine.apply(PlayerCommand::BuyTickspeedMax);
    assert_eq!(outcome, rejected(RejectReason::NotUnlocked));

    engine.tickspeed.bulk_unlocked = true;
    let (outcome, events) = engine.apply(PlayerCommand::BuyTickspeedMax);
    assert!(outcome.is_applied());
    // 100 + 1000 + 10000 + 100000 = 111100 <= 1e6; the next level is 1e6.
    assert_eq!(engine.tickspeed.level, 4);
    assert!(matches!(
        events.as_slice(),
        [GameEvent::TickspeedPurchased { levels: 4, new_level: 4, .. }]
    ));
}

#[test]
fn shop_prices_escalate_and_boosts_stack_by_group() {
    let mut engine = GameEngine::standard();
    assert_eq!(engine.shop.premium_currency, 1000);
    assert_eq!(engine.shop.price(ShopItem::BoostDim1To4), 100);

    let (outcome, _) = engine.apply(PlayerCommand::BuyShopItem { item: ShopItem::BoostDim1To4 });
    assert!(outcome.is_applied());
    assert_eq!(engine.shop.premium_currency, 900);
    assert_eq!(engine.shop.price(ShopItem::BoostDim1To4), 200);

    let (outcome, _) =
        engine.apply(PlayerCommand::BuyShopItem { item: ShopItem::BoostAllDimensions });
    assert!(outcome.is_applied());

    // Tier 2 gets both boosts, tier 6 only the all-dimensions one.
    assert_eq!(engine.shop.tier_multiplier(2), 4.0);
    assert_eq!(engine.shop.tier_multiplier(6), 2.0);

    engine.shop.premium_currency = 0;
    let (outcome, _) = engine.apply(PlayerCommand::BuyShopItem { item: ShopItem::BoostDim5To8 });
    assert_eq!(outcome, rejected(RejectReason::Unaffordable));
}

#[test]
fn auto_buyers_fire_once_unlocked_and_enabled() {
    let mut engine = GameEngine::standard();

    let (outcome, _) = engine.apply(PlayerCommand::SetAutoBuyerEnabled { tier: 1, enabled: true });
    assert_eq!(outcome, rejected(RejectReason::NotUnlocked));

    // One prestige unlocks auto-buyers for tiers 1-4.
    engine.antimatter = BigNumber::new(1e10);
    engine.apply(PlayerCommand::DoPrestige);
    let (outcome, _) = engine.apply(PlayerCommand::SetAutoBuyerEnabled { tier: 1, enabled: true });
    assert!(outcome.is_applied());
    engine.apply(PlayerCommand::SetAutoBuyerMode { tier: 1, mode: BuyMode::UntilNextSet });

    // The 1s fire timer elapses and buys a full set with the starting 10.
    let events = engine.tick(1.0);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::DimensionsPurchased { tier: 1, count: 10, .. })));
    assert_eq!(engine.dimension(1).unwrap().bought, 10);
}

#[test]
fn auto_buyer_speed_upgrade_spends_prestige_points() {
    let mut engine = GameEngine::standard();
    assert!((engine.auto_buyers.interval() - 1.0).abs() < 1e-12);

    let (outcome, _) = engine.apply(PlayerCommand::BuyAutoBuyerSpeed);
    assert_eq!(outcome, rejected(RejectReason::Unaffordable));

    engine.prestige.points = 5;
    let (outcome, _) = engine.apply(PlayerCommand::BuyAutoBuyerSpeed);
    assert!(outcome.is_applied());
    assert_eq!(engine.prestige.points, 0);
    assert!((engine.auto_buyers.interval() - 0.9).abs() < 1e-12);

    let (outcome, _) = engine.apply(PlayerCommand::BuyAutoBuyerSpeed);
    assert_eq!(outcome, rejected(RejectReason::Unaffordable), "next level costs 10");
}

#[test]
fn offline_boost_commands_route_through_the_state_machine() {
    let mut engine = GameEngine::standard();

    let (outcome, _) = engine.apply(PlayerCommand::StartOfflineBoost { multiplier: 50.0 });
    assert_eq!(outcome, rejected(RejectReason::InvalidArgument));

    let (outcome, _) = engine.apply(PlayerCommand::StartOfflineBoost { multiplier: 2.0 });
    assert_eq!(outcome, rejected(RejectReason::BoostUnavailable), "empty bank");

    let (outcome, _) = engine.apply(PlayerCommand::AccumulateOfflineTime { seconds: 2000.0 });
    assert!(outcome.is_applied());

    let (outcome, events) = engine.apply(PlayerCommand::StartOfflineBoost { multiplier: 2.0 });
    assert!(outcome.is_applied());
    assert!(matches!(
        events.as_slice(),
        [GameEvent::BoostStarted { multiplier, duration_seconds }]
            if *multiplier == 2.0 && (*duration_seconds - 500.0).abs() < 1e-9
    ));

    // Boost doubles effective time while it runs.
    assert!((engine.effective_time_scale() - 2.0).abs() < 1e-12);

    let (outcome, events) = engine.apply(PlayerCommand::StopOfflineBoost);
    assert!(outcome.is_applied());
    assert!(matches!(events.as_slice(), [GameEvent::BoostEnded]));

    let (outcome, _) = engine.apply(PlayerCommand::StopOfflineBoost);
    assert_eq!(outcome, rejected(RejectReason::BoostUnavailable));
}

#[test]
fn offline_upgrades_are_commands_too() {
    let mut engine = GameEngine::standard();
    engine.offline.stored_seconds = 80_000.0;

    let (outcome, _) = engine.apply(PlayerCommand::UpgradeOfflineMaxTime);
    assert!(outcome.is_applied());
    assert_eq!(engine.offline.max_time_level, 1);

    let (outcome, _) = engine.apply(PlayerCommand::UpgradeOfflineEfficiency);
    assert_eq!(outcome, rejected(RejectReason::Unaffordable), "8000 left < 43200");

    engine.offline.stored_seconds = 50_000.0;
    let (outcome, _) = engine.apply(PlayerCommand::UpgradeOfflineEfficiency);
    assert!(outcome.is_applied());
    assert!((engine.offline.efficiency_ratio() - 0.55).abs() < 1e-12);
}

#[test]
fn prestige_upgrade_command_reports_precise_rejections() {
    let mut engine = GameEngine::standard();

    let (outcome, _) =
        engine.apply(PlayerCommand::BuyPrestigeUpgrade { id: "warp_drive".into() });
    assert_eq!(outcome, rejected(RejectReason::UnknownUpgrade));

    let (outcome, _) =
        engine.apply(PlayerCommand::BuyPrestigeUpgrade { id: "dim1_mult".into() });
    assert_eq!(outcome, rejected(RejectReason::Unaffordable));

    engine.prestige.points = 10;
    let (outcome, events) =
        engine.apply(PlayerCommand::BuyPrestigeUpgrade { id: "dim1_mult".into() });
    assert!(outcome.is_applied());
    assert_eq!(engine.prestige.points, 9);
    assert!(matches!(
        events.as_slice(),
        [GameEvent::PrestigeUpgradePurchased { new_level: 1, cost: 1, .. }]
    ));
    assert_eq!(engine.prestige.tier_multiplier(1), 2.0);
}
