use antimatter_core::{
    big_number::BigNumber,
    command::PlayerCommand,
    config::GameConfig,
    engine::GameEngine,
    error::GameError,
    event::GameEvent,
    save::SaveGame,
    shop::ShopItem,
    store::SaveStore,
};
use chrono::{Duration, Utc};

/// An engine with progress in every persisted subsystem.
fn played_engine() -> GameEngine {
    let mut engine = GameEngine::standard();
    engine.antimatter = BigNumber::new(5e20);
    engine.apply(PlayerCommand::BuyDimension { tier: 1, count: 14 });
    engine.apply(PlayerCommand::BuyDimension { tier: 2, count: 3 });
    engine.apply(PlayerCommand::BuyTickspeed);
    engine.apply(PlayerCommand::BuyShopItem { item: ShopItem::BoostDim1To4 });
    engine.apply(PlayerCommand::AccumulateOfflineTime { seconds: 9000.0 });
    engine.apply(PlayerCommand::DoPrestige);
    engine.prestige.points += 50;
    engine.apply(PlayerCommand::BuyPrestigeUpgrade { id: "dim2_mult".into() });
    engine.apply(PlayerCommand::SetAutoBuyerEnabled { tier: 2, enabled: true });
    engine.antimatter = BigNumber::from_parts(3.25, 14);
    engine.apply(PlayerCommand::BuyDimension { tier: 1, count: 10 });
    engine
}

#[test]
fn export_import_round_trips_without_loss() {
    let engine = played_engine();
    let now = Utc::now();

    let payload = engine.capture(now).export_string().unwrap();
    let save = SaveGame::import_string(&payload).unwrap();
    let (restored, events) = GameEngine::restore(GameConfig::standard(), save, now).unwrap();

    assert!(events.is_empty(), "no offline gap, no notification");
    assert_eq!(restored.antimatter, engine.antimatter);
    assert_eq!(restored.is_terminal(), engine.is_terminal());
    for (a, b) in restored.dimensions().iter().zip(engine.dimensions()) {
        assert_eq!(a.tier, b.tier);
        assert_eq!(a.amount, b.amount);
        assert_eq!(a.bought, b.bought);
        assert_eq!(a.unlocked, b.unlocked);
        assert_eq!(a.multiplier, b.multiplier);
    }
    assert_eq!(restored.prestige.points, engine.prestige.points);
    assert_eq!(restored.prestige.total_prestiges, engine.prestige.total_prestiges);
    assert_eq!(restored.prestige.upgrade_levels(), engine.prestige.upgrade_levels());
    assert_eq!(restored.tickspeed.level, engine.tickspeed.level);
    assert_eq!(restored.shop.premium_currency, engine.shop.premium_currency);
    assert_eq!(restored.shop.item_levels(), engine.shop.item_levels());
    assert_eq!(restored.offline.max_time_level, engine.offline.max_time_level);
    assert!(
        (restored.offline.stored_seconds - engine.offline.stored_seconds).abs() < 1e-9
    );
    assert_eq!(restored.auto_buyers.speed_level, engine.auto_buyers.speed_level);
    assert_eq!(
        restored.auto_buyers.slot(2).unwrap().enabled,
        engine.auto_buyers.slot(2).unwrap().enabled
    );
}

#[test]
fn load_banks_the_elapsed_offline_time() {
    let mut engine = GameEngine::standard();
    engine.apply(PlayerCommand::AccumulateOfflineTime { seconds: 1000.0 });
    let stored_at_save = engine.offline.stored_seconds;

    let now = Utc::now();
    let save = engine.capture(now - Duration::hours(2));
    let (restored, events) = GameEngine::restore(GameConfig::standard(), save, now).unwrap();

    // Two hours away at 50% efficiency banks one hour.
    let expected = stored_at_save + 3600.0;
    assert!((restored.offline.stored_seconds - expected).abs() < 1.0);

    let [GameEvent::OfflineProgressApplied {
        elapsed_seconds,
        accumulated_seconds,
        stored_seconds,
    }] = events.as_slice()
    else {
        panic!("expected exactly one offline progress event, got {events:?}");
    };
    assert!((elapsed_seconds - 7200.0).abs() < 1.0);
    assert!((accumulated_seconds - 3600.0).abs() < 1.0);
    assert!((stored_seconds - expected).abs() < 1.0);
}

#[test]
fn short_offline_gaps_apply_silently() {
    let engine = GameEngine::standard();
    let now = Utc::now();
    let save = engine.capture(now - Duration::seconds(30));
    let (restored, events) = GameEngine::restore(GameConfig::standard(), save, now).unwrap();

    assert!(events.is_empty(), "gaps under a minute stay silent");
    assert!((restored.offline.stored_seconds - 15.0).abs() < 1.0);
}

#[test]
fn load_recomputes_milestones_from_the_counter() {
    let mut engine = GameEngine::standard();
    for _ in 0..5 {
        engine.antimatter = BigNumber::new(1e10);
        engine.apply(PlayerCommand::DoPrestige);
    }
    assert!(engine.tickspeed.bulk_unlocked);

    let now = Utc::now();
    let save = engine.capture(now);
    let (restored, _) = GameEngine::restore(GameConfig::standard(), save, now).unwrap();

    assert!(restored.tickspeed.bulk_unlocked);
    assert!(restored.auto_buyers.slot(8).unwrap().unlocked);
}

#[test]
fn malformed_payloads_are_explicit_errors() {
    assert!(matches!(
        SaveGame::import_string("not a save"),
        Err(GameError::Serialization(_))
    ));

    let payload = GameEngine::standard().capture(Utc::now()).export_string().unwrap();
    let truncated = &payload[..payload.len() / 2];
    assert!(SaveGame::import_string(truncated).is_err());

    // Structurally valid JSON with an impossible schema.
    let mut save = GameEngine::standard().capture(Utc::now());
    save.dimensions.truncate(7);
    let tampered = save.export_string().unwrap();
    assert!(matches!(
        SaveGame::import_string(&tampered),
        Err(GameError::CorruptSave { .. })
    ));

    let mut save = GameEngine::standard().capture(Utc::now());
    save.version = 99;
    let future = save.export_string().unwrap();
    assert!(matches!(
        SaveGame::import_string(&future),
        Err(GameError::CorruptSave { .. })
    ));
}

#[test]
fn failed_import_leaves_the_running_game_untouched() {
    let mut engine = played_engine();
    let antimatter_before = engine.antimatter;
    let bought_before = engine.dimension(1).unwrap().bought;

    assert!(SaveGame::import_string("{\"version\":1}").is_err());
    // Import is a pure parse; the engine only changes if the caller
    // restores from a successful result.
    assert_eq!(engine.antimatter, antimatter_before);
    assert_eq!(engine.dimension(1).unwrap().bought, bought_before);

    // And the engine keeps ticking normally afterwards.
    engine.apply(PlayerCommand::BuyDimension { tier: 1, count: 1 });
    assert!(engine.dimension(1).unwrap().bought > bought_before);
}

#[test]
fn store_persists_and_lists_save_slots() {
    let store = SaveStore::in_memory().unwrap();
    store.migrate().unwrap();
    // Idempotent migrations: opening twice must not fail.
    store.migrate().unwrap();

    assert!(store.read_save("main").unwrap().is_none());

    let now = Utc::now();
    let payload = played_engine().capture(now).export_string().unwrap();
    store.write_save("main", &payload, &now.to_rfc3339()).unwrap();

    let loaded = store.read_save("main").unwrap().expect("slot exists");
    assert_eq!(loaded, payload);

    // Round-trip through the store and back into an engine.
    let save = SaveGame::import_string(&loaded).unwrap();
    let (restored, _) = GameEngine::restore(GameConfig::standard(), save, now).unwrap();
    assert_eq!(restored.antimatter, played_engine().antimatter);

    // Overwrite keeps a single slot row.
    store.write_save("main", &payload, &now.to_rfc3339()).unwrap();
    store.write_save("alt", &payload, &now.to_rfc3339()).unwrap();
    let slots = store.list_slots().unwrap();
    assert_eq!(slots.len(), 2);

    assert!(store.delete_save("alt").unwrap());
    assert!(!store.delete_save("alt").unwrap());
    assert_eq!(store.list_slots().unwrap().len(), 1);
}
