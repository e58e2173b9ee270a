//! sim-runner: headless runner for the antimatter engine.
//!
//! Usage:
//!   sim-runner --seconds 3600 --dt 0.1
//!   sim-runner --seconds 7200 --strategy greedy --db saves.db --slot main
//!   sim-runner --load --db saves.db --slot main --seconds 600

use antimatter_core::{
    command::PlayerCommand,
    config::GameConfig,
    engine::GameEngine,
    error::GameError,
    event::GameEvent,
    store::SaveStore,
};
use anyhow::Result;
use chrono::Utc;
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seconds = parse_arg(&args, "--seconds", 3600.0f64);
    let dt = parse_arg(&args, "--dt", 0.1f64);
    let strategy = args
        .windows(2)
        .find(|w| w[0] == "--strategy")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "greedy".to_string());
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].clone());
    let slot = args
        .windows(2)
        .find(|w| w[0] == "--slot")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "main".to_string());
    let load = args.iter().any(|a| a == "--load");
    let export = args.iter().any(|a| a == "--export");

    println!("antimatter sim-runner");
    println!("  seconds:   {seconds}");
    println!("  dt:        {dt}");
    println!("  strategy:  {strategy}");
    if let Some(db) = &db {
        println!("  db:        {db} (slot '{slot}')");
    }
    println!();

    let store = match &db {
        Some(path) => {
            let store = SaveStore::open(path)?;
            store.migrate()?;
            Some(store)
        }
        None => None,
    };

    let mut engine = if load {
        let store = store
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("--load requires --db"))?;
        let payload = store
            .read_save(&slot)?
            .ok_or_else(|| GameError::SlotNotFound { slot: slot.clone() })?;
        let save = antimatter_core::save::SaveGame::import_string(&payload)?;
        let (engine, events) = GameEngine::restore(GameConfig::standard(), save, Utc::now())?;
        report_events(&events);
        engine
    } else {
        GameEngine::standard()
    };

    let steps = (seconds / dt).ceil() as u64;
    let mut purchase_clock = 0.0f64;
    for _ in 0..steps {
        let events = engine.tick(dt);
        report_events(&events);
        if engine.is_terminal() {
            break;
        }

        // The scripted player acts about once per second.
        purchase_clock += dt;
        if strategy == "greedy" && purchase_clock >= 1.0 {
            purchase_clock = 0.0;
            run_greedy_player(&mut engine);
        }
    }

    print_summary(&engine);

    if let Some(store) = &store {
        let now = Utc::now();
        let payload = engine.capture(now).export_string()?;
        store.write_save(&slot, &payload, &now.to_rfc3339())?;
        println!("\nSaved to slot '{slot}'.");
        if export {
            println!("\nexport string:\n{payload}");
        }
    } else if export {
        let payload = engine.capture(Utc::now()).export_string()?;
        println!("\nexport string:\n{payload}");
    }

    Ok(())
}

/// Spend everything, most expensive tiers first, then accelerate, then
/// reset the moment a prestige pays out.
fn run_greedy_player(engine: &mut GameEngine) {
    let (outcome, events) = engine.apply(PlayerCommand::DoPrestige);
    report_events(&events);
    if outcome.is_applied() {
        return;
    }
    for tier in (1..=8u8).rev() {
        let (_, events) = engine.apply(PlayerCommand::BuyMaxDimension { tier });
        report_events(&events);
    }
    let (_, events) = engine.apply(PlayerCommand::BuyTickspeed);
    report_events(&events);
}

fn report_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::DimensionUnlocked { tier } => {
                println!("  >> dimension {tier} unlocked");
            }
            GameEvent::PrestigePerformed { points_gained, total_prestiges } => {
                println!("  >> prestige #{total_prestiges} (+{points_gained} points)");
            }
            GameEvent::MilestoneUnlocked { required_prestiges, reward } => {
                println!("  >> milestone at {required_prestiges} prestiges: {reward:?}");
            }
            GameEvent::OfflineProgressApplied {
                elapsed_seconds, accumulated_seconds, ..
            } => {
                println!(
                    "  >> offline: {:.0}s away, banked {:.0}s",
                    elapsed_seconds, accumulated_seconds
                );
            }
            GameEvent::InfinityReached => {
                println!("  >> INFINITY REACHED");
            }
            _ => log::debug!("{event:?}"),
        }
    }
}

fn print_summary(engine: &GameEngine) {
    println!("\n===== RUN SUMMARY =====");
    println!("antimatter:      {}", engine.antimatter);
    println!("time scale:      x{:.2}", engine.effective_time_scale());
    println!(
        "prestige:        {} points, {} resets",
        engine.prestige.points, engine.prestige.total_prestiges
    );
    println!(
        "offline bank:    {:.0}s / {:.0}s at {:.0}%",
        engine.offline.stored_seconds,
        engine.offline.max_seconds(),
        engine.offline.efficiency_ratio() * 100.0
    );
    println!("dimensions:");
    for dim in engine.dimensions() {
        println!(
            "  tier {}: amount {:>12} bought {:>4} {}",
            dim.tier,
            dim.amount.to_string(),
            dim.bought,
            if dim.unlocked { "" } else { "(locked)" }
        );
    }
    println!("milestones:");
    for milestone in engine.prestige.milestones() {
        println!(
            "  {} prestiges: {:?} {}",
            milestone.required_prestiges,
            milestone.reward,
            if milestone.unlocked { "[unlocked]" } else { "" }
        );
    }
    if engine.is_terminal() {
        println!("terminal:        infinity reached");
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
