//! Headless Autobattle Runner
//!
//! Resolves one battle from a scenario file and prints the outcome.

use std::path::PathBuf;
use std::process::ExitCode;

use autobattle::battle::{AutoBattle, BattleHooks, BattleInfo};
use autobattle::core::config::BattleConfig;
use autobattle::rules::load_rules;
use autobattle::world::{PlayerStats, World};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Headless Autobattle Runner - resolve one battle from a scenario file
#[derive(Parser, Debug)]
#[command(name = "autobattle_runner")]
#[command(about = "Resolve a space/ground battle and print winners and statistics")]
struct Args {
    /// Rules table (projectiles, equipment, items, buildings)
    #[arg(long, default_value = "data/rules.toml")]
    rules: PathBuf,

    /// Scenario JSON holding the world and the battle to resolve
    #[arg(long, default_value = "data/scenario.json")]
    scenario: PathBuf,

    /// Battle configuration; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging of battle phases
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Deserialize)]
struct Scenario {
    world: World,
    battle: BattleInfo,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    seed: u64,
    battle: BattleInfo,
    stats: Vec<PlayerStats>,
    world: World,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        "autobattle=debug"
    } else {
        "autobattle=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let rules = load_rules(&args.rules)?;
    let config = match &args.config {
        Some(path) => BattleConfig::load_from_toml(path)?,
        None => BattleConfig::default(),
    };
    let content = std::fs::read_to_string(&args.scenario)?;
    let Scenario { mut world, mut battle } = serde_json::from_str(&content)?;

    let mut hooks = BattleHooks::new();
    let mut engine = AutoBattle::new(&mut world, &rules, &config, &mut rng, &mut hooks);
    engine.resolve(&mut battle)?;

    let result = RunResult {
        seed,
        stats: world.stats.clone(),
        battle,
        world,
    };

    match args.format.as_str() {
        "text" => print_text(&result),
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

fn print_text(result: &RunResult) {
    let battle = &result.battle;
    println!("Battle Result");
    println!("=============");
    println!(
        "Space:  {:?} (winner {:?})",
        battle.space_outcome, battle.spacewar_winner
    );
    println!(
        "Ground: {:?} (winner {:?})",
        battle.ground_outcome, battle.groundwar_winner
    );
    println!(
        "Rounds: {} skirmish, {} buildings destroyed ({} outranged)",
        battle.counters.skirmish_rounds,
        battle.counters.buildings_destroyed,
        battle.counters.buildings_outranged
    );
    println!();

    for stats in &result.stats {
        let Some(player) = stats.player else {
            continue;
        };
        println!("Player {}", player.0);
        println!(
            "  ships    lost {:>4} ({:.0})  destroyed {:>4} ({:.0})",
            stats.ships_lost, stats.ships_lost_cost, stats.ships_destroyed, stats.ships_destroyed_cost
        );
        println!(
            "  vehicles lost {:>4} ({:.0})  destroyed {:>4} ({:.0})",
            stats.vehicles_lost,
            stats.vehicles_lost_cost,
            stats.vehicles_destroyed,
            stats.vehicles_destroyed_cost
        );
        println!(
            "  buildings lost {:>3} ({:.0})  destroyed {:>3} ({:.0})",
            stats.buildings_lost,
            stats.buildings_lost_cost,
            stats.buildings_destroyed,
            stats.buildings_destroyed_cost
        );
        println!(
            "  fleets lost {}, planets conquered {}, planets lost {}",
            stats.fleets_lost, stats.planets_conquered, stats.planets_lost
        );
    }

    for planet in &result.world.planets {
        println!(
            "Planet {} owner {:?} population {} morale {:.0}",
            planet.name, planet.owner, planet.population, planet.morale
        );
    }
    println!("Seed: {}", result.seed);
}
