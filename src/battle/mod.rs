//! Battle system - automatic resolution of space and ground engagements
//!
//! No per-frame simulation: both sides are collapsed into aggregate
//! attack/defense figures and compared by time-to-kill.
//!
//! Key pieces:
//! - Strength aggregation turns fleets and planets into `AttackDefense`
//! - Damage application spends a hitpoint pool on the cheapest stock first
//! - Space resolution adds ECM-mitigated alpha strikes
//! - Ground resolution runs vehicle combat, then randomized skirmish rounds
//!   against defensive buildings

pub mod autobattle;
pub mod constants;
pub mod damage;
pub mod ground;
pub mod hooks;
pub mod info;
pub mod rng;
pub mod space;
pub mod strength;

// Re-exports for convenient access
pub use autobattle::AutoBattle;
pub use constants::*;
pub use damage::{
    apply_building_damage, apply_inventory_damage, apply_planet_damage,
    demolish_planet_defenses, destroy_building, destroy_fleet, destroy_items, DamageReport,
    DamageScope, DamageTarget,
};
pub use ground::{expand_units, turret_strength, unit_strength, GroundwarUnit};
pub use hooks::{BattleHooks, PlayerAi, ScriptHooks};
pub use info::{
    BattleCounters, BattleInfo, Combatant, GroundOutcome, Participant, Role, SpaceOutcome,
};
pub use rng::BattleRng;
pub use space::{planet_share, space_outcome, Engagement};
pub use strength::{
    compute_strengths, fleet_strength, planet_strength, shield_percentage, AttackDefense,
    PlanetStrength, Side, SpaceStrengths,
};
