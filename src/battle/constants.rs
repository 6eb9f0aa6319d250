//! Battle engine constants - fixed values the resolver relies on
//!
//! Tunable outcome values (population losses, accessibility) are defaults
//! for `BattleConfig`; everything else here is an engine invariant.

// Terminal planet effects (population)
pub const PLANET_DEFENSE_LOSS: u32 = 100;
pub const PLANET_CONQUER_LOSS: u32 = 200;

// A building below this efficiency does not take part in combat
pub const OPERATIONAL_EFFICIENCY: f64 = 0.5;

// Below this health ratio only half of a building's turrets fire
pub const DAMAGED_TURRET_RATIO: f64 = 0.5;
pub const DAMAGED_TURRET_FACTOR: f64 = 0.5;

// Shield buildings can never make a planet invulnerable
pub const MAX_SHIELD_PERCENTAGE: f64 = 90.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conquest_costs_more_than_defense() {
        assert!(PLANET_CONQUER_LOSS > PLANET_DEFENSE_LOSS);
    }

    #[test]
    fn test_shield_cap_below_total() {
        assert!(MAX_SHIELD_PERCENTAGE < 100.0);
        assert!(MAX_SHIELD_PERCENTAGE > 0.0);
    }
}
