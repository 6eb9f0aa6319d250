//! Automatic battle orchestration
//!
//! `AutoBattle` borrows everything one resolution needs and runs a battle
//! from orbit to landing:
//!
//! 1. Aggregate both sides (`compute_strengths`)
//! 2. Fight for orbit if anything opposes the attacker there
//! 3. If the attacker holds orbit over an enemy planet, land: fight the
//!    garrison, or take the planet outright when it has no ground defense
//! 4. Notify the players' AIs that the battle is over
//!
//! Resolution mutates the world in place. Callers resolve battles one at a
//! time and never concurrently on overlapping fleets or planets.

use tracing::info;

use crate::battle::hooks::BattleHooks;
use crate::battle::info::{BattleInfo, GroundOutcome};
use crate::battle::rng::BattleRng;
use crate::battle::strength::{compute_strengths, SpaceStrengths};
use crate::core::config::BattleConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::{FleetId, PlanetId, PlayerId};
use crate::rules::catalog::RulesCatalog;
use crate::world::World;

/// Battle resolver bound to one world for the duration of a pass
pub struct AutoBattle<'a, R: BattleRng> {
    pub(crate) world: &'a mut World,
    pub(crate) rules: &'a RulesCatalog,
    pub(crate) config: &'a BattleConfig,
    pub(crate) rng: &'a mut R,
    pub(crate) hooks: &'a mut BattleHooks,
}

impl<'a, R: BattleRng> AutoBattle<'a, R> {
    pub fn new(
        world: &'a mut World,
        rules: &'a RulesCatalog,
        config: &'a BattleConfig,
        rng: &'a mut R,
        hooks: &'a mut BattleHooks,
    ) -> Self {
        Self {
            world,
            rules,
            config,
            rng,
            hooks,
        }
    }

    pub fn world(&self) -> &World {
        self.world
    }

    /// Preview both sides without resolving anything
    pub fn strengths(&self, battle: &BattleInfo) -> Result<SpaceStrengths> {
        compute_strengths(self.world, self.rules, battle)
    }

    /// Resolve one battle, writing outcomes into `battle`
    ///
    /// Fails before touching the world if the attacker fleet or a named
    /// participant does not exist, or if the attacker has nobody to fight.
    pub fn resolve(&mut self, battle: &mut BattleInfo) -> Result<()> {
        if battle.participants().nth(1).is_none() {
            return Err(BattleError::NoOpponent(battle.attacker()));
        }
        let strengths = compute_strengths(self.world, self.rules, battle)?;
        let players = strengths.players();
        let attacker_owner = strengths.attacker_owner;

        if strengths.needs_space_battle() {
            self.resolve_space(battle, &strengths);
        } else {
            tracing::debug!("Orbit uncontested, attacker {:?} holds it", attacker_owner);
            battle.spacewar_winner = Some(attacker_owner);
        }

        let attacker = battle.attacker();
        if let Some(planet_id) = battle.target_planet() {
            if battle.spacewar_winner == Some(attacker_owner) {
                self.land(battle, attacker, planet_id, attacker_owner)?;
            }
        }

        info!(
            "Battle of fleet {:?}: space {:?} ({:?}), ground {:?} ({:?})",
            attacker,
            battle.space_outcome,
            battle.spacewar_winner,
            battle.ground_outcome,
            battle.groundwar_winner
        );
        self.hooks.autobattle_finish(&players, battle);
        Ok(())
    }

    /// Put the attacker's ground units on an enemy planet
    fn land(
        &mut self,
        battle: &mut BattleInfo,
        fleet_id: FleetId,
        planet_id: PlanetId,
        attacker_owner: PlayerId,
    ) -> Result<Option<GroundOutcome>> {
        let Some(fleet) = self.world.fleet(fleet_id) else {
            return Ok(None);
        };
        let planet = self
            .world
            .planet(planet_id)
            .ok_or(BattleError::PlanetNotFound(planet_id))?;

        if planet.owner == Some(attacker_owner) || !fleet.has_ground_units(self.rules) {
            return Ok(None);
        }

        let outcome = if planet.has_ground_defense(self.rules) {
            self.resolve_ground(battle, fleet_id, planet_id)?
        } else {
            self.conquer_planet(battle, planet_id, attacker_owner, true)
        };
        Ok(Some(outcome))
    }
}
