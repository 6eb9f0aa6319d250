//! Space battle resolution
//!
//! Both sides exchange an ECM-mitigated alpha strike, then the side that
//! needs less time to wear down the other's defense pool wins. The loser is
//! wiped out; the winner takes the damage the loser dealt in that time.

use tracing::debug;

use crate::battle::autobattle::AutoBattle;
use crate::battle::damage::{
    apply_inventory_damage, apply_planet_damage, demolish_planet_defenses, destroy_fleet,
    inflicted, settle_fleet, DamageScope, DamageTarget,
};
use crate::battle::info::{BattleInfo, SpaceOutcome};
use crate::battle::rng::BattleRng;
use crate::battle::strength::{AttackDefense, Side, SpaceStrengths, MIN_DEFENSE};
use crate::core::types::FleetId;
use crate::world::Holder;

/// Compare times-to-kill; the shorter time wins
pub fn space_outcome(attacker_time: f64, defender_time: f64) -> SpaceOutcome {
    if attacker_time.is_infinite() && defender_time.is_infinite() {
        SpaceOutcome::Stalemate
    } else if attacker_time < defender_time {
        SpaceOutcome::AttackerVictory
    } else if attacker_time > defender_time {
        SpaceOutcome::DefenderVictory
    } else {
        SpaceOutcome::Draw
    }
}

/// Fraction of a side's damage the planet takes, in [0, 1]
pub fn planet_share(planet_defense: f64, side_defense: f64) -> f64 {
    (planet_defense / side_defense.max(MIN_DEFENSE)).clamp(0.0, 1.0)
}

/// Both sides after the opening alpha strikes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Engagement {
    pub attacker: AttackDefense,
    pub defender: AttackDefense,
    /// Chance the attacker's one-time weapons get through
    pub attacker_hit: f64,
    pub defender_hit: f64,
    pub attacker_time: f64,
    pub defender_time: f64,
}

impl Engagement {
    pub fn outcome(&self) -> SpaceOutcome {
        space_outcome(self.attacker_time, self.defender_time)
    }
}

impl<R: BattleRng> AutoBattle<'_, R> {
    /// Work out hit chances, alpha strikes and times-to-kill
    pub fn engage(&self, strengths: &SpaceStrengths) -> Engagement {
        let mut attacker = strengths.attacker;
        let mut defender = strengths.defender;
        let table = &self.rules.anti_ecm;
        let difficulty = self.config.difficulty;

        let attacker_hit =
            table.probability(difficulty, attacker.anti_ecm_average(), defender.ecm_average());
        let defender_hit =
            table.probability(difficulty, defender.anti_ecm_average(), attacker.ecm_average());

        defender.absorb_alpha_strike(strengths.attacker.onetime_attack * attacker_hit);
        attacker.absorb_alpha_strike(strengths.defender.onetime_attack * defender_hit);

        Engagement {
            attacker,
            defender,
            attacker_hit,
            defender_hit,
            attacker_time: attacker.time_to_kill(&defender),
            defender_time: defender.time_to_kill(&attacker),
        }
    }

    pub(crate) fn resolve_space(
        &mut self,
        battle: &mut BattleInfo,
        strengths: &SpaceStrengths,
    ) -> SpaceOutcome {
        let players = strengths.players();
        self.hooks.spacewar_start(&players, battle, strengths);

        let engagement = self.engage(strengths);
        let outcome = engagement.outcome();
        debug!(
            "Space battle: hit {:.2}/{:.2}, times {:.2}/{:.2} -> {:?}",
            engagement.attacker_hit,
            engagement.defender_hit,
            engagement.attacker_time,
            engagement.defender_time,
            outcome
        );

        match outcome {
            SpaceOutcome::AttackerVictory => self.attacker_holds_orbit(strengths, &engagement),
            SpaceOutcome::DefenderVictory => self.defender_holds_orbit(strengths, &engagement),
            SpaceOutcome::Draw => self.mutual_destruction(strengths),
            SpaceOutcome::Stalemate => {}
        }

        let attacker_owner = strengths.attacker_owner;
        let defender_owner = strengths.defender_owner;
        battle.space_outcome = Some(outcome);
        battle.spacewar_winner = match outcome {
            SpaceOutcome::AttackerVictory => Some(attacker_owner),
            SpaceOutcome::DefenderVictory => defender_owner,
            SpaceOutcome::Draw | SpaceOutcome::Stalemate => None,
        };
        battle.counters.space_battles += 1;

        for player in &players {
            let stats = self.world.stats_mut(*player);
            stats.space_battles += 1;
            if battle.spacewar_winner == Some(*player) {
                stats.space_wins += 1;
            } else if battle.spacewar_winner.is_some() {
                stats.space_losses += 1;
            }
        }

        for fleet_id in battle.fleets() {
            settle_fleet(self.world, self.hooks, fleet_id, false);
        }
        outcome
    }

    fn attacker_holds_orbit(&mut self, strengths: &SpaceStrengths, engagement: &Engagement) {
        let attacker_owner = Some(strengths.attacker_owner);
        for fleet_id in &strengths.defender_fleets {
            destroy_fleet(self.world, self.rules, self.hooks, *fleet_id, attacker_owner);
        }

        let damage = inflicted(engagement.attacker_time, engagement.defender.attack);
        let mut fleet_damage = damage;
        if let Some(planet) = strengths.planet_on(Side::Defender) {
            demolish_planet_defenses(self.world, self.rules, self.hooks, planet.planet, attacker_owner);
            let share = planet_share(planet.strength.defense, engagement.attacker.clamped_defense());
            fleet_damage = damage * (1.0 - share);
            apply_planet_damage(
                self.world,
                self.rules,
                self.hooks,
                planet.planet,
                damage * share,
                attacker_owner,
            );
        }

        debug!("Attacker fleets take {:.1} damage", fleet_damage);
        let holders = fleet_holders(&strengths.attacker_fleets);
        apply_inventory_damage(
            self.world,
            self.rules,
            self.hooks,
            DamageTarget::new(
                &holders,
                Holder::Fleet(strengths.attacker_fleets[0]),
                DamageScope::All,
            ),
            fleet_damage,
            strengths.defender_owner,
        );
    }

    fn defender_holds_orbit(&mut self, strengths: &SpaceStrengths, engagement: &Engagement) {
        let defender_owner = strengths.defender_owner;
        let attacker_owner = Some(strengths.attacker_owner);
        for fleet_id in &strengths.attacker_fleets {
            destroy_fleet(self.world, self.rules, self.hooks, *fleet_id, defender_owner);
        }

        let damage = inflicted(engagement.defender_time, engagement.attacker.attack);
        let mut fleet_damage = damage;
        if let Some(planet) = strengths.planet_on(Side::Defender) {
            let share = planet_share(planet.strength.defense, engagement.defender.clamped_defense());
            fleet_damage = damage * (1.0 - share);
            apply_planet_damage(
                self.world,
                self.rules,
                self.hooks,
                planet.planet,
                damage * share,
                attacker_owner,
            );
        }
        if let Some(planet) = strengths.planet_on(Side::Attacker) {
            demolish_planet_defenses(self.world, self.rules, self.hooks, planet.planet, defender_owner);
        }

        let Some(primary) = strengths.defender_fleets.first() else {
            return;
        };
        debug!("Defender fleets take {:.1} damage", fleet_damage);
        let holders = fleet_holders(&strengths.defender_fleets);
        apply_inventory_damage(
            self.world,
            self.rules,
            self.hooks,
            DamageTarget::new(&holders, Holder::Fleet(*primary), DamageScope::All),
            fleet_damage,
            attacker_owner,
        );
    }

    fn mutual_destruction(&mut self, strengths: &SpaceStrengths) {
        let attacker_owner = Some(strengths.attacker_owner);
        let defender_owner = strengths.defender_owner;
        for fleet_id in &strengths.attacker_fleets {
            destroy_fleet(self.world, self.rules, self.hooks, *fleet_id, defender_owner);
        }
        for fleet_id in &strengths.defender_fleets {
            destroy_fleet(self.world, self.rules, self.hooks, *fleet_id, attacker_owner);
        }
        if let Some(planet) = &strengths.planet {
            let opponent = match planet.side {
                Side::Attacker => defender_owner,
                Side::Defender => attacker_owner,
            };
            demolish_planet_defenses(self.world, self.rules, self.hooks, planet.planet, opponent);
        }
    }
}

fn fleet_holders(fleets: &[FleetId]) -> Vec<Holder> {
    fleets.iter().map(|id| Holder::Fleet(*id)).collect()
}
