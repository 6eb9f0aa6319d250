//! Ground battle resolution
//!
//! Phase A pits the landing vehicles against the garrison's vehicles in one
//! time-to-kill comparison. Survivors then assault each operational defensive
//! building in turn: outranged buildings fall at once, the rest are fought in
//! skirmish rounds where a random handful of vehicles engages at a time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::autobattle::AutoBattle;
use crate::battle::constants::{DAMAGED_TURRET_FACTOR, DAMAGED_TURRET_RATIO};
use crate::battle::damage::{
    apply_inventory_damage, damage_building, destroy_building, destroy_items, effective_hitpoints,
    inflicted, loss_kind, record_casualties, settle_fleet, DamageScope, DamageTarget,
};
use crate::battle::info::{BattleInfo, GroundOutcome};
use crate::battle::rng::BattleRng;
use crate::battle::strength::{shield_percentage, AttackDefense};
use crate::core::error::{BattleError, Result};
use crate::core::types::{BuildingId, FleetId, ItemId, PlanetId, PlayerId};
use crate::rules::catalog::{BuildingType, Capabilities, RulesCatalog};
use crate::world::{Building, Holder, InventoryItem, LossKind};

/// One vehicle taking part in a ground battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundwarUnit {
    /// Stack this unit was expanded from
    pub item: ItemId,
    pub owner: PlayerId,
    /// Hull plus shield left
    pub hp: f64,
    pub damage: f64,
    pub delay: f64,
    pub range: f64,
    pub cost: f64,
}

impl GroundwarUnit {
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }
}

/// Expand every tank and vehicle stack into one unit per instance
pub fn expand_units(inventory: &[InventoryItem], rules: &RulesCatalog) -> Vec<GroundwarUnit> {
    let mut units = Vec::new();
    for item in inventory.iter().filter(|i| !i.is_empty()) {
        let Some(item_type) = rules.item(&item.type_id) else {
            continue;
        };
        if !item_type.category.is_ground() {
            continue;
        }
        // Without a vehicle profile the unit still soaks damage
        let vehicle = item_type.vehicle.unwrap_or_default();
        for _ in 0..item.count {
            units.push(GroundwarUnit {
                item: item.id,
                owner: item.owner,
                hp: item.unit_value(),
                damage: vehicle.damage,
                delay: vehicle.delay,
                range: vehicle.range,
                cost: item_type.production_cost,
            });
        }
    }
    units
}

/// Aggregate strength of a group of vehicles
pub fn unit_strength(units: &[GroundwarUnit]) -> AttackDefense {
    let mut ad = AttackDefense::default();
    for unit in units.iter().filter(|u| u.is_alive()) {
        if unit.delay > 0.0 {
            ad.attack += unit.damage / unit.delay;
        }
        ad.defense += unit.hp;
        ad.structures += 1;
    }
    ad
}

/// Ground strength of one defensive building
///
/// Turrets fire at half rate once the building drops below half health.
pub fn turret_strength(
    building: &Building,
    building_type: &BuildingType,
    shield: f64,
) -> AttackDefense {
    let factor = if building.health_ratio(building_type) < DAMAGED_TURRET_RATIO {
        DAMAGED_TURRET_FACTOR
    } else {
        1.0
    };
    let mut ad = AttackDefense {
        defense: effective_hitpoints(building.hitpoints, shield),
        structures: 1,
        ..Default::default()
    };
    for turret in building_type.turrets.iter().filter(|t| t.delay > 0.0) {
        ad.attack += turret.count as f64 * factor * turret.damage / turret.delay;
    }
    ad
}

/// Spread `pool` over units, cheapest first; returns how many died
pub fn damage_units(units: &mut [GroundwarUnit], pool: f64) -> usize {
    let mut order: Vec<usize> = (0..units.len()).collect();
    order.sort_by(|a, b| units[*a].cost.total_cmp(&units[*b].cost));

    let mut remaining = pool;
    let mut dead = 0;
    for index in order {
        if remaining.is_nan() || remaining <= 0.0 {
            break;
        }
        let unit = &mut units[index];
        if remaining >= unit.hp {
            remaining -= unit.hp;
            unit.hp = 0.0;
            dead += 1;
        } else {
            unit.hp -= remaining;
            remaining = 0.0;
        }
    }
    dead
}

impl<R: BattleRng> AutoBattle<'_, R> {
    pub(crate) fn resolve_ground(
        &mut self,
        battle: &mut BattleInfo,
        fleet_id: FleetId,
        planet_id: PlanetId,
    ) -> Result<GroundOutcome> {
        let fleet = self.world.fleet(fleet_id).ok_or(BattleError::FleetNotFound(fleet_id))?;
        let planet = self.world.planet(planet_id).ok_or(BattleError::PlanetNotFound(planet_id))?;
        let attacker_owner = fleet.owner;
        let defender_owner = planet.owner;

        let attackers = expand_units(&fleet.inventory, self.rules);
        let defenders = expand_units(&planet.inventory, self.rules);
        let attack = unit_strength(&attackers);
        let defense = unit_strength(&defenders);

        let mut players = vec![attacker_owner];
        players.extend(defender_owner.filter(|p| *p != attacker_owner));
        self.hooks.groundwar_start(&players, battle, &attack, &defense);

        battle.counters.ground_battles += 1;
        for player in &players {
            self.world.stats_mut(*player).ground_battles += 1;
        }

        let fleet_holder = Holder::Fleet(fleet_id);
        let planet_holder = Holder::Planet(planet_id);

        if !defenders.is_empty() {
            let attacker_time = attack.time_to_kill(&defense);
            let defender_time = defense.time_to_kill(&attack);
            debug!(
                "Ground phase A: {} vs {} vehicles, times {:.2}/{:.2}",
                attackers.len(),
                defenders.len(),
                attacker_time,
                defender_time
            );

            if defender_time <= attacker_time {
                destroy_items(
                    self.world,
                    self.rules,
                    self.hooks,
                    fleet_holder,
                    DamageScope::Ground,
                    defender_owner,
                );
                let dealt = inflicted(defender_time, attack.attack);
                self.apply_ground_damage(planet_holder, dealt, Some(attacker_owner));
                return Ok(self.defend_planet(battle, planet_id, attacker_owner));
            }

            destroy_items(
                self.world,
                self.rules,
                self.hooks,
                planet_holder,
                DamageScope::Ground,
                Some(attacker_owner),
            );
            let taken = inflicted(attacker_time, defense.attack);
            self.apply_ground_damage(fleet_holder, taken, defender_owner);
        }

        let defensive = self
            .world
            .planet(planet_id)
            .map(|p| p.operational_with(self.rules, Capabilities::GROUND_TURRETS))
            .unwrap_or_default();
        if !defensive.is_empty() {
            if let Some(fleet) = self.world.fleet(fleet_id) {
                let mut units = expand_units(&fleet.inventory, self.rules);
                self.rng.shuffle(&mut units);
                for building_id in defensive {
                    if units.is_empty() {
                        break;
                    }
                    self.assault_building(battle, planet_id, building_id, &mut units, attacker_owner);
                }
                self.write_back_units(fleet_id, &units, defender_owner);
            }
        }

        if let Some(planet) = self.world.planet_mut(planet_id) {
            planet.prune();
        }
        let attacker_left = self
            .world
            .fleet(fleet_id)
            .is_some_and(|f| f.has_ground_units(self.rules));
        if attacker_left {
            Ok(self.conquer_planet(battle, planet_id, attacker_owner, false))
        } else {
            Ok(self.defend_planet(battle, planet_id, attacker_owner))
        }
    }

    fn apply_ground_damage(&mut self, holder: Holder, pool: f64, opponent: Option<PlayerId>) {
        apply_inventory_damage(
            self.world,
            self.rules,
            self.hooks,
            DamageTarget::single(&holder, DamageScope::Ground),
            pool,
            opponent,
        );
    }

    /// Fight one defensive building until it falls or the attackers run out
    fn assault_building(
        &mut self,
        battle: &mut BattleInfo,
        planet_id: PlanetId,
        building_id: BuildingId,
        units: &mut Vec<GroundwarUnit>,
        attacker_owner: PlayerId,
    ) {
        let rules = self.rules;
        let Some(building_type) = self
            .world
            .planet(planet_id)
            .and_then(|p| p.building(building_id))
            .and_then(|b| rules.building(&b.type_id))
        else {
            return;
        };

        let turret_range = building_type.best_turret_range();
        let unit_range = units.iter().map(|u| u.range).fold(0.0, f64::max);
        if unit_range > turret_range {
            debug!(
                "{} outranged ({:.1} > {:.1}), destroyed without a fight",
                building_type.id, unit_range, turret_range
            );
            if destroy_building(self.world, rules, planet_id, building_id, Some(attacker_owner)) {
                battle.counters.buildings_destroyed += 1;
                battle.counters.buildings_outranged += 1;
            }
            return;
        }

        let (min, max) = (self.config.min_accessibility, self.config.max_accessibility);
        while !units.is_empty() {
            let Some(planet) = self.world.planet(planet_id) else {
                return;
            };
            let Some(building) = planet.building(building_id) else {
                return;
            };
            let shield = shield_percentage(planet, rules);
            let defense = turret_strength(building, building_type, shield);

            let engaged = (self.rng.random_range(min, max) as usize).clamp(1, units.len());
            let attack = unit_strength(&units[..engaged]);
            let attacker_time = attack.time_to_kill(&defense);
            let defender_time = defense.time_to_kill(&attack);
            battle.counters.skirmish_rounds += 1;

            if defense.attack <= 0.0 || attacker_time < defender_time {
                let taken = inflicted(attacker_time, defense.attack);
                let dead = damage_units(&mut units[..engaged], taken);
                units.retain(|u| u.is_alive());
                debug!(
                    "{} falls to {} vehicles, {} lost",
                    building_type.id, engaged, dead
                );
                if destroy_building(self.world, rules, planet_id, building_id, Some(attacker_owner)) {
                    battle.counters.buildings_destroyed += 1;
                }
                return;
            }

            // The engaged group is wiped out, dealing what it could meanwhile
            let dealt = inflicted(defender_time, attack.attack);
            units.drain(..engaged);
            let (_, destroyed) = damage_building(
                self.world,
                rules,
                planet_id,
                building_id,
                dealt,
                shield,
                Some(attacker_owner),
            );
            debug!(
                "{} repels {} vehicles, taking {:.1} damage",
                building_type.id, engaged, dealt
            );
            if destroyed {
                battle.counters.buildings_destroyed += 1;
                return;
            }
        }
    }

    /// Copy surviving skirmish units back onto their stacks
    ///
    /// Each stack keeps as many units as survived, all at their mean hp.
    fn write_back_units(
        &mut self,
        fleet_id: FleetId,
        units: &[GroundwarUnit],
        opponent: Option<PlayerId>,
    ) {
        let rules = self.rules;
        let Some(fleet) = self.world.fleet_mut(fleet_id) else {
            return;
        };
        let owner = fleet.owner;

        let mut losses = Vec::new();
        for item in fleet.inventory.iter_mut() {
            if !rules.item_category(&item.type_id).is_some_and(|c| c.is_ground()) {
                continue;
            }
            let survivors: Vec<f64> = units
                .iter()
                .filter(|u| u.item == item.id)
                .map(|u| u.hp)
                .collect();
            let dead = item.count.saturating_sub(survivors.len() as u32);
            if dead > 0 {
                losses.push((dead, rules.item_cost(&item.type_id) * dead as f64));
            }
            item.count = survivors.len() as u32;
            if !survivors.is_empty() {
                let mean = survivors.iter().sum::<f64>() / survivors.len() as f64;
                let lost = (item.unit_value() - mean).max(0.0);
                item.shield = (item.shield - lost).max(0.0);
                item.hp = (mean - item.shield).max(0.0);
            }
        }

        let lost_any = !losses.is_empty();
        for (count, cost) in losses {
            record_casualties(self.world, Some(owner), opponent, LossKind::Vehicle, count, cost);
        }
        settle_fleet(self.world, self.hooks, fleet_id, lost_any);
    }

    /// The garrison held: population loss, statistics, notification
    pub(crate) fn defend_planet(
        &mut self,
        battle: &mut BattleInfo,
        planet_id: PlanetId,
        attacker: PlayerId,
    ) -> GroundOutcome {
        let rules = self.rules;
        let base = self.config.planet_defense_loss;
        let mut defender = None;
        if let Some(planet) = self.world.planet_mut(planet_id) {
            let loss = self.config.population_loss(base, planet.has_operational_bunker(rules));
            planet.lose_population(loss);
            defender = planet.owner;
            debug!("Planet {} defended, population -{}", planet.name, loss);
        }

        self.world.stats_mut(attacker).ground_losses += 1;
        if let Some(defender) = defender {
            self.world.stats_mut(defender).ground_wins += 1;
        }
        self.hooks.planet_defended(planet_id, defender);

        battle.groundwar_winner = defender;
        battle.ground_outcome = Some(GroundOutcome::Defended);
        GroundOutcome::Defended
    }

    /// Hand the planet to `new_owner`
    ///
    /// Whatever the previous owner still kept on the planet is lost with it.
    pub(crate) fn conquer_planet(
        &mut self,
        battle: &mut BattleInfo,
        planet_id: PlanetId,
        new_owner: PlayerId,
        instant: bool,
    ) -> GroundOutcome {
        let rules = self.rules;
        let base = self.config.planet_conquer_loss;
        let morale = self.config.takeover_morale;
        let Some(planet) = self.world.planet_mut(planet_id) else {
            return GroundOutcome::Defended;
        };

        let old_owner = planet.owner;
        let loss = self.config.population_loss(base, planet.has_operational_bunker(rules));
        planet.lose_population(loss);
        planet.owner = Some(new_owner);
        planet.morale = morale;

        let (kept, abandoned): (Vec<_>, Vec<_>) = std::mem::take(&mut planet.inventory)
            .into_iter()
            .partition(|i| i.owner == new_owner);
        planet.inventory = kept;
        planet.rebuild_roads();
        debug!("Planet {} taken by {:?}, population -{}", planet.name, new_owner, loss);

        for item in abandoned.iter().filter(|i| !i.is_empty()) {
            let cost = rules.item_cost(&item.type_id) * item.count as f64;
            let kind = loss_kind(rules.item_category(&item.type_id));
            let owner = Some(item.owner);
            record_casualties(self.world, owner, Some(new_owner), kind, item.count, cost);
        }

        let stats = self.world.stats_mut(new_owner);
        stats.planets_conquered += 1;
        if !instant {
            stats.ground_wins += 1;
        }
        if let Some(old_owner) = old_owner {
            let stats = self.world.stats_mut(old_owner);
            stats.planets_lost += 1;
            if !instant {
                stats.ground_losses += 1;
            }
        }
        self.hooks.planet_conquered(planet_id, new_owner, old_owner);

        let outcome = if instant {
            GroundOutcome::InstantTakeover
        } else {
            GroundOutcome::Conquered
        };
        battle.groundwar_winner = Some(new_owner);
        battle.ground_outcome = Some(outcome);
        battle.show_landing = true;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::{BuildingKind, GroundTurret};

    fn unit(item: u32, hp: f64, cost: f64) -> GroundwarUnit {
        GroundwarUnit {
            item: ItemId(item),
            owner: PlayerId(1),
            hp,
            damage: 10.0,
            delay: 2.0,
            range: 3.0,
            cost,
        }
    }

    fn fort() -> BuildingType {
        BuildingType {
            id: "Fort".into(),
            kind: BuildingKind::Defensive,
            hitpoints: 200.0,
            production_cost: 300.0,
            space: None,
            shield_percentage: 0.0,
            turrets: vec![GroundTurret { damage: 20.0, delay: 2.0, range: 4.0, count: 2 }],
        }
    }

    #[test]
    fn test_unit_strength_skips_dead() {
        let units = vec![unit(1, 30.0, 10.0), unit(1, 0.0, 10.0)];
        let ad = unit_strength(&units);
        assert_eq!(ad.attack, 5.0);
        assert_eq!(ad.defense, 30.0);
        assert_eq!(ad.structures, 1);
    }

    #[test]
    fn test_damaged_turrets_fire_at_half_rate() {
        let fort = fort();
        let mut building = Building::new(BuildingId(1), &fort);
        assert_eq!(turret_strength(&building, &fort, 0.0).attack, 20.0);

        building.hitpoints = 90.0;
        let ad = turret_strength(&building, &fort, 0.0);
        assert_eq!(ad.attack, 10.0);
        assert_eq!(ad.defense, 90.0);

        // 50% shields double the effective hitpoints
        assert_eq!(turret_strength(&building, &fort, 50.0).defense, 180.0);
    }

    #[test]
    fn test_damage_units_cheapest_first() {
        let mut units = vec![unit(1, 30.0, 50.0), unit(2, 20.0, 10.0), unit(3, 20.0, 20.0)];
        let dead = damage_units(&mut units, 45.0);
        assert_eq!(dead, 2);
        assert_eq!(units[0].hp, 25.0);
        assert_eq!(units[1].hp, 0.0);
        assert_eq!(units[2].hp, 0.0);
    }
}
