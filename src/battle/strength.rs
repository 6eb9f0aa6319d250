//! Strength aggregation - collapse fleets and planets into comparable figures
//!
//! Pure functions: nothing here mutates the world. Incomplete data (unknown
//! equipment, projectiles or building types) contributes zero attack but
//! still counts toward defense.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

use crate::battle::constants::MAX_SHIELD_PERCENTAGE;
use crate::battle::info::BattleInfo;
use crate::core::error::{BattleError, Result};
use crate::core::types::{FleetId, PlanetId, PlayerId};
use crate::rules::catalog::{Capabilities, Projectile, RulesCatalog};
use crate::world::{Fleet, InventoryItem, Planet, World};

/// Smallest defense pool used as a divisor
pub const MIN_DEFENSE: f64 = 1.0;

/// Aggregate combat statistic of one participant or side
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackDefense {
    /// Sustained damage per unit of time
    pub attack: f64,
    /// Alpha-strike damage delivered once per battle
    pub onetime_attack: f64,
    /// Hitpoints (hull plus shields) the side can absorb
    pub defense: f64,
    /// Unit and building instances contributing
    pub structures: u32,
    pub ecm_sum: f64,
    pub ecm_count: u32,
    pub anti_ecm_sum: f64,
    pub anti_ecm_count: u32,
}

impl AttackDefense {
    pub fn clamped_defense(&self) -> f64 {
        self.defense.max(MIN_DEFENSE)
    }

    pub fn ecm_average(&self) -> f64 {
        if self.ecm_count == 0 {
            return 0.0;
        }
        self.ecm_sum / self.ecm_count as f64
    }

    pub fn anti_ecm_average(&self) -> f64 {
        if self.anti_ecm_count == 0 {
            return 0.0;
        }
        self.anti_ecm_sum / self.anti_ecm_count as f64
    }

    /// Time this side needs to destroy `target`; infinite without attack
    pub fn time_to_kill(&self, target: &AttackDefense) -> f64 {
        if self.attack <= 0.0 {
            return f64::INFINITY;
        }
        target.clamped_defense() / self.attack
    }

    /// Remove an opening strike from the defense pool, keeping it >= 1
    pub fn absorb_alpha_strike(&mut self, damage: f64) {
        self.defense = (self.defense - damage.max(0.0)).max(MIN_DEFENSE);
    }

    /// Add `units` copies of a weapon firing `projectile`
    pub fn add_weapon(&mut self, projectile: &Projectile, units: f64) {
        if projectile.kind.is_one_time() {
            self.onetime_attack += units * projectile.damage;
        } else if projectile.delay > 0.0 {
            self.attack += units * projectile.damage / projectile.delay;
        }
    }

    /// Fold one inventory stack into this statistic
    pub fn add_item(&mut self, item: &InventoryItem, rules: &RulesCatalog) {
        if item.count == 0 {
            return;
        }
        let count = item.count as f64;
        self.defense += item.hp.max(0.0) * count + item.shield.max(0.0) * count;
        self.structures += item.count;

        for slot in item.slots.iter().filter(|s| s.count > 0) {
            let Some(equipment_id) = slot.equipment.as_deref() else {
                continue;
            };
            let Some(equipment) = rules.equipment(equipment_id) else {
                tracing::trace!("No equipment definition for {}", equipment_id);
                continue;
            };

            if let Some(ecm) = equipment.ecm {
                self.ecm_sum += ecm * count;
                self.ecm_count += item.count;
            }
            if let Some(anti_ecm) = equipment.anti_ecm {
                self.anti_ecm_sum += anti_ecm * count;
                self.anti_ecm_count += item.count;
            }
            if let Some(projectile_id) = equipment.projectile.as_deref() {
                match rules.projectile(projectile_id) {
                    Some(projectile) => self.add_weapon(projectile, count * slot.count as f64),
                    None => tracing::trace!("No projectile definition for {}", projectile_id),
                }
            }
        }
    }
}

impl Add for AttackDefense {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            attack: self.attack + rhs.attack,
            onetime_attack: self.onetime_attack + rhs.onetime_attack,
            defense: self.defense + rhs.defense,
            structures: self.structures + rhs.structures,
            ecm_sum: self.ecm_sum + rhs.ecm_sum,
            ecm_count: self.ecm_count + rhs.ecm_count,
            anti_ecm_sum: self.anti_ecm_sum + rhs.anti_ecm_sum,
            anti_ecm_count: self.anti_ecm_count + rhs.anti_ecm_count,
        }
    }
}

impl AddAssign for AttackDefense {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Space strength of a fleet (every stack counts)
pub fn fleet_strength(fleet: &Fleet, rules: &RulesCatalog) -> AttackDefense {
    let mut ad = AttackDefense::default();
    for item in &fleet.inventory {
        ad.add_item(item, rules);
    }
    ad
}

/// Damage reduction from the planet's operational shield buildings, in percent
pub fn shield_percentage(planet: &Planet, rules: &RulesCatalog) -> f64 {
    let total: f64 = planet
        .buildings
        .iter()
        .filter(|b| b.is_operational())
        .filter_map(|b| rules.building(&b.type_id).map(|t| (b, t)))
        .filter(|(_, t)| t.capabilities().contains(Capabilities::IS_SHIELD))
        .map(|(b, t)| t.shield_percentage * b.efficiency.min(1.0))
        .sum();
    total.clamp(0.0, MAX_SHIELD_PERCENTAGE)
}

/// Space strength of a planet: orbital units plus gun and shield buildings
pub fn planet_strength(planet: &Planet, rules: &RulesCatalog) -> AttackDefense {
    let mut ad = AttackDefense::default();
    for item in &planet.inventory {
        let orbital = rules
            .item_category(&item.type_id)
            .is_some_and(|c| c.is_orbital_defense());
        if orbital {
            ad.add_item(item, rules);
        }
    }

    let shield_bonus = 1.0 + shield_percentage(planet, rules) / 100.0;
    for building in planet.buildings.iter().filter(|b| b.is_operational()) {
        let Some(building_type) = rules.building(&building.type_id) else {
            continue;
        };
        let capabilities = building_type.capabilities();
        if !capabilities.contains(Capabilities::PROVIDES_DEFENSE) {
            continue;
        }

        let base = building_type
            .space
            .as_ref()
            .map(|s| s.hitpoints)
            .unwrap_or(building_type.hitpoints);
        ad.defense += base * building.health_ratio(building_type) * shield_bonus;
        ad.structures += 1;

        if !capabilities.contains(Capabilities::PROVIDES_ATTACK) {
            continue;
        }
        let Some(space) = building_type.space.as_ref() else {
            continue;
        };
        match space.projectile.as_deref().and_then(|id| rules.projectile(id)) {
            Some(projectile) => ad.add_weapon(projectile, space.count as f64),
            None => tracing::trace!("No space turret for {}", building_type.id),
        }
    }
    ad
}

/// Which side of a space battle a planet fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetStrength {
    pub planet: PlanetId,
    pub owner: Option<PlayerId>,
    pub side: Side,
    pub strength: AttackDefense,
}

/// Snapshot of both sides before a space battle
///
/// Built once per battle, and usable by collaborators to preview an outcome
/// before committing forces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceStrengths {
    /// Attacker side total, including an attacker-owned planet
    pub attacker: AttackDefense,
    /// Defender side total, including a non-attacker planet
    pub defender: AttackDefense,
    pub planet: Option<PlanetStrength>,
    pub attacker_owner: PlayerId,
    pub defender_owner: Option<PlayerId>,
    pub attacker_fleets: Vec<FleetId>,
    pub defender_fleets: Vec<FleetId>,
}

impl SpaceStrengths {
    /// Planet strength if it fights on `side`
    pub fn planet_on(&self, side: Side) -> Option<&PlanetStrength> {
        self.planet.as_ref().filter(|p| p.side == side)
    }

    /// True if anything opposes the attacker in orbit
    pub fn needs_space_battle(&self) -> bool {
        if !self.defender_fleets.is_empty() {
            return true;
        }
        self.planet_on(Side::Defender).is_some_and(|p| {
            p.strength.defense > 0.0 || p.strength.attack > 0.0 || p.strength.onetime_attack > 0.0
        })
    }

    /// Owners taking part, attacker first, without duplicates
    pub fn players(&self) -> Vec<PlayerId> {
        let mut players = vec![self.attacker_owner];
        if let Some(defender) = self.defender_owner {
            if defender != self.attacker_owner {
                players.push(defender);
            }
        }
        players
    }
}

/// Aggregate both sides of a battle without touching the world
pub fn compute_strengths(
    world: &World,
    rules: &RulesCatalog,
    battle: &BattleInfo,
) -> Result<SpaceStrengths> {
    let attacker_fleet = world
        .fleet(battle.attacker())
        .ok_or(BattleError::FleetNotFound(battle.attacker()))?;
    let attacker_owner = attacker_fleet.owner;

    let mut attacker_fleets = vec![attacker_fleet.id];
    let mut defender_fleets = Vec::new();
    let mut defender_owner = None;

    if let Some(target) = battle.target_fleet() {
        let fleet = world.fleet(target).ok_or(BattleError::FleetNotFound(target))?;
        defender_owner = Some(fleet.owner);
        if !battle.enemy_flee {
            defender_fleets.push(target);
        }
    }
    for helper in battle.helper_fleets() {
        let fleet = world.fleet(helper).ok_or(BattleError::FleetNotFound(helper))?;
        if fleet.owner == attacker_owner {
            attacker_fleets.push(helper);
        } else {
            defender_owner.get_or_insert(fleet.owner);
            defender_fleets.push(helper);
        }
    }

    let mut attacker = AttackDefense::default();
    for id in &attacker_fleets {
        if let Some(fleet) = world.fleet(*id) {
            attacker += fleet_strength(fleet, rules);
        }
    }
    let mut defender = AttackDefense::default();
    for id in &defender_fleets {
        if let Some(fleet) = world.fleet(*id) {
            defender += fleet_strength(fleet, rules);
        }
    }

    let planet = match battle.involved_planet() {
        Some(id) => {
            let planet = world.planet(id).ok_or(BattleError::PlanetNotFound(id))?;
            let strength = planet_strength(planet, rules);
            let side = if planet.owner == Some(attacker_owner) {
                attacker += strength;
                Side::Attacker
            } else {
                defender += strength;
                if defender_owner.is_none() {
                    defender_owner = planet.owner;
                }
                Side::Defender
            };
            Some(PlanetStrength {
                planet: id,
                owner: planet.owner,
                side,
                strength,
            })
        }
        None => None,
    };

    Ok(SpaceStrengths {
        attacker,
        defender,
        planet,
        attacker_owner,
        defender_owner,
        attacker_fleets,
        defender_fleets,
    })
}
