//! Damage application - consume a hitpoint pool from inventories and buildings
//!
//! Cheapest stock dies first; stock not held by the immediate participant
//! (helpers) is used up last. Every casualty is booked twice: as lost for its
//! owner and as destroyed for the opponent.

use crate::battle::constants::MAX_SHIELD_PERCENTAGE;
use crate::battle::hooks::BattleHooks;
use crate::battle::strength::shield_percentage;
use crate::core::types::{BuildingId, FleetId, PlanetId, PlayerId};
use crate::rules::catalog::{Capabilities, ItemCategory, RulesCatalog};
use crate::world::{Holder, LossKind, World};

/// Which stacks of an inventory a damage pool may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageScope {
    All,
    /// Tanks and vehicles only
    Ground,
    /// Fighters and stations only
    OrbitalDefense,
}

impl DamageScope {
    fn includes(&self, category: Option<ItemCategory>) -> bool {
        match self {
            DamageScope::All => true,
            DamageScope::Ground => category.is_some_and(|c| c.is_ground()),
            DamageScope::OrbitalDefense => category.is_some_and(|c| c.is_orbital_defense()),
        }
    }
}

/// Inventories a damage pool is spread over
#[derive(Debug, Clone, Copy)]
pub struct DamageTarget<'a> {
    pub holders: &'a [Holder],
    /// Absorbs before every other holder
    pub primary: Holder,
    pub scope: DamageScope,
}

impl<'a> DamageTarget<'a> {
    pub fn new(holders: &'a [Holder], primary: Holder, scope: DamageScope) -> Self {
        Self {
            holders,
            primary,
            scope,
        }
    }

    pub fn single(holder: &'a Holder, scope: DamageScope) -> Self {
        Self::new(std::slice::from_ref(holder), *holder, scope)
    }
}

/// What one application of damage did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageReport {
    /// Hitpoints actually taken out of the pool
    pub absorbed: f64,
    pub units_lost: u32,
    pub cost_lost: f64,
    pub buildings_destroyed: u32,
    pub fleets_destroyed: Vec<FleetId>,
}

impl DamageReport {
    pub fn merge(&mut self, other: DamageReport) {
        self.absorbed += other.absorbed;
        self.units_lost += other.units_lost;
        self.cost_lost += other.cost_lost;
        self.buildings_destroyed += other.buildings_destroyed;
        self.fleets_destroyed.extend(other.fleets_destroyed);
    }
}

/// Damage a side inflicts over `time`; nothing if the time never elapses
pub fn inflicted(time: f64, attack: f64) -> f64 {
    if time.is_finite() && attack > 0.0 {
        time * attack
    } else {
        0.0
    }
}

pub fn loss_kind(category: Option<ItemCategory>) -> LossKind {
    if category.is_some_and(|c| c.is_ground()) {
        LossKind::Vehicle
    } else {
        LossKind::Ship
    }
}

/// Share of incoming damage that gets through planetary shields
pub fn shield_factor(shield_percentage: f64) -> f64 {
    1.0 - shield_percentage.clamp(0.0, MAX_SHIELD_PERCENTAGE) / 100.0
}

/// Hitpoints a building can take once planetary shields are accounted for
pub fn effective_hitpoints(hitpoints: f64, shield_percentage: f64) -> f64 {
    hitpoints.max(0.0) / shield_factor(shield_percentage)
}

pub(crate) fn record_casualties(
    world: &mut World,
    owner: Option<PlayerId>,
    opponent: Option<PlayerId>,
    kind: LossKind,
    count: u32,
    cost: f64,
) {
    if count == 0 {
        return;
    }
    if let Some(owner) = owner {
        world.stats_mut(owner).record_lost(kind, count, cost);
    }
    if let Some(opponent) = opponent {
        world.stats_mut(opponent).record_destroyed(kind, count, cost);
    }
}

/// Prune a fleet and remove it if nothing is left
///
/// Returns true if the fleet was removed.
pub(crate) fn settle_fleet(
    world: &mut World,
    hooks: &mut BattleHooks,
    fleet_id: FleetId,
    lost_vehicles: bool,
) -> bool {
    let Some(fleet) = world.fleet_mut(fleet_id) else {
        return false;
    };
    fleet.prune();
    if fleet.is_empty() {
        let owner = fleet.owner;
        world.remove_fleet(fleet_id);
        world.stats_mut(owner).fleets_lost += 1;
        hooks.fleet_destroyed(fleet_id);
        tracing::debug!("Fleet {:?} destroyed", fleet_id);
        return true;
    }
    if lost_vehicles {
        hooks.lost_vehicles(fleet_id);
    }
    false
}

/// Spread `pool` hitpoints over the target's inventories
///
/// Stacks are consumed in ascending production cost, with stacks outside
/// the primary holder after all of the primary holder's. The last stack hit
/// may lose part of its units and carry the residual damage on its survivors.
pub fn apply_inventory_damage(
    world: &mut World,
    rules: &RulesCatalog,
    hooks: &mut BattleHooks,
    target: DamageTarget<'_>,
    pool: f64,
    opponent: Option<PlayerId>,
) -> DamageReport {
    let mut report = DamageReport::default();
    if pool.is_nan() || pool <= 0.0 {
        return report;
    }

    let mut order = Vec::new();
    for holder in target.holders {
        let Some(inventory) = world.inventory(*holder) else {
            continue;
        };
        for item in inventory.iter().filter(|i| !i.is_empty()) {
            if target.scope.includes(rules.item_category(&item.type_id)) {
                let helper = *holder != target.primary;
                order.push((helper, rules.item_cost(&item.type_id), *holder, item.id));
            }
        }
    }
    // Stable: equal costs keep inventory order
    order.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut remaining = pool;
    let mut vehicle_losses: Vec<FleetId> = Vec::new();
    for (_, cost, holder, item_id) in order {
        if remaining <= 0.0 {
            break;
        }
        let Some(item) = world
            .inventory_mut(holder)
            .and_then(|inv| inv.iter_mut().find(|i| i.id == item_id))
        else {
            continue;
        };

        let value = item.stack_value();
        let owner = item.owner;
        let category = rules.item_category(&item.type_id);
        let dead = if remaining >= value {
            let dead = item.count;
            item.count = 0;
            remaining -= value;
            report.absorbed += value;
            dead
        } else {
            let dead = item.absorb(remaining);
            report.absorbed += remaining;
            remaining = 0.0;
            dead
        };
        if dead == 0 {
            continue;
        }

        tracing::trace!("{} x{} of {:?} lost", item.type_id, dead, holder);
        report.units_lost += dead;
        report.cost_lost += cost * dead as f64;
        let kind = loss_kind(category);
        record_casualties(world, Some(owner), opponent, kind, dead, cost * dead as f64);
        if let (LossKind::Vehicle, Holder::Fleet(fleet_id)) = (kind, holder) {
            vehicle_losses.push(fleet_id);
        }
    }

    for holder in target.holders {
        match *holder {
            Holder::Fleet(fleet_id) => {
                if settle_fleet(world, hooks, fleet_id, vehicle_losses.contains(&fleet_id)) {
                    report.fleets_destroyed.push(fleet_id);
                }
            }
            Holder::Planet(planet_id) => {
                if let Some(planet) = world.planet_mut(planet_id) {
                    planet.prune();
                }
            }
        }
    }
    report
}

/// Remove every matching stack of one holder outright
pub fn destroy_items(
    world: &mut World,
    rules: &RulesCatalog,
    hooks: &mut BattleHooks,
    holder: Holder,
    scope: DamageScope,
    opponent: Option<PlayerId>,
) -> DamageReport {
    apply_inventory_damage(
        world,
        rules,
        hooks,
        DamageTarget::single(&holder, scope),
        f64::INFINITY,
        opponent,
    )
}

/// Destroy a whole fleet and book every unit in it as lost
pub fn destroy_fleet(
    world: &mut World,
    rules: &RulesCatalog,
    hooks: &mut BattleHooks,
    fleet_id: FleetId,
    opponent: Option<PlayerId>,
) -> bool {
    let Some(fleet) = world.remove_fleet(fleet_id) else {
        return false;
    };
    for item in fleet.inventory.iter().filter(|i| !i.is_empty()) {
        let cost = rules.item_cost(&item.type_id) * item.count as f64;
        let kind = loss_kind(rules.item_category(&item.type_id));
        record_casualties(world, Some(fleet.owner), opponent, kind, item.count, cost);
    }
    world.stats_mut(fleet.owner).fleets_lost += 1;
    hooks.fleet_destroyed(fleet_id);
    tracing::debug!("Fleet {:?} ({}) destroyed", fleet_id, fleet.name);
    true
}

/// Tear down a building, book it and rebuild the planet's roads
pub fn destroy_building(
    world: &mut World,
    rules: &RulesCatalog,
    planet_id: PlanetId,
    building_id: BuildingId,
    opponent: Option<PlayerId>,
) -> bool {
    let Some(planet) = world.planet_mut(planet_id) else {
        return false;
    };
    let Some(building) = planet.remove_building(building_id) else {
        return false;
    };
    planet.rebuild_roads();
    let owner = planet.owner;

    let cost = rules.building_cost(&building.type_id);
    record_casualties(world, owner, opponent, LossKind::Building, 1, cost);
    tracing::debug!("{} destroyed on planet {:?}", building.type_id, planet_id);
    true
}

/// Hit one building with `pool` hitpoints through the given shield percentage
///
/// Returns the pool used and whether the building fell.
pub(crate) fn damage_building(
    world: &mut World,
    rules: &RulesCatalog,
    planet_id: PlanetId,
    building_id: BuildingId,
    pool: f64,
    shield: f64,
    opponent: Option<PlayerId>,
) -> (f64, bool) {
    let Some(building) = world
        .planet_mut(planet_id)
        .and_then(|p| p.building_mut(building_id))
    else {
        return (0.0, false);
    };
    if pool.is_nan() || pool <= 0.0 {
        return (0.0, false);
    }

    let effective = effective_hitpoints(building.hitpoints, shield);
    if pool >= effective {
        destroy_building(world, rules, planet_id, building_id, opponent);
        return (effective, true);
    }
    building.hitpoints -= pool * shield_factor(shield);
    (pool, false)
}

/// Spread `pool` over the planet's buildings having any of `capabilities`
///
/// Cheapest building first, every one protected by the planet's shields as
/// they stood before the first hit.
pub fn apply_building_damage(
    world: &mut World,
    rules: &RulesCatalog,
    planet_id: PlanetId,
    capabilities: Capabilities,
    pool: f64,
    opponent: Option<PlayerId>,
) -> DamageReport {
    let mut report = DamageReport::default();
    let Some(planet) = world.planet(planet_id) else {
        return report;
    };
    let shield = shield_percentage(planet, rules);

    let mut order: Vec<(f64, BuildingId)> = planet
        .buildings
        .iter()
        .filter(|b| rules.building_kind(&b.type_id).capabilities().intersects(capabilities))
        .map(|b| (rules.building_cost(&b.type_id), b.id))
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut remaining = pool;
    for (_, building_id) in order {
        if remaining.is_nan() || remaining <= 0.0 {
            break;
        }
        let (used, destroyed) =
            damage_building(world, rules, planet_id, building_id, remaining, shield, opponent);
        remaining -= used;
        report.absorbed += used;
        if destroyed {
            report.buildings_destroyed += 1;
        }
    }
    report
}

/// Route damage to a planet: orbital units first, then defense buildings
pub fn apply_planet_damage(
    world: &mut World,
    rules: &RulesCatalog,
    hooks: &mut BattleHooks,
    planet_id: PlanetId,
    pool: f64,
    opponent: Option<PlayerId>,
) -> DamageReport {
    let holder = Holder::Planet(planet_id);
    let mut report = apply_inventory_damage(
        world,
        rules,
        hooks,
        DamageTarget::single(&holder, DamageScope::OrbitalDefense),
        pool,
        opponent,
    );
    let remaining = pool - report.absorbed;
    if remaining > 0.0 {
        report.merge(apply_building_damage(
            world,
            rules,
            planet_id,
            Capabilities::PROVIDES_DEFENSE,
            remaining,
            opponent,
        ));
    }
    tracing::debug!(
        "Planet {:?} absorbed {:.1} of {:.1} damage",
        planet_id,
        report.absorbed,
        pool
    );
    report
}

/// Destroy every operational gun and shield and every fighter and station
pub fn demolish_planet_defenses(
    world: &mut World,
    rules: &RulesCatalog,
    hooks: &mut BattleHooks,
    planet_id: PlanetId,
    opponent: Option<PlayerId>,
) -> DamageReport {
    let mut report = DamageReport::default();
    let Some(planet) = world.planet(planet_id) else {
        return report;
    };

    for building_id in planet.operational_with(rules, Capabilities::PROVIDES_DEFENSE) {
        if destroy_building(world, rules, planet_id, building_id, opponent) {
            report.buildings_destroyed += 1;
        }
    }
    report.merge(destroy_items(
        world,
        rules,
        hooks,
        Holder::Planet(planet_id),
        DamageScope::OrbitalDefense,
        opponent,
    ));
    tracing::debug!(
        "Planet {:?} defenses demolished: {} buildings, {} units",
        planet_id,
        report.buildings_destroyed,
        report.units_lost
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ItemId;
    use crate::rules::catalog::{BuildingKind, BuildingType, ItemType};
    use crate::world::{Building, Fleet, InventoryItem, Planet};

    fn item_type(id: &str, category: ItemCategory, cost: f64, hp: f64) -> ItemType {
        ItemType {
            id: id.into(),
            category,
            production_cost: cost,
            hitpoints: hp,
            shield: 0.0,
            slots: vec![],
            vehicle: None,
        }
    }

    fn building_type(id: &str, kind: BuildingKind, cost: f64, shield: f64) -> BuildingType {
        BuildingType {
            id: id.into(),
            kind,
            hitpoints: 100.0,
            production_cost: cost,
            space: None,
            shield_percentage: shield,
            turrets: vec![],
        }
    }

    fn rules() -> RulesCatalog {
        let mut rules = RulesCatalog::new();
        rules.add_item(item_type("Scout", ItemCategory::Cruiser, 10.0, 10.0));
        rules.add_item(item_type("Destroyer", ItemCategory::Battleship, 50.0, 40.0));
        rules.add_item(item_type("Tank", ItemCategory::Tank, 20.0, 30.0));
        rules.add_item(item_type("Station", ItemCategory::Station, 80.0, 100.0));
        rules.add_building(building_type("Gun", BuildingKind::Gun, 100.0, 0.0));
        rules.add_building(building_type("Shield", BuildingKind::Shield, 200.0, 50.0));
        rules.add_building(building_type("Bunker", BuildingKind::Bunker, 50.0, 0.0));
        rules
    }

    fn stack(rules: &RulesCatalog, id: u32, owner: u32, type_id: &str, count: u32) -> InventoryItem {
        InventoryItem::from_type(ItemId(id), PlayerId(owner), rules.item(type_id).unwrap(), count)
    }

    #[test]
    fn test_cheapest_first_with_partial_casualties() {
        let rules = rules();
        let mut world = World::new();
        let mut fleet = Fleet::new(FleetId(1), PlayerId(1), "Alpha");
        fleet.inventory.push(stack(&rules, 1, 1, "Destroyer", 2));
        fleet.inventory.push(stack(&rules, 2, 1, "Scout", 3));
        world.add_fleet(fleet);
        let mut hooks = BattleHooks::new();

        // 30 kills all scouts, 45 more kills one destroyer and scratches the other
        let holder = Holder::Fleet(FleetId(1));
        let report = apply_inventory_damage(
            &mut world,
            &rules,
            &mut hooks,
            DamageTarget::single(&holder, DamageScope::All),
            75.0,
            Some(PlayerId(2)),
        );

        assert_eq!(report.units_lost, 4);
        assert_eq!(report.absorbed, 75.0);
        let fleet = world.fleet(FleetId(1)).unwrap();
        assert_eq!(fleet.inventory.len(), 1);
        assert_eq!(fleet.inventory[0].count, 1);
        assert_eq!(fleet.inventory[0].hp, 35.0);

        let lost = world.stats(PlayerId(1)).unwrap();
        assert_eq!(lost.ships_lost, 4);
        assert_eq!(lost.ships_lost_cost, 80.0);
        assert_eq!(world.stats(PlayerId(2)).unwrap().ships_destroyed, 4);
    }

    #[test]
    fn test_helper_stock_absorbs_last() {
        let rules = rules();
        let mut world = World::new();
        let mut main = Fleet::new(FleetId(1), PlayerId(1), "Main");
        main.inventory.push(stack(&rules, 1, 1, "Destroyer", 1));
        let mut helper = Fleet::new(FleetId(2), PlayerId(1), "Helper");
        helper.inventory.push(stack(&rules, 2, 1, "Scout", 1));
        world.add_fleet(main);
        world.add_fleet(helper);
        let mut hooks = BattleHooks::new();

        let holders = [Holder::Fleet(FleetId(1)), Holder::Fleet(FleetId(2))];
        let report = apply_inventory_damage(
            &mut world,
            &rules,
            &mut hooks,
            DamageTarget::new(&holders, holders[0], DamageScope::All),
            40.0,
            None,
        );

        assert_eq!(report.fleets_destroyed, vec![FleetId(1)]);
        assert!(world.fleet(FleetId(1)).is_none());
        assert_eq!(world.fleet(FleetId(2)).unwrap().inventory[0].count, 1);
        assert_eq!(world.stats(PlayerId(1)).unwrap().fleets_lost, 1);
    }

    #[test]
    fn test_scope_limits_targets() {
        let rules = rules();
        let mut world = World::new();
        let mut fleet = Fleet::new(FleetId(1), PlayerId(1), "Alpha");
        fleet.inventory.push(stack(&rules, 1, 1, "Scout", 1));
        fleet.inventory.push(stack(&rules, 2, 1, "Tank", 2));
        world.add_fleet(fleet);
        let mut hooks = BattleHooks::new();

        let report = destroy_items(
            &mut world,
            &rules,
            &mut hooks,
            Holder::Fleet(FleetId(1)),
            DamageScope::Ground,
            Some(PlayerId(2)),
        );
        assert_eq!(report.units_lost, 2);
        let fleet = world.fleet(FleetId(1)).unwrap();
        assert_eq!(fleet.inventory.len(), 1);
        assert_eq!(world.stats(PlayerId(1)).unwrap().vehicles_lost, 2);
    }

    #[test]
    fn test_zero_pool_is_noop() {
        let rules = rules();
        let mut world = World::new();
        let mut fleet = Fleet::new(FleetId(1), PlayerId(1), "Alpha");
        fleet.inventory.push(stack(&rules, 1, 1, "Scout", 1));
        world.add_fleet(fleet);
        let mut hooks = BattleHooks::new();

        let holder = Holder::Fleet(FleetId(1));
        let target = DamageTarget::single(&holder, DamageScope::All);
        let report = apply_inventory_damage(&mut world, &rules, &mut hooks, target, 0.0, None);
        assert_eq!(report, DamageReport::default());
        assert!(world.stats.is_empty());
    }

    #[test]
    fn test_building_damage_respects_shields() {
        let rules = rules();
        let mut world = World::new();
        let mut planet = Planet::new(PlanetId(1), Some(PlayerId(2)), "Tau");
        planet.buildings.push(Building::new(BuildingId(1), rules.building("Gun").unwrap()));
        planet.buildings.push(Building::new(BuildingId(2), rules.building("Shield").unwrap()));
        world.add_planet(planet);

        // 50% shields double effective hp: the gun takes 200, the shield 100 of 200
        let report = apply_building_damage(
            &mut world,
            &rules,
            PlanetId(1),
            Capabilities::PROVIDES_DEFENSE,
            300.0,
            Some(PlayerId(1)),
        );
        assert_eq!(report.buildings_destroyed, 1);
        let planet = world.planet(PlanetId(1)).unwrap();
        assert_eq!(planet.buildings.len(), 1);
        assert_eq!(planet.buildings[0].hitpoints, 50.0);
        assert_eq!(planet.surface_revision, 1);
        assert_eq!(world.stats(PlayerId(1)).unwrap().buildings_destroyed_cost, 100.0);
    }

    #[test]
    fn test_demolition_spares_other_buildings() {
        let rules = rules();
        let mut world = World::new();
        let mut planet = Planet::new(PlanetId(1), Some(PlayerId(2)), "Tau");
        planet.buildings.push(Building::new(BuildingId(1), rules.building("Gun").unwrap()));
        planet.buildings.push(Building::new(BuildingId(2), rules.building("Bunker").unwrap()));
        planet.inventory.push(stack(&rules, 1, 2, "Station", 2));
        planet.inventory.push(stack(&rules, 2, 2, "Tank", 1));
        world.add_planet(planet);
        let mut hooks = BattleHooks::new();

        let report = demolish_planet_defenses(
            &mut world,
            &rules,
            &mut hooks,
            PlanetId(1),
            Some(PlayerId(1)),
        );
        assert_eq!(report.buildings_destroyed, 1);
        assert_eq!(report.units_lost, 2);

        let planet = world.planet(PlanetId(1)).unwrap();
        assert_eq!(planet.buildings[0].id, BuildingId(2));
        assert_eq!(planet.inventory.len(), 1);
        assert_eq!(planet.inventory[0].type_id, "Tank");
    }

    #[test]
    fn test_inflicted_guards_infinite_time() {
        assert_eq!(inflicted(2.0, 2.0), 4.0);
        assert_eq!(inflicted(f64::INFINITY, 5.0), 0.0);
        assert_eq!(inflicted(3.0, 0.0), 0.0);
    }
}
