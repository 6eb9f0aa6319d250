//! Shared fixtures for integration tests
//!
//! Ships fire one "Pulse" beam per slot doing 1 damage per time unit, so a
//! ship type's attack equals its beam count and its defense equals its hp.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use autobattle::battle::{
    AttackDefense, AutoBattle, BattleHooks, BattleInfo, PlayerAi, ScriptHooks, SpaceStrengths,
};
use autobattle::core::config::BattleConfig;
use autobattle::core::types::{BuildingId, FleetId, ItemId, PlanetId, PlayerId};
use autobattle::core::Result;
use autobattle::rules::{
    BuildingKind, BuildingType, EquipmentDef, GroundTurret, ItemCategory, ItemType, Projectile,
    ProjectileKind, RulesCatalog, SlotDef, SpaceDefense, VehicleDef,
};
use autobattle::world::{Building, Fleet, Holder, InventoryItem, Planet, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const ATTACKER: PlayerId = PlayerId(1);
pub const DEFENDER: PlayerId = PlayerId(2);

pub fn ship(id: &str, cost: f64, hp: f64, beams: u32) -> ItemType {
    let slots = if beams > 0 {
        vec![SlotDef {
            id: "beams".into(),
            fixed: true,
            equipment: Some("Pulse".into()),
            max: beams,
        }]
    } else {
        vec![]
    };
    ItemType {
        id: id.into(),
        category: ItemCategory::Cruiser,
        production_cost: cost,
        hitpoints: hp,
        shield: 0.0,
        slots,
        vehicle: None,
    }
}

pub fn vehicle(id: &str, cost: f64, hp: f64, damage: f64, range: f64) -> ItemType {
    ItemType {
        id: id.into(),
        category: ItemCategory::Tank,
        production_cost: cost,
        hitpoints: hp,
        shield: 0.0,
        slots: vec![],
        vehicle: Some(VehicleDef {
            damage,
            delay: 1.0,
            range,
        }),
    }
}

pub fn fortress(id: &str, hitpoints: f64, damage: f64, range: f64) -> BuildingType {
    BuildingType {
        id: id.into(),
        kind: BuildingKind::Defensive,
        hitpoints,
        production_cost: 300.0,
        space: None,
        shield_percentage: 0.0,
        turrets: vec![GroundTurret {
            damage,
            delay: 1.0,
            range,
            count: 1,
        }],
    }
}

/// Rules used across the integration tests
pub fn rules() -> RulesCatalog {
    let mut rules = RulesCatalog::new();
    rules.add_projectile(Projectile {
        id: "Pulse".into(),
        kind: ProjectileKind::Beam,
        damage: 1.0,
        delay: 1.0,
    });
    rules.add_projectile(Projectile {
        id: "Torpedo".into(),
        kind: ProjectileKind::Rocket,
        damage: 100.0,
        delay: 10.0,
    });
    rules.add_equipment(EquipmentDef {
        id: "Pulse".into(),
        projectile: Some("Pulse".into()),
        ..Default::default()
    });
    rules.add_equipment(EquipmentDef {
        id: "Torpedo".into(),
        projectile: Some("Torpedo".into()),
        ..Default::default()
    });
    rules.add_equipment(EquipmentDef {
        id: "Jammer".into(),
        ecm: Some(1.0),
        ..Default::default()
    });

    // Space scenario ships
    rules.add_item(ship("Scout", 10.0, 5.0, 1));
    rules.add_item(ship("Frigate", 50.0, 40.0, 3));
    rules.add_item(ship("Picket", 20.0, 10.0, 2));
    rules.add_item(ship("Lancer", 100.0, 100.0, 10));
    rules.add_item(ship("Escort", 60.0, 50.0, 10));
    rules.add_item(ship("Raider", 30.0, 20.0, 4));
    rules.add_item(ship("Warden", 200.0, 150.0, 10));
    rules.add_item(ship("Hulk", 5.0, 200.0, 0));

    let mut jammer = ship("JammerShip", 80.0, 200.0, 0);
    jammer.slots.push(SlotDef {
        id: "ecm".into(),
        fixed: true,
        equipment: Some("Jammer".into()),
        max: 1,
    });
    rules.add_item(jammer);

    let mut bomber = ship("Bomber", 70.0, 50.0, 0);
    bomber.slots.push(SlotDef {
        id: "torpedo".into(),
        fixed: true,
        equipment: Some("Torpedo".into()),
        max: 1,
    });
    rules.add_item(bomber);

    let mut fighter = ship("Interceptor", 15.0, 10.0, 0);
    fighter.category = ItemCategory::Fighter;
    rules.add_item(fighter);

    // Ground units
    rules.add_item(vehicle("LightTank", 50.0, 40.0, 8.0, 3.0));
    rules.add_item(vehicle("Artillery", 90.0, 30.0, 20.0, 6.0));

    // Buildings
    rules.add_building(BuildingType {
        id: "OrbitalGun".into(),
        kind: BuildingKind::Gun,
        hitpoints: 100.0,
        production_cost: 400.0,
        space: Some(SpaceDefense {
            hitpoints: 50.0,
            projectile: None,
            count: 0,
        }),
        shield_percentage: 0.0,
        turrets: vec![],
    });
    rules.add_building(BuildingType {
        id: "ArmedGun".into(),
        kind: BuildingKind::Gun,
        hitpoints: 100.0,
        production_cost: 400.0,
        space: Some(SpaceDefense {
            hitpoints: 50.0,
            projectile: Some("Pulse".into()),
            count: 2,
        }),
        shield_percentage: 0.0,
        turrets: vec![],
    });
    rules.add_building(BuildingType {
        id: "Bunker".into(),
        kind: BuildingKind::Bunker,
        hitpoints: 500.0,
        production_cost: 200.0,
        space: None,
        shield_percentage: 0.0,
        turrets: vec![],
    });
    rules.add_building(fortress("Bastion", 100.0, 5.0, 4.0));
    rules.add_building(fortress("Citadel", 400.0, 30.0, 4.0));
    rules.add_building(fortress("Decoy", 100.0, 0.0, 5.0));
    rules
}

/// Put a full-strength stack into a holder
pub fn add_stack(
    world: &mut World,
    rules: &RulesCatalog,
    holder: Holder,
    type_id: &str,
    count: u32,
) -> ItemId {
    let item_type = rules.item(type_id).expect("unknown item type in fixture");
    world
        .spawn_item(holder, item_type, count)
        .expect("holder missing in fixture")
}

pub fn add_building(
    world: &mut World,
    rules: &RulesCatalog,
    planet: PlanetId,
    type_id: &str,
) -> BuildingId {
    let building_type = rules.building(type_id).expect("unknown building type in fixture");
    world
        .spawn_building(planet, building_type)
        .expect("planet missing in fixture")
}

pub fn add_fleet(world: &mut World, id: u32, owner: PlayerId) -> FleetId {
    world.add_fleet(Fleet::new(FleetId(id), owner, format!("Fleet {}", id)));
    FleetId(id)
}

pub fn add_planet(
    world: &mut World,
    id: u32,
    owner: Option<PlayerId>,
    population: u32,
) -> PlanetId {
    let mut planet = Planet::new(PlanetId(id), owner, format!("Planet {}", id));
    planet.population = population;
    world.add_planet(planet);
    PlanetId(id)
}

pub fn stack<'a>(world: &'a World, holder: Holder, type_id: &str) -> Option<&'a InventoryItem> {
    world
        .inventory(holder)?
        .iter()
        .find(|i| i.type_id == type_id)
}

pub fn building<'a>(world: &'a World, planet: PlanetId, id: BuildingId) -> Option<&'a Building> {
    world.planet(planet)?.building(id)
}

/// Resolve one battle with a seeded RNG and default config
pub fn resolve(
    world: &mut World,
    rules: &RulesCatalog,
    battle: &mut BattleInfo,
    seed: u64,
) -> Result<()> {
    let mut hooks = BattleHooks::new();
    resolve_with(world, rules, battle, seed, &mut hooks)
}

pub fn resolve_with(
    world: &mut World,
    rules: &RulesCatalog,
    battle: &mut BattleInfo,
    seed: u64,
    hooks: &mut BattleHooks,
) -> Result<()> {
    let config = BattleConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    AutoBattle::new(world, rules, &config, &mut rng, hooks).resolve(battle)
}

/// Event log shared between a test and its registered hooks
pub type EventLog = Rc<RefCell<Vec<String>>>;

pub struct RecordingAi {
    pub player: PlayerId,
    pub log: EventLog,
}

impl PlayerAi for RecordingAi {
    fn on_auto_spacewar_start(&mut self, _battle: &BattleInfo, strengths: &SpaceStrengths) {
        self.log.borrow_mut().push(format!(
            "space_start {} defense {}",
            self.player.0, strengths.defender.defense
        ));
    }

    fn on_auto_groundwar_start(
        &mut self,
        _battle: &BattleInfo,
        _attacker: &AttackDefense,
        _defender: &AttackDefense,
    ) {
        self.log.borrow_mut().push(format!("ground_start {}", self.player.0));
    }

    fn on_autobattle_finish(&mut self, _battle: &BattleInfo) {
        self.log.borrow_mut().push(format!("finish {}", self.player.0));
    }
}

pub struct RecordingScript {
    pub log: EventLog,
}

impl ScriptHooks for RecordingScript {
    fn on_fleet_destroyed(&mut self, fleet: FleetId) {
        self.log.borrow_mut().push(format!("fleet_destroyed {}", fleet.0));
    }

    fn on_lost_vehicles(&mut self, fleet: FleetId) {
        self.log.borrow_mut().push(format!("lost_vehicles {}", fleet.0));
    }

    fn on_planet_conquered(
        &mut self,
        planet: PlanetId,
        new_owner: PlayerId,
        _old_owner: Option<PlayerId>,
    ) {
        self.log
            .borrow_mut()
            .push(format!("conquered {} by {}", planet.0, new_owner.0));
    }

    fn on_planet_defended(&mut self, planet: PlanetId, _defender: Option<PlayerId>) {
        self.log.borrow_mut().push(format!("defended {}", planet.0));
    }
}
