//! Battle rules table - projectiles, equipment, item and building types
//!
//! Definitions are looked up by string id. A missing definition is not an
//! error anywhere in the resolver: it simply contributes nothing.

use ahash::AHashMap;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::ecm::AntiEcmTable;

/// How a projectile delivers its damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Continuous fire, counted as damage per delay
    Beam,
    Rocket,
    MultiRocket,
    Bomb,
    Virus,
}

impl ProjectileKind {
    /// Alpha-strike weapons fire once per battle instead of continuously
    pub fn is_one_time(&self) -> bool {
        matches!(
            self,
            ProjectileKind::Rocket
                | ProjectileKind::MultiRocket
                | ProjectileKind::Bomb
                | ProjectileKind::Virus
        )
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "beam" => Some(ProjectileKind::Beam),
            "rocket" => Some(ProjectileKind::Rocket),
            "multi_rocket" => Some(ProjectileKind::MultiRocket),
            "bomb" => Some(ProjectileKind::Bomb),
            "virus" => Some(ProjectileKind::Virus),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: String,
    pub kind: ProjectileKind,
    pub damage: f64,
    /// Time between shots; non-positive delays yield no sustained attack
    pub delay: f64,
}

/// Equipment mountable in an item slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDef {
    pub id: String,
    pub projectile: Option<String>,
    pub ecm: Option<f64>,
    pub anti_ecm: Option<f64>,
}

/// Broad category of an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Battleship,
    Cruiser,
    Fighter,
    Station,
    Tank,
    Vehicle,
}

impl ItemCategory {
    /// Units that fight in ground battles
    pub fn is_ground(&self) -> bool {
        matches!(self, ItemCategory::Tank | ItemCategory::Vehicle)
    }

    /// Planet-held units that defend the orbit
    pub fn is_orbital_defense(&self) -> bool {
        matches!(self, ItemCategory::Fighter | ItemCategory::Station)
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "battleship" => Some(ItemCategory::Battleship),
            "cruiser" => Some(ItemCategory::Cruiser),
            "fighter" => Some(ItemCategory::Fighter),
            "station" => Some(ItemCategory::Station),
            "tank" => Some(ItemCategory::Tank),
            "vehicle" => Some(ItemCategory::Vehicle),
            _ => None,
        }
    }
}

/// Equipment slot layout of an item type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDef {
    pub id: String,
    /// Fixed slots always carry their default equipment at full count
    pub fixed: bool,
    pub equipment: Option<String>,
    pub max: u32,
}

/// Ground combat profile of a tank or vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleDef {
    pub damage: f64,
    pub delay: f64,
    pub range: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    pub id: String,
    pub category: ItemCategory,
    pub production_cost: f64,
    pub hitpoints: f64,
    pub shield: f64,
    pub slots: Vec<SlotDef>,
    pub vehicle: Option<VehicleDef>,
}

bitflags! {
    /// What a building contributes to a battle.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        const PROVIDES_DEFENSE = 1 << 0;
        const PROVIDES_ATTACK  = 1 << 1;
        const IS_SHIELD        = 1 << 2;
        const GROUND_TURRETS   = 1 << 3;
        const SHELTER          = 1 << 4;
    }
}

/// Closed set of building kinds, resolved from data once at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Gun,
    Shield,
    Defensive,
    Bunker,
    Other,
}

impl BuildingKind {
    pub fn capabilities(&self) -> Capabilities {
        match self {
            BuildingKind::Gun => Capabilities::PROVIDES_DEFENSE | Capabilities::PROVIDES_ATTACK,
            BuildingKind::Shield => Capabilities::PROVIDES_DEFENSE | Capabilities::IS_SHIELD,
            BuildingKind::Defensive => Capabilities::GROUND_TURRETS,
            BuildingKind::Bunker => Capabilities::SHELTER,
            BuildingKind::Other => Capabilities::empty(),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "gun" => Some(BuildingKind::Gun),
            "shield" => Some(BuildingKind::Shield),
            "defensive" => Some(BuildingKind::Defensive),
            "bunker" => Some(BuildingKind::Bunker),
            "other" => Some(BuildingKind::Other),
            _ => None,
        }
    }
}

/// Orbital profile of a gun or shield building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceDefense {
    pub hitpoints: f64,
    pub projectile: Option<String>,
    pub count: u32,
}

/// Ground turret mounted on a defensive building
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTurret {
    pub damage: f64,
    pub delay: f64,
    pub range: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingType {
    pub id: String,
    pub kind: BuildingKind,
    pub hitpoints: f64,
    pub production_cost: f64,
    pub space: Option<SpaceDefense>,
    /// Damage reduction granted by an operational shield building, in percent
    pub shield_percentage: f64,
    pub turrets: Vec<GroundTurret>,
}

impl BuildingType {
    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Longest reach of this building's turrets, 0 without any
    pub fn best_turret_range(&self) -> f64 {
        self.turrets.iter().map(|t| t.range).fold(0.0, f64::max)
    }
}

/// Catalog of every definition the resolver reads
#[derive(Debug, Clone, Default)]
pub struct RulesCatalog {
    projectiles: AHashMap<String, Projectile>,
    equipment: AHashMap<String, EquipmentDef>,
    items: AHashMap<String, ItemType>,
    buildings: AHashMap<String, BuildingType>,
    pub anti_ecm: AntiEcmTable,
}

impl RulesCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.projectiles.insert(projectile.id.clone(), projectile);
    }

    pub fn add_equipment(&mut self, equipment: EquipmentDef) {
        self.equipment.insert(equipment.id.clone(), equipment);
    }

    pub fn add_item(&mut self, item: ItemType) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn add_building(&mut self, building: BuildingType) {
        self.buildings.insert(building.id.clone(), building);
    }

    pub fn projectile(&self, id: &str) -> Option<&Projectile> {
        self.projectiles.get(id)
    }

    pub fn equipment(&self, id: &str) -> Option<&EquipmentDef> {
        self.equipment.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemType> {
        self.items.get(id)
    }

    pub fn building(&self, id: &str) -> Option<&BuildingType> {
        self.buildings.get(id)
    }

    /// Kind of a building type, `Other` when the type is unknown
    pub fn building_kind(&self, id: &str) -> BuildingKind {
        self.building(id).map(|b| b.kind).unwrap_or(BuildingKind::Other)
    }

    /// Category of an item type, if it is known
    pub fn item_category(&self, id: &str) -> Option<ItemCategory> {
        self.item(id).map(|i| i.category)
    }

    /// Production cost of an item type, 0 when unknown
    pub fn item_cost(&self, id: &str) -> f64 {
        self.item(id).map(|i| i.production_cost).unwrap_or(0.0)
    }

    /// Production cost of a building type, 0 when unknown
    pub fn building_cost(&self, id: &str) -> f64 {
        self.building(id).map(|b| b.production_cost).unwrap_or(0.0)
    }
}
