//! Load the battle rules table from TOML
//!
//! String tags (projectile kinds, item categories, building kinds) are
//! resolved into enums here, once, so the resolver never compares strings.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::catalog::{
    BuildingKind, BuildingType, EquipmentDef, GroundTurret, ItemCategory, ItemType, Projectile,
    ProjectileKind, RulesCatalog, SlotDef, SpaceDefense, VehicleDef,
};
use super::ecm::AntiEcmTable;
use crate::core::types::Difficulty;

/// Error type for rules loading
#[derive(Error, Debug)]
pub enum RulesLoadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid projectile kind '{kind}' for {id}")]
    InvalidProjectileKind { id: String, kind: String },

    #[error("Invalid item category '{category}' for {id}")]
    InvalidItemCategory { id: String, category: String },

    #[error("Invalid building kind '{kind}' for {id}")]
    InvalidBuildingKind { id: String, kind: String },

    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),
}

/// Load rules from a TOML file
pub fn load_rules(path: &Path) -> Result<RulesCatalog, RulesLoadError> {
    let content = std::fs::read_to_string(path)?;
    parse_rules(&content)
}

/// Parse rules from a TOML string
pub fn parse_rules(content: &str) -> Result<RulesCatalog, RulesLoadError> {
    let file: TomlRules = toml::from_str(content)?;

    let mut catalog = RulesCatalog::new();
    for projectile in file.projectiles {
        catalog.add_projectile(projectile.into_projectile()?);
    }
    for equipment in file.equipment {
        catalog.add_equipment(equipment.into_equipment());
    }
    for item in file.items {
        catalog.add_item(item.into_item()?);
    }
    for building in file.buildings {
        catalog.add_building(building.into_building()?);
    }
    if let Some(table) = file.anti_ecm {
        catalog.anti_ecm = table.into_table()?;
    }

    Ok(catalog)
}

/// TOML representation of a rules file
#[derive(Debug, Deserialize)]
struct TomlRules {
    #[serde(default)]
    projectiles: Vec<TomlProjectile>,
    #[serde(default)]
    equipment: Vec<TomlEquipment>,
    #[serde(default)]
    items: Vec<TomlItem>,
    #[serde(default)]
    buildings: Vec<TomlBuilding>,
    anti_ecm: Option<TomlAntiEcm>,
}

#[derive(Debug, Deserialize)]
struct TomlProjectile {
    id: String,
    kind: String,
    damage: f64,
    delay: f64,
}

impl TomlProjectile {
    fn into_projectile(self) -> Result<Projectile, RulesLoadError> {
        let kind = ProjectileKind::parse(&self.kind).ok_or_else(|| {
            RulesLoadError::InvalidProjectileKind {
                id: self.id.clone(),
                kind: self.kind.clone(),
            }
        })?;

        Ok(Projectile {
            id: self.id,
            kind,
            damage: self.damage,
            delay: self.delay,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TomlEquipment {
    id: String,
    projectile: Option<String>,
    ecm: Option<f64>,
    anti_ecm: Option<f64>,
}

impl TomlEquipment {
    fn into_equipment(self) -> EquipmentDef {
        EquipmentDef {
            id: self.id,
            projectile: self.projectile,
            ecm: self.ecm,
            anti_ecm: self.anti_ecm,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlSlot {
    id: String,
    #[serde(default)]
    fixed: bool,
    equipment: Option<String>,
    #[serde(default = "default_slot_max")]
    max: u32,
}

fn default_slot_max() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct TomlVehicle {
    damage: f64,
    delay: f64,
    #[serde(default)]
    range: f64,
}

#[derive(Debug, Deserialize)]
struct TomlItem {
    id: String,
    category: String,
    #[serde(default)]
    production_cost: f64,
    hitpoints: f64,
    #[serde(default)]
    shield: f64,
    #[serde(default)]
    slots: Vec<TomlSlot>,
    vehicle: Option<TomlVehicle>,
}

impl TomlItem {
    fn into_item(self) -> Result<ItemType, RulesLoadError> {
        let category = ItemCategory::parse(&self.category).ok_or_else(|| {
            RulesLoadError::InvalidItemCategory {
                id: self.id.clone(),
                category: self.category.clone(),
            }
        })?;

        let slots = self
            .slots
            .into_iter()
            .map(|s| SlotDef {
                id: s.id,
                fixed: s.fixed,
                equipment: s.equipment,
                max: s.max,
            })
            .collect();

        Ok(ItemType {
            id: self.id,
            category,
            production_cost: self.production_cost,
            hitpoints: self.hitpoints,
            shield: self.shield,
            slots,
            vehicle: self.vehicle.map(|v| VehicleDef {
                damage: v.damage,
                delay: v.delay,
                range: v.range,
            }),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TomlSpaceDefense {
    hitpoints: f64,
    projectile: Option<String>,
    #[serde(default = "default_slot_max")]
    count: u32,
}

#[derive(Debug, Deserialize)]
struct TomlTurret {
    damage: f64,
    delay: f64,
    range: f64,
    #[serde(default = "default_slot_max")]
    count: u32,
}

#[derive(Debug, Deserialize)]
struct TomlBuilding {
    id: String,
    kind: String,
    hitpoints: f64,
    #[serde(default)]
    production_cost: f64,
    space: Option<TomlSpaceDefense>,
    #[serde(default)]
    shield_percentage: f64,
    #[serde(default)]
    turrets: Vec<TomlTurret>,
}

impl TomlBuilding {
    fn into_building(self) -> Result<BuildingType, RulesLoadError> {
        let kind = BuildingKind::parse(&self.kind).ok_or_else(|| {
            RulesLoadError::InvalidBuildingKind {
                id: self.id.clone(),
                kind: self.kind.clone(),
            }
        })?;

        Ok(BuildingType {
            id: self.id,
            kind,
            hitpoints: self.hitpoints,
            production_cost: self.production_cost,
            space: self.space.map(|s| SpaceDefense {
                hitpoints: s.hitpoints,
                projectile: s.projectile,
                count: s.count,
            }),
            shield_percentage: self.shield_percentage,
            turrets: self
                .turrets
                .into_iter()
                .map(|t| GroundTurret {
                    damage: t.damage,
                    delay: t.delay,
                    range: t.range,
                    count: t.count,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TomlAntiEcm {
    default: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    difficulty: Vec<TomlEcmOverride>,
}

#[derive(Debug, Deserialize)]
struct TomlEcmOverride {
    name: String,
    matrix: Vec<Vec<f64>>,
}

impl TomlAntiEcm {
    fn into_table(self) -> Result<AntiEcmTable, RulesLoadError> {
        let mut table = AntiEcmTable::default();
        if let Some(default) = self.default {
            table.default = default;
        }
        for entry in self.difficulty {
            let difficulty = Difficulty::parse(&entry.name)
                .ok_or_else(|| RulesLoadError::InvalidDifficulty(entry.name.clone()))?;
            table.overrides.push((difficulty, entry.matrix));
        }
        Ok(table)
    }
}
