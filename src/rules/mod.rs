//! Battle rules table loaded from TOML

pub mod catalog;
pub mod ecm;
pub mod loader;

pub use catalog::{
    BuildingKind, BuildingType, Capabilities, EquipmentDef, GroundTurret, ItemCategory, ItemType,
    Projectile, ProjectileKind, RulesCatalog, SlotDef, SpaceDefense, VehicleDef,
};
pub use ecm::{AntiEcmTable, EcmMatrix};
pub use loader::{load_rules, parse_rules, RulesLoadError};
