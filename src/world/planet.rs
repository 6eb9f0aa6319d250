//! Planets - owned surfaces with buildings and a garrison inventory

use serde::{Deserialize, Serialize};

use crate::core::types::{BuildingId, PlanetId, PlayerId};
use crate::rules::catalog::{Capabilities, RulesCatalog};
use crate::world::building::Building;
use crate::world::inventory::InventoryItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub owner: Option<PlayerId>,
    pub name: String,
    pub population: u32,
    pub morale: f64,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub buildings: Vec<Building>,
    /// Bumped whenever the surface layout changes so road and connectivity
    /// caches know to rebuild
    #[serde(default)]
    pub surface_revision: u64,
}

impl Planet {
    pub fn new(id: PlanetId, owner: Option<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            population: 0,
            morale: 50.0,
            inventory: Vec::new(),
            buildings: Vec::new(),
            surface_revision: 0,
        }
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn building_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == id)
    }

    pub fn remove_building(&mut self, id: BuildingId) -> Option<Building> {
        let index = self.buildings.iter().position(|b| b.id == id)?;
        Some(self.buildings.remove(index))
    }

    /// Operational buildings whose kind has all of `capabilities`, in list order
    pub fn operational_with(
        &self,
        rules: &RulesCatalog,
        capabilities: Capabilities,
    ) -> Vec<BuildingId> {
        self.buildings
            .iter()
            .filter(|b| b.is_operational())
            .filter(|b| rules.building_kind(&b.type_id).capabilities().contains(capabilities))
            .map(|b| b.id)
            .collect()
    }

    pub fn has_operational_bunker(&self, rules: &RulesCatalog) -> bool {
        !self.operational_with(rules, Capabilities::SHELTER).is_empty()
    }

    pub fn has_ground_units(&self, rules: &RulesCatalog) -> bool {
        self.inventory.iter().any(|i| {
            !i.is_empty()
                && rules
                    .item_category(&i.type_id)
                    .is_some_and(|c| c.is_ground())
        })
    }

    /// True when a ground assault has something to fight
    pub fn has_ground_defense(&self, rules: &RulesCatalog) -> bool {
        self.has_ground_units(rules)
            || !self.operational_with(rules, Capabilities::GROUND_TURRETS).is_empty()
    }

    pub fn rebuild_roads(&mut self) {
        self.surface_revision += 1;
    }

    pub fn prune(&mut self) {
        self.inventory.retain(|i| !i.is_empty());
    }

    /// Remove `loss` population, never going below zero
    pub fn lose_population(&mut self, loss: u32) {
        self.population = self.population.saturating_sub(loss);
    }
}
