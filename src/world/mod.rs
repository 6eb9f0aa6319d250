//! World arena - fleets, planets and statistics addressed by id
//!
//! The resolver never keeps references into the world across mutations; it
//! looks entities up by id each time. Callers must not resolve two battles
//! touching the same fleets or planets concurrently: there is no locking.

pub mod building;
pub mod fleet;
pub mod inventory;
pub mod planet;
pub mod stats;

use serde::{Deserialize, Serialize};

pub use building::Building;
pub use fleet::Fleet;
pub use inventory::{InventoryItem, InventorySlot};
pub use planet::Planet;
pub use stats::{LossKind, PlayerStats};

use crate::core::types::{BuildingId, FleetId, ItemId, PlanetId, PlayerId};
use crate::rules::catalog::{BuildingType, ItemType};

/// Anything that holds an inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Holder {
    Fleet(FleetId),
    Planet(PlanetId),
}

/// The mutable world state a battle operates on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    #[serde(default)]
    pub fleets: Vec<Fleet>,
    #[serde(default)]
    pub planets: Vec<Planet>,
    #[serde(default)]
    pub stats: Vec<PlayerStats>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fleet(&mut self, fleet: Fleet) {
        self.fleets.push(fleet);
    }

    pub fn add_planet(&mut self, planet: Planet) {
        self.planets.push(planet);
    }

    pub fn fleet(&self, id: FleetId) -> Option<&Fleet> {
        self.fleets.iter().find(|f| f.id == id)
    }

    pub fn fleet_mut(&mut self, id: FleetId) -> Option<&mut Fleet> {
        self.fleets.iter_mut().find(|f| f.id == id)
    }

    pub fn remove_fleet(&mut self, id: FleetId) -> Option<Fleet> {
        let index = self.fleets.iter().position(|f| f.id == id)?;
        Some(self.fleets.remove(index))
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.iter().find(|p| p.id == id)
    }

    pub fn planet_mut(&mut self, id: PlanetId) -> Option<&mut Planet> {
        self.planets.iter_mut().find(|p| p.id == id)
    }

    pub fn inventory(&self, holder: Holder) -> Option<&Vec<InventoryItem>> {
        match holder {
            Holder::Fleet(id) => self.fleet(id).map(|f| &f.inventory),
            Holder::Planet(id) => self.planet(id).map(|p| &p.inventory),
        }
    }

    pub fn inventory_mut(&mut self, holder: Holder) -> Option<&mut Vec<InventoryItem>> {
        match holder {
            Holder::Fleet(id) => self.fleet_mut(id).map(|f| &mut f.inventory),
            Holder::Planet(id) => self.planet_mut(id).map(|p| &mut p.inventory),
        }
    }

    pub fn owner(&self, holder: Holder) -> Option<PlayerId> {
        match holder {
            Holder::Fleet(id) => self.fleet(id).map(|f| f.owner),
            Holder::Planet(id) => self.planet(id).and_then(|p| p.owner),
        }
    }

    pub fn stats(&self, player: PlayerId) -> Option<&PlayerStats> {
        self.stats.iter().find(|s| s.player == Some(player))
    }

    /// Statistics for a player, created on first use
    pub fn stats_mut(&mut self, player: PlayerId) -> &mut PlayerStats {
        match self.stats.iter().position(|s| s.player == Some(player)) {
            Some(index) => &mut self.stats[index],
            None => {
                self.stats.push(PlayerStats::new(player));
                let last = self.stats.len() - 1;
                &mut self.stats[last]
            }
        }
    }

    /// Allocate an item id unused by any fleet or planet
    pub fn next_item_id(&self) -> ItemId {
        let fleet_items = self.fleets.iter().flat_map(|f| f.inventory.iter());
        let planet_items = self.planets.iter().flat_map(|p| p.inventory.iter());
        let max = fleet_items.chain(planet_items).map(|i| i.id.0).max().unwrap_or(0);
        ItemId(max + 1)
    }

    /// Allocate a building id unused on any planet
    pub fn next_building_id(&self) -> BuildingId {
        let max = self
            .planets
            .iter()
            .flat_map(|p| p.buildings.iter())
            .map(|b| b.id.0)
            .max()
            .unwrap_or(0);
        BuildingId(max + 1)
    }

    /// Create a stack and put it into a holder's inventory
    pub fn spawn_item(
        &mut self,
        holder: Holder,
        item_type: &ItemType,
        count: u32,
    ) -> Option<ItemId> {
        let id = self.next_item_id();
        let owner = self.owner(holder)?;
        let item = InventoryItem::from_type(id, owner, item_type, count);
        self.inventory_mut(holder)?.push(item);
        Some(id)
    }

    /// Construct a finished building on a planet
    pub fn spawn_building(
        &mut self,
        planet: PlanetId,
        building_type: &BuildingType,
    ) -> Option<BuildingId> {
        let id = self.next_building_id();
        let planet = self.planet_mut(planet)?;
        planet.buildings.push(Building::new(id, building_type));
        Some(id)
    }
}
