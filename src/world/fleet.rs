//! Fleets - mobile stacks of ships and carried ground units

use serde::{Deserialize, Serialize};

use crate::core::types::{FleetId, PlayerId};
use crate::rules::catalog::RulesCatalog;
use crate::world::inventory::InventoryItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub id: FleetId,
    pub owner: PlayerId,
    pub name: String,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
}

impl Fleet {
    pub fn new(id: FleetId, owner: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            inventory: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.iter().all(|i| i.is_empty())
    }

    /// True if the fleet carries any tanks or vehicles
    pub fn has_ground_units(&self, rules: &RulesCatalog) -> bool {
        self.inventory.iter().any(|i| {
            !i.is_empty()
                && rules
                    .item_category(&i.type_id)
                    .is_some_and(|c| c.is_ground())
        })
    }

    /// Drop exhausted stacks
    pub fn prune(&mut self) {
        self.inventory.retain(|i| !i.is_empty());
    }
}
