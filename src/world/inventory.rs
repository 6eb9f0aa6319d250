//! Inventory stacks held by fleets and planets

use serde::{Deserialize, Serialize};

use crate::core::types::{ItemId, PlayerId};
use crate::rules::catalog::ItemType;

/// Equipment loaded into one slot of an inventory stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub id: String,
    pub equipment: Option<String>,
    pub count: u32,
}

/// A stack of identical units
///
/// `hp` and `shield` are per-unit values shared by every unit in the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub owner: PlayerId,
    pub type_id: String,
    pub count: u32,
    pub hp: f64,
    pub shield: f64,
    #[serde(default)]
    pub slots: Vec<InventorySlot>,
}

impl InventoryItem {
    /// Create a full-strength stack; fixed slots come loaded, others empty
    pub fn from_type(id: ItemId, owner: PlayerId, item_type: &ItemType, count: u32) -> Self {
        let slots = item_type
            .slots
            .iter()
            .map(|s| InventorySlot {
                id: s.id.clone(),
                equipment: s.equipment.clone(),
                count: if s.fixed { s.max } else { 0 },
            })
            .collect();

        Self {
            id,
            owner,
            type_id: item_type.id.clone(),
            count,
            hp: item_type.hitpoints,
            shield: item_type.shield,
            slots,
        }
    }

    /// Hitpoints one unit can absorb
    pub fn unit_value(&self) -> f64 {
        self.hp.max(0.0) + self.shield.max(0.0)
    }

    /// Hitpoints the whole stack can absorb
    pub fn stack_value(&self) -> f64 {
        self.unit_value() * self.count as f64
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Apply damage to the stack and return how many units died
    ///
    /// Whole units die first; the remainder wears down the shared per-unit
    /// shield, then hp, of the survivors.
    pub fn absorb(&mut self, damage: f64) -> u32 {
        if damage <= 0.0 || self.count == 0 {
            return 0;
        }
        let unit = self.unit_value();
        if unit <= 0.0 || damage >= self.stack_value() {
            let dead = self.count;
            self.count = 0;
            return dead;
        }

        let dead = ((damage / unit).floor() as u32).min(self.count);
        self.count -= dead;

        let mut residual = damage - dead as f64 * unit;
        if self.count > 0 && residual > 0.0 {
            let absorbed = residual.min(self.shield);
            self.shield -= absorbed;
            residual -= absorbed;
            self.hp = (self.hp - residual).max(0.0);
        }
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::{ItemCategory, SlotDef};

    fn cruiser() -> ItemType {
        ItemType {
            id: "Cruiser1".into(),
            category: ItemCategory::Cruiser,
            production_cost: 100.0,
            hitpoints: 80.0,
            shield: 20.0,
            slots: vec![
                SlotDef { id: "guns".into(), fixed: true, equipment: Some("Laser1".into()), max: 2 },
                SlotDef { id: "ecm".into(), fixed: false, equipment: None, max: 1 },
            ],
            vehicle: None,
        }
    }

    #[test]
    fn test_from_type_loads_fixed_slots() {
        let item = InventoryItem::from_type(ItemId(1), PlayerId(1), &cruiser(), 3);
        assert_eq!(item.count, 3);
        assert_eq!(item.hp, 80.0);
        assert_eq!(item.shield, 20.0);
        assert_eq!(item.slots[0].count, 2);
        assert_eq!(item.slots[1].count, 0);
        assert_eq!(item.stack_value(), 300.0);
    }

    #[test]
    fn test_absorb_partial_damage() {
        let mut item = InventoryItem::from_type(ItemId(1), PlayerId(1), &cruiser(), 3);
        // One full unit (100) dies, 30 more hits the survivors' shield then hp
        let dead = item.absorb(130.0);
        assert_eq!(dead, 1);
        assert_eq!(item.count, 2);
        assert_eq!(item.shield, 0.0);
        assert_eq!(item.hp, 70.0);
    }

    #[test]
    fn test_absorb_overkill_empties_stack() {
        let mut item = InventoryItem::from_type(ItemId(1), PlayerId(1), &cruiser(), 2);
        assert_eq!(item.absorb(1000.0), 2);
        assert!(item.is_empty());
    }

    #[test]
    fn test_absorb_nothing() {
        let mut item = InventoryItem::from_type(ItemId(1), PlayerId(1), &cruiser(), 2);
        assert_eq!(item.absorb(0.0), 0);
        assert_eq!(item.count, 2);
        assert_eq!(item.hp, 80.0);
    }
}
