//! Planet-surface buildings

use serde::{Deserialize, Serialize};

use crate::battle::constants::OPERATIONAL_EFFICIENCY;
use crate::core::types::BuildingId;
use crate::rules::catalog::BuildingType;

/// A building standing on a planet surface
///
/// Damage state is the ratio of `hitpoints` to the type's maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub type_id: String,
    pub hitpoints: f64,
    /// Construction finished
    pub complete: bool,
    /// Switched on by the owner
    pub enabled: bool,
    /// Share of required workers and energy available (0.0 to 1.0)
    pub efficiency: f64,
}

impl Building {
    /// Create a finished, fully staffed building at full health
    pub fn new(id: BuildingId, building_type: &BuildingType) -> Self {
        Self {
            id,
            type_id: building_type.id.clone(),
            hitpoints: building_type.hitpoints,
            complete: true,
            enabled: true,
            efficiency: 1.0,
        }
    }

    pub fn is_operational(&self) -> bool {
        self.complete
            && self.enabled
            && self.hitpoints > 0.0
            && self.efficiency >= OPERATIONAL_EFFICIENCY
    }

    /// Current hitpoints relative to the type maximum, in [0, 1]
    pub fn health_ratio(&self, building_type: &BuildingType) -> f64 {
        if building_type.hitpoints <= 0.0 {
            return 0.0;
        }
        (self.hitpoints / building_type.hitpoints).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::BuildingKind;

    fn gun() -> BuildingType {
        BuildingType {
            id: "Gun1".into(),
            kind: BuildingKind::Gun,
            hitpoints: 400.0,
            production_cost: 100.0,
            space: None,
            shield_percentage: 0.0,
            turrets: vec![],
        }
    }

    #[test]
    fn test_new_building_is_operational() {
        let b = Building::new(BuildingId(1), &gun());
        assert!(b.is_operational());
        assert_eq!(b.health_ratio(&gun()), 1.0);
    }

    #[test]
    fn test_operational_requirements() {
        let mut b = Building::new(BuildingId(1), &gun());
        b.efficiency = 0.4;
        assert!(!b.is_operational());

        b.efficiency = 0.5;
        assert!(b.is_operational());

        b.enabled = false;
        assert!(!b.is_operational());

        b.enabled = true;
        b.complete = false;
        assert!(!b.is_operational());
    }

    #[test]
    fn test_health_ratio() {
        let mut b = Building::new(BuildingId(1), &gun());
        b.hitpoints = 100.0;
        assert_eq!(b.health_ratio(&gun()), 0.25);
    }
}
