//! Per-player battle statistics

use serde::{Deserialize, Serialize};

use crate::core::types::PlayerId;

/// What kind of asset a casualty was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossKind {
    Ship,
    Vehicle,
    Building,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: Option<PlayerId>,

    pub space_battles: u32,
    pub space_wins: u32,
    pub space_losses: u32,
    pub ground_battles: u32,
    pub ground_wins: u32,
    pub ground_losses: u32,

    pub ships_lost: u32,
    pub ships_lost_cost: f64,
    pub ships_destroyed: u32,
    pub ships_destroyed_cost: f64,

    pub vehicles_lost: u32,
    pub vehicles_lost_cost: f64,
    pub vehicles_destroyed: u32,
    pub vehicles_destroyed_cost: f64,

    pub buildings_lost: u32,
    pub buildings_lost_cost: f64,
    pub buildings_destroyed: u32,
    pub buildings_destroyed_cost: f64,

    pub fleets_lost: u32,
    pub planets_conquered: u32,
    pub planets_lost: u32,
}

impl PlayerStats {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player: Some(player),
            ..Default::default()
        }
    }

    /// Count own assets lost
    pub fn record_lost(&mut self, kind: LossKind, count: u32, cost: f64) {
        match kind {
            LossKind::Ship => {
                self.ships_lost += count;
                self.ships_lost_cost += cost;
            }
            LossKind::Vehicle => {
                self.vehicles_lost += count;
                self.vehicles_lost_cost += cost;
            }
            LossKind::Building => {
                self.buildings_lost += count;
                self.buildings_lost_cost += cost;
            }
        }
    }

    /// Count enemy assets destroyed
    pub fn record_destroyed(&mut self, kind: LossKind, count: u32, cost: f64) {
        match kind {
            LossKind::Ship => {
                self.ships_destroyed += count;
                self.ships_destroyed_cost += cost;
            }
            LossKind::Vehicle => {
                self.vehicles_destroyed += count;
                self.vehicles_destroyed_cost += cost;
            }
            LossKind::Building => {
                self.buildings_destroyed += count;
                self.buildings_destroyed_cost += cost;
            }
        }
    }
}
