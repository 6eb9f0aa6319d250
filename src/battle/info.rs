//! Per-engagement battle context
//!
//! A `BattleInfo` names who fights (the attacker fleet plus a list of
//! participants with explicit roles) and collects the outcome. It is built
//! by the caller, resolved once, then read back.

use serde::{Deserialize, Serialize};

use crate::core::types::{FleetId, PlanetId, PlayerId};

/// A fleet or a planet taking part in a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combatant {
    Fleet(FleetId),
    Planet(PlanetId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Attacker,
    DefenderFleet,
    DefenderPlanet,
    /// Joins whichever side shares its owner
    Helper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub combatant: Combatant,
    pub role: Role,
}

/// Result of the space phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpaceOutcome {
    AttackerVictory,
    DefenderVictory,
    /// Equal time-to-kill, both sides wiped out
    Draw,
    /// Neither side can damage the other
    Stalemate,
}

/// Result of the ground phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundOutcome {
    /// Defenders held; the planet keeps its owner
    Defended,
    /// Ownership passed to the attacker after fighting
    Conquered,
    /// No ground defense at all; the planet fell without a fight
    InstantTakeover,
}

/// Counters incremented while a battle resolves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleCounters {
    pub space_battles: u32,
    pub ground_battles: u32,
    pub skirmish_rounds: u32,
    pub buildings_destroyed: u32,
    /// Buildings destroyed without a fight because the attacker outranged them
    pub buildings_outranged: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleInfo {
    attacker: FleetId,
    #[serde(default)]
    participants: Vec<Participant>,

    pub spacewar_winner: Option<PlayerId>,
    pub groundwar_winner: Option<PlayerId>,
    pub space_outcome: Option<SpaceOutcome>,
    pub ground_outcome: Option<GroundOutcome>,

    /// The target fleet escaped before the engagement and does not fight
    #[serde(default)]
    pub enemy_flee: bool,
    /// Presentation flag owned by the caller, carried through untouched
    #[serde(default)]
    pub invert: bool,
    /// Set when the attacker landed and took the planet
    #[serde(default)]
    pub show_landing: bool,

    #[serde(default)]
    pub counters: BattleCounters,
}

impl BattleInfo {
    pub fn new(attacker: FleetId) -> Self {
        Self {
            attacker,
            participants: Vec::new(),
            spacewar_winner: None,
            groundwar_winner: None,
            space_outcome: None,
            ground_outcome: None,
            enemy_flee: false,
            invert: false,
            show_landing: false,
            counters: BattleCounters::default(),
        }
    }

    pub fn with_target_fleet(mut self, fleet: FleetId) -> Self {
        self.participants.push(Participant {
            combatant: Combatant::Fleet(fleet),
            role: Role::DefenderFleet,
        });
        self
    }

    pub fn with_target_planet(mut self, planet: PlanetId) -> Self {
        self.participants.push(Participant {
            combatant: Combatant::Planet(planet),
            role: Role::DefenderPlanet,
        });
        self
    }

    pub fn with_helper(mut self, combatant: Combatant) -> Self {
        self.participants.push(Participant {
            combatant,
            role: Role::Helper,
        });
        self
    }

    pub fn attacker(&self) -> FleetId {
        self.attacker
    }

    /// Every participant, the attacker first
    pub fn participants(&self) -> impl Iterator<Item = Participant> + '_ {
        std::iter::once(Participant {
            combatant: Combatant::Fleet(self.attacker),
            role: Role::Attacker,
        })
        .chain(self.participants.iter().copied())
    }

    pub fn target_fleet(&self) -> Option<FleetId> {
        self.participants.iter().find_map(|p| match (p.role, p.combatant) {
            (Role::DefenderFleet, Combatant::Fleet(id)) => Some(id),
            _ => None,
        })
    }

    pub fn target_planet(&self) -> Option<PlanetId> {
        self.participants.iter().find_map(|p| match (p.role, p.combatant) {
            (Role::DefenderPlanet, Combatant::Planet(id)) => Some(id),
            _ => None,
        })
    }

    pub fn helper_fleets(&self) -> impl Iterator<Item = FleetId> + '_ {
        self.participants.iter().filter_map(|p| match (p.role, p.combatant) {
            (Role::Helper, Combatant::Fleet(id)) => Some(id),
            _ => None,
        })
    }

    pub fn helper_planet(&self) -> Option<PlanetId> {
        self.participants.iter().find_map(|p| match (p.role, p.combatant) {
            (Role::Helper, Combatant::Planet(id)) => Some(id),
            _ => None,
        })
    }

    /// The planet whose orbit the space battle takes place in
    pub fn involved_planet(&self) -> Option<PlanetId> {
        self.target_planet().or_else(|| self.helper_planet())
    }

    /// Every fleet taking part, the attacker first
    pub fn fleets(&self) -> Vec<FleetId> {
        self.participants()
            .filter_map(|p| match p.combatant {
                Combatant::Fleet(id) => Some(id),
                Combatant::Planet(_) => None,
            })
            .collect()
    }
}
