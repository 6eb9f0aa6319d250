//! Notification hooks for collaborators outside the resolver
//!
//! Strategic AIs are told when a battle starts and ends so they can learn
//! enemy strength; nothing they return is used. Scripting (campaign
//! objectives, messages) hears about destroyed fleets and planet changes.

use std::collections::BTreeMap;

use crate::battle::info::BattleInfo;
use crate::battle::strength::{AttackDefense, SpaceStrengths};
use crate::core::types::{FleetId, PlanetId, PlayerId};

/// Per-player strategic AI
pub trait PlayerAi {
    fn on_auto_spacewar_start(&mut self, _battle: &BattleInfo, _strengths: &SpaceStrengths) {}

    fn on_auto_groundwar_start(
        &mut self,
        _battle: &BattleInfo,
        _attacker: &AttackDefense,
        _defender: &AttackDefense,
    ) {
    }

    fn on_autobattle_finish(&mut self, _battle: &BattleInfo) {}
}

/// Campaign scripting collaborator
pub trait ScriptHooks {
    fn on_fleet_destroyed(&mut self, _fleet: FleetId) {}

    /// A fleet survived but lost some of its ground units
    fn on_lost_vehicles(&mut self, _fleet: FleetId) {}

    fn on_planet_conquered(
        &mut self,
        _planet: PlanetId,
        _new_owner: PlayerId,
        _old_owner: Option<PlayerId>,
    ) {
    }

    fn on_planet_defended(&mut self, _planet: PlanetId, _defender: Option<PlayerId>) {}
}

/// Registered collaborators for one resolution pass
#[derive(Default)]
pub struct BattleHooks {
    ais: BTreeMap<PlayerId, Box<dyn PlayerAi>>,
    script: Option<Box<dyn ScriptHooks>>,
}

impl BattleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_ai(&mut self, player: PlayerId, ai: Box<dyn PlayerAi>) {
        self.ais.insert(player, ai);
    }

    pub fn set_script(&mut self, script: Box<dyn ScriptHooks>) {
        self.script = Some(script);
    }

    pub(crate) fn spacewar_start(
        &mut self,
        players: &[PlayerId],
        battle: &BattleInfo,
        strengths: &SpaceStrengths,
    ) {
        for player in players {
            if let Some(ai) = self.ais.get_mut(player) {
                ai.on_auto_spacewar_start(battle, strengths);
            }
        }
    }

    pub(crate) fn groundwar_start(
        &mut self,
        players: &[PlayerId],
        battle: &BattleInfo,
        attacker: &AttackDefense,
        defender: &AttackDefense,
    ) {
        for player in players {
            if let Some(ai) = self.ais.get_mut(player) {
                ai.on_auto_groundwar_start(battle, attacker, defender);
            }
        }
    }

    pub(crate) fn autobattle_finish(&mut self, players: &[PlayerId], battle: &BattleInfo) {
        for player in players {
            if let Some(ai) = self.ais.get_mut(player) {
                ai.on_autobattle_finish(battle);
            }
        }
    }

    pub(crate) fn fleet_destroyed(&mut self, fleet: FleetId) {
        if let Some(script) = self.script.as_mut() {
            script.on_fleet_destroyed(fleet);
        }
    }

    pub(crate) fn lost_vehicles(&mut self, fleet: FleetId) {
        if let Some(script) = self.script.as_mut() {
            script.on_lost_vehicles(fleet);
        }
    }

    pub(crate) fn planet_conquered(
        &mut self,
        planet: PlanetId,
        new_owner: PlayerId,
        old_owner: Option<PlayerId>,
    ) {
        if let Some(script) = self.script.as_mut() {
            script.on_planet_conquered(planet, new_owner, old_owner);
        }
    }

    pub(crate) fn planet_defended(&mut self, planet: PlanetId, defender: Option<PlayerId>) {
        if let Some(script) = self.script.as_mut() {
            script.on_planet_defended(planet, defender);
        }
    }
}

impl std::fmt::Debug for BattleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleHooks")
            .field("ais", &self.ais.keys().collect::<Vec<_>>())
            .field("script", &self.script.is_some())
            .finish()
    }
}
