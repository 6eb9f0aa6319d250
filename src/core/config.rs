//! Battle configuration with documented constants
//!
//! Tunable values that change the outcome of terminal planet effects and the
//! ground skirmish loop. Engine invariants that are not meant to be tuned
//! live in `battle::constants`.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{PLANET_CONQUER_LOSS, PLANET_DEFENSE_LOSS};
use crate::core::error::{BattleError, Result};
use crate::core::types::Difficulty;

/// Configuration for the automatic battle resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // === ECM ===
    /// Difficulty used to pick the anti-ECM probability matrix
    pub difficulty: Difficulty,

    // === PLANET EFFECTS ===
    /// Population lost by a planet that repels a ground assault
    pub planet_defense_loss: u32,

    /// Population lost by a planet that changes owner
    pub planet_conquer_loss: u32,

    /// Divisor applied to both losses while an operational bunker stands
    ///
    /// At 2, a bunker halves population losses.
    pub bunker_loss_divisor: u32,

    /// Morale a planet starts with under its new owner
    pub takeover_morale: f64,

    // === GROUND SKIRMISH ===
    /// Fewest attacking vehicles that can reach a defensive building per round
    pub min_accessibility: u32,

    /// Most attacking vehicles that can reach a defensive building per round
    ///
    /// Each round draws uniformly from `min_accessibility..=max_accessibility`.
    pub max_accessibility: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            planet_defense_loss: PLANET_DEFENSE_LOSS,
            planet_conquer_loss: PLANET_CONQUER_LOSS,
            bunker_loss_divisor: 2,
            takeover_morale: 50.0,

            min_accessibility: 2,
            max_accessibility: 5,
        }
    }
}

impl BattleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_accessibility == 0 {
            return Err(BattleError::InvalidConfig(
                "min_accessibility must be at least 1".into(),
            ));
        }

        if self.min_accessibility > self.max_accessibility {
            return Err(BattleError::InvalidConfig(format!(
                "min_accessibility ({}) should be <= max_accessibility ({})",
                self.min_accessibility, self.max_accessibility
            )));
        }

        if self.bunker_loss_divisor == 0 {
            return Err(BattleError::InvalidConfig(
                "bunker_loss_divisor must be at least 1".into(),
            ));
        }

        if !(0.0..=100.0).contains(&self.takeover_morale) {
            return Err(BattleError::InvalidConfig(format!(
                "takeover_morale ({}) must be within 0..=100",
                self.takeover_morale
            )));
        }

        Ok(())
    }

    /// Population loss for a planet, halved (by default) behind a bunker
    pub fn population_loss(&self, base: u32, has_bunker: bool) -> u32 {
        if has_bunker {
            base / self.bunker_loss_divisor.max(1)
        } else {
            base
        }
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: BattleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }
}
