use thiserror::Error;

use crate::core::types::{FleetId, PlanetId};

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Fleet not found: {0:?}")]
    FleetNotFound(FleetId),

    #[error("Planet not found: {0:?}")]
    PlanetNotFound(PlanetId),

    #[error("Battle has no opponent for fleet {0:?}")]
    NoOpponent(FleetId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BattleError>;
