use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::timestamp::SECONDS_PER_DAY;
use crate::model::{MissionKind, ResourcePool, ResourceType};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Start cost of each mission kind, in computing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionCosts {
    pub attack: f64,
    pub defend: f64,
    pub harvest: f64,
    pub raid: f64,
}

impl Default for MissionCosts {
    fn default() -> Self {
        Self {
            attack: 100.0,
            defend: 100.0,
            harvest: 100.0,
            raid: 200.0,
        }
    }
}

impl MissionCosts {
    pub fn for_kind(&self, kind: MissionKind) -> ResourcePool {
        let amount = match kind {
            MissionKind::Attack => self.attack,
            MissionKind::Defend => self.defend,
            MissionKind::Harvest => self.harvest,
            MissionKind::Raid => self.raid,
        };
        ResourcePool::single(ResourceType::Computing, amount)
    }
}

/// Tunables for the simulation core. Every field has a default; a JSON file
/// only needs to name the ones it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulated seconds per tick.
    pub tick_secs: u64,
    /// Production rates are stated per this many seconds.
    pub production_period_secs: f64,
    pub unit_power_coefficient: u32,
    pub defense_coefficient: u32,
    /// A unit levels up at `level * xp_per_level` experience.
    pub xp_per_level: u32,
    pub season_length_secs: u64,
    /// Pool granted to a DAO registered through the protocol.
    pub starting_resources: f64,
    pub mission_costs: MissionCosts,
    pub activity_log_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_secs: 1,
            production_period_secs: 60.0,
            unit_power_coefficient: 10,
            defense_coefficient: 50,
            xp_per_level: 100,
            season_length_secs: 30 * SECONDS_PER_DAY,
            starting_resources: 1000.0,
            mission_costs: MissionCosts::default(),
            activity_log_capacity: 50,
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_secs == 0 {
            return Err(ConfigError::Invalid("tick_secs must be positive".into()));
        }
        if self.production_period_secs <= 0.0 {
            return Err(ConfigError::Invalid(
                "production_period_secs must be positive".into(),
            ));
        }
        if self.xp_per_level == 0 {
            return Err(ConfigError::Invalid("xp_per_level must be positive".into()));
        }
        if self.season_length_secs == 0 {
            return Err(ConfigError::Invalid(
                "season_length_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Amount one territory adds to its owner's pool per tick.
    pub fn gain_per_tick(&self, production_rate: u32) -> f64 {
        f64::from(production_rate) * self.tick_secs as f64 / self.production_period_secs
    }
}
