use serde::{Deserialize, Serialize};

/// Configuration for grid generation and starting assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// RNG seed for deterministic generation.
    pub seed: u64,
    /// Hex-disk radius; the grid holds `3N² + 3N + 1` territories.
    pub radius: u32,
    /// Inclusive production-rate bounds (units per minute).
    pub production_min: u32,
    pub production_max: u32,
    /// Inclusive upper bound for the starting defense level.
    pub defense_max: u32,
    /// Tiles granted to the player DAO, taken from the front of the grid.
    pub player_start_tiles: usize,
    /// Tiles granted to the rival DAO, taken from the back of the grid.
    pub rival_start_tiles: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            radius: 3,
            production_min: 10,
            production_max: 59,
            defense_max: 2,
            player_start_tiles: 2,
            rival_start_tiles: 3,
        }
    }
}
