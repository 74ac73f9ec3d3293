pub mod config;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::model::{HexCoord, ResourceType, Territory, hex_disk};

pub use config::GridConfig;

/// Generate the territory grid for a new session from `config.seed`.
///
/// Every territory starts unowned; starting assignment is the scenario's job.
pub fn generate_grid(config: &GridConfig) -> Vec<Territory> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    generate_grid_with(config, &mut rng)
}

/// Generate with a caller-supplied RNG. Ids are `hex_0`, `hex_1`, … in
/// disk enumeration order.
pub fn generate_grid_with(config: &GridConfig, rng: &mut impl Rng) -> Vec<Territory> {
    let (low, high) = if config.production_min <= config.production_max {
        (config.production_min.max(1), config.production_max.max(1))
    } else {
        (config.production_max.max(1), config.production_min.max(1))
    };

    let territories: Vec<Territory> = hex_disk(config.radius)
        .into_iter()
        .enumerate()
        .map(|(index, coords)| roll_territory(index, coords, low, high, config.defense_max, rng))
        .collect();

    tracing::debug!(
        radius = config.radius,
        seed = config.seed,
        count = territories.len(),
        "generated territory grid"
    );
    territories
}

fn roll_territory(
    index: usize,
    coords: HexCoord,
    production_low: u32,
    production_high: u32,
    defense_max: u32,
    rng: &mut impl Rng,
) -> Territory {
    let resource_type = ResourceType::ALL[rng.random_range(0..ResourceType::ALL.len())];
    Territory {
        id: format!("hex_{index}"),
        coords,
        owner: None,
        resource_type,
        production_rate: rng.random_range(production_low..=production_high),
        defense_level: rng.random_range(0..=defense_max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_sizes_follow_closed_form() {
        for radius in 0..=5u32 {
            let config = GridConfig {
                radius,
                ..GridConfig::default()
            };
            let grid = generate_grid(&config);
            let n = radius as usize;
            assert_eq!(grid.len(), 3 * n * n + 3 * n + 1);
        }
    }

    #[test]
    fn every_tile_satisfies_cube_constraint() {
        let grid = generate_grid(&GridConfig::default());
        for tile in &grid {
            assert_eq!(tile.coords.q + tile.coords.r + tile.coords.s, 0);
            assert!(tile.coords.radius() <= 3);
        }
    }

    #[test]
    fn rolled_values_stay_in_bounds() {
        let config = GridConfig {
            radius: 6,
            ..GridConfig::default()
        };
        for tile in generate_grid(&config) {
            assert!((10..=59).contains(&tile.production_rate));
            assert!(tile.defense_level <= 2);
            assert!(tile.owner.is_none());
        }
    }

    #[test]
    fn same_seed_same_grid() {
        let config = GridConfig::default();
        assert_eq!(generate_grid(&config), generate_grid(&config));
    }

    #[test]
    fn different_seed_different_grid() {
        let a = generate_grid(&GridConfig::default());
        let b = generate_grid(&GridConfig {
            seed: 7,
            ..GridConfig::default()
        });
        assert_ne!(a, b);
    }

    #[test]
    fn ids_follow_enumeration_order() {
        let grid = generate_grid(&GridConfig {
            radius: 1,
            ..GridConfig::default()
        });
        assert_eq!(grid[0].id, "hex_0");
        assert_eq!(grid[0].coords, HexCoord::new(-1, 0));
        assert_eq!(grid[6].id, "hex_6");
    }

    #[test]
    fn inverted_production_bounds_are_tolerated() {
        let config = GridConfig {
            production_min: 40,
            production_max: 20,
            ..GridConfig::default()
        };
        for tile in generate_grid(&config) {
            assert!((20..=40).contains(&tile.production_rate));
        }
    }
}
