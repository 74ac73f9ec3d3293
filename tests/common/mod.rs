#![allow(dead_code)]

use dao_arena::model::*;
use dao_arena::scenario::Scenario;
use dao_arena::worldgen::{self, GridConfig};

/// Radius-1 grid with "alpha" owning the first two tiles, each producing
/// 30 computing per minute.
pub fn alpha_on_small_grid() -> GameState {
    let grid = GridConfig {
        radius: 1,
        ..GridConfig::default()
    };
    let mut tiles = worldgen::generate_grid(&grid);
    for tile in tiles.iter_mut().take(2) {
        tile.resource_type = ResourceType::Computing;
        tile.production_rate = 30;
    }

    let mut state = GameState::empty(Season::first(SimTime::ZERO, 30 * 86_400));
    state.territories = TerritoryRegistry::new(tiles);
    state.daos.insert(Dao::new("alpha", "Alpha", "Ada"));
    transfer_territory(&mut state.territories, &mut state.daos, "hex_0", "alpha");
    transfer_territory(&mut state.territories, &mut state.daos, "hex_1", "alpha");
    state.leaderboard = rank_daos(&state.daos, &state.territories);
    state
}

/// "raider" with the given unit levels facing one unowned tile of the given
/// defense held by "holder". Returns the state and the tile id.
pub fn assault_setup(levels: &[u32], defense: u32) -> (GameState, TerritoryId) {
    let mut scenario = Scenario::new();
    let home = scenario.add_territory(ResourceType::Liquidity, 20, 0);
    let target = scenario.add_territory(ResourceType::Governance, 40, defense);
    let mut raider = scenario
        .dao("raider", "Raider")
        .resources(ResourcePool::uniform(1000.0))
        .owns(&home);
    for &level in levels {
        raider = raider.unit(UnitType::Degen, level);
    }
    scenario.dao("holder", "Holder").owns(&target);
    (scenario.build(), target)
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
