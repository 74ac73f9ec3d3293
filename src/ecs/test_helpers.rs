use bevy_app::App;

use crate::config::EngineConfig;
use crate::ecs::app::build_sim_app;
use crate::ecs::resources::{ActivityLog, Daos, MissionBoard, Territories};
use crate::ecs::schedule::SimTick;
use crate::model::{ActivityKind, Dao, DaoId, GameState, Mission};

/// Deterministic app with default tunables.
pub fn test_app(state: GameState) -> App {
    build_sim_app(state, EngineConfig::default())
}

pub fn tick_n(app: &mut App, n: u64) {
    for _ in 0..n {
        app.world_mut().run_schedule(SimTick);
    }
}

pub fn dao(app: &App, id: &str) -> Dao {
    app.world()
        .resource::<Daos>()
        .0
        .get(id)
        .cloned()
        .unwrap_or_else(|| panic!("no dao {id}"))
}

pub fn owner_of(app: &App, territory: &str) -> Option<DaoId> {
    app.world()
        .resource::<Territories>()
        .0
        .get(territory)
        .and_then(|t| t.owner.clone())
}

pub fn mission(app: &App, id: &str) -> Mission {
    app.world()
        .resource::<MissionBoard>()
        .0
        .get(id)
        .cloned()
        .unwrap_or_else(|| panic!("no mission {id}"))
}

pub fn activity_kinds(app: &App) -> Vec<ActivityKind> {
    app.world()
        .resource::<ActivityLog>()
        .iter()
        .map(|a| a.kind)
        .collect()
}
