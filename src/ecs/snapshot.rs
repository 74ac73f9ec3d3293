use bevy_ecs::world::World;

use crate::config::EngineConfig;
use crate::id::IdGenerator;
use crate::model::{GameState, rebuild_back_references};

use super::clock::SimClock;
use super::resources::{
    ActivityLog, Daos, EcsIdGenerator, MissionBoard, PendingSettlements, ProductionSnapshot,
    SeasonInfo, Standings, Territories,
};

/// Load `state` into the world, replacing whatever was there.
///
/// DAO territory lists are rebuilt from the owner fields, so a snapshot
/// with stale back-references heals on load.
pub fn install_state(world: &mut World, state: GameState, config: &EngineConfig) {
    let GameState {
        season,
        clock,
        tick_count,
        next_id,
        territories,
        mut daos,
        missions,
        leaderboard,
        activity,
    } = state;
    rebuild_back_references(&territories, &mut daos);

    world.insert_resource(SimClock::resume(clock, tick_count, config.tick_secs));
    world.insert_resource(SeasonInfo(season));
    world.insert_resource(EcsIdGenerator(IdGenerator::starting_from(next_id)));
    world.insert_resource(Territories(territories));
    world.insert_resource(Daos(daos));
    world.insert_resource(MissionBoard(missions));
    world.insert_resource(Standings(leaderboard));
    world.insert_resource(ActivityLog::from_entries(activity, config.activity_log_capacity));
    world.insert_resource(PendingSettlements::default());
    world.insert_resource(ProductionSnapshot::default());
}

/// Copy the full simulation state out of the world.
pub fn snapshot_state(world: &World) -> GameState {
    let clock = world.resource::<SimClock>();
    GameState {
        season: world.resource::<SeasonInfo>().0,
        clock: clock.time,
        tick_count: clock.tick_count,
        next_id: world.resource::<EcsIdGenerator>().0.peek(),
        territories: world.resource::<Territories>().0.clone(),
        daos: world.resource::<Daos>().0.clone(),
        missions: world.resource::<MissionBoard>().0.clone(),
        leaderboard: world.resource::<Standings>().0.clone(),
        activity: world.resource::<ActivityLog>().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResourceType, SimTime};
    use crate::scenario::Scenario;

    #[test]
    fn install_then_snapshot_is_lossless() {
        let mut scenario = Scenario::new();
        let t = scenario.add_territory(ResourceType::Computing, 30, 1);
        scenario.dao("alpha", "Alpha").owns(&t);
        scenario.clock(SimTime::from_secs(77));
        let state = scenario.build();

        let mut world = World::new();
        install_state(&mut world, state.clone(), &EngineConfig::default());
        assert_eq!(snapshot_state(&world), state);
    }

    #[test]
    fn install_heals_stale_back_references() {
        let mut scenario = Scenario::new();
        let t = scenario.add_territory(ResourceType::Computing, 30, 1);
        scenario.dao("alpha", "Alpha").owns(&t);
        let mut state = scenario.build();
        state.daos.get_mut("alpha").unwrap().territories.clear();

        let mut world = World::new();
        install_state(&mut world, state, &EngineConfig::default());
        let daos = &world.resource::<Daos>().0;
        assert_eq!(daos.get("alpha").unwrap().territories, vec![t]);
    }
}
