use bevy_app::App;
use bevy_ecs::message::{MessageRegistry, message_update_system};
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};

use crate::config::EngineConfig;
use crate::model::GameState;

use super::events::{BattleResolved, MissionDue};
use super::resources::SimSettings;
use super::schedule::{SimPhase, configure_sim_schedule};
use super::snapshot::install_state;
use super::systems::add_core_systems;

/// Build a headless Bevy app holding `state`, with every per-tick system
/// registered on a single-threaded `SimTick` schedule.
///
/// Manual tick control:
/// ```no_run
/// # use dao_arena::config::EngineConfig;
/// # use dao_arena::ecs::{build_sim_app, SimTick};
/// # use dao_arena::scenario::new_session;
/// # use dao_arena::worldgen::GridConfig;
/// let config = EngineConfig::default();
/// let mut app = build_sim_app(new_session(&GridConfig::default(), &config), config);
/// for _ in 0..60 {
///     app.world_mut().run_schedule(SimTick);
/// }
/// ```
pub fn build_sim_app(state: GameState, config: EngineConfig) -> App {
    build_sim_app_with_executor(state, config, ExecutorKind::SingleThreaded)
}

/// Build with a specific executor kind. Phases are chained either way, but
/// only the single-threaded executor fixes the order of systems that share
/// a phase.
pub fn build_sim_app_with_executor(
    state: GameState,
    config: EngineConfig,
    executor: ExecutorKind,
) -> App {
    let mut app = App::empty();

    install_state(app.world_mut(), state, &config);
    app.insert_resource(SimSettings(config));

    MessageRegistry::register_message::<MissionDue>(app.world_mut());
    MessageRegistry::register_message::<BattleResolved>(app.world_mut());

    let mut schedule = configure_sim_schedule(executor);
    schedule.add_systems(message_update_system.in_set(SimPhase::PreUpdate));
    app.add_schedule(schedule);
    add_core_systems(&mut app);
    app
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;
    use crate::ecs::clock::SimClock;
    use crate::ecs::schedule::SimTick;
    use crate::ecs::test_helpers::{test_app, tick_n};
    use crate::model::{Season, SimTime};

    fn empty_state() -> GameState {
        GameState::empty(Season::first(SimTime::ZERO, 1_000_000))
    }

    #[test]
    fn single_tick_advances_one_second() {
        let mut app = test_app(empty_state());
        app.world_mut().run_schedule(SimTick);
        let clock = app.world().resource::<SimClock>();
        assert_eq!(clock.time, SimTime::from_secs(1));
        assert_eq!(clock.tick_count, 1);
    }

    #[test]
    fn tick_length_comes_from_config() {
        let config = EngineConfig {
            tick_secs: 5,
            ..EngineConfig::default()
        };
        let mut app = build_sim_app(empty_state(), config);
        tick_n(&mut app, 12);
        assert_eq!(app.world().resource::<SimClock>().time, SimTime::from_secs(60));
    }

    #[test]
    fn phase_ordering_respected() {
        let log = Arc::new(Mutex::new(Vec::<&'static str>::new()));
        let mut app = test_app(empty_state());

        for (phase, label) in [
            (SimPhase::Last, "last"),
            (SimPhase::Accrual, "accrual"),
            (SimPhase::Missions, "missions"),
            (SimPhase::Battles, "battles"),
            (SimPhase::PreUpdate, "pre_update"),
        ] {
            let log = log.clone();
            app.add_systems(
                SimTick,
                (move || log.lock().unwrap().push(label)).in_set(phase),
            );
        }

        app.world_mut().run_schedule(SimTick);
        let entries = log.lock().unwrap();
        assert_eq!(
            *entries,
            vec!["pre_update", "missions", "battles", "accrual", "last"]
        );
    }
}
