mod common;

use dao_arena::config::EngineConfig;
use dao_arena::ecs::{MissionRequest, SimCommand};
use dao_arena::model::{ActivityKind, MissionStatus, verify_ownership};
use dao_arena::simulation::Simulation;

/// Create and start a ten-second assault by "raider" on `target`.
fn launch(sim: &mut Simulation, target: &str) -> String {
    let mission = sim
        .apply(SimCommand::CreateMission(MissionRequest {
            duration_secs: 10,
            ..MissionRequest::battle("raider", target)
        }))
        .unwrap()
        .into_id();
    sim.apply(SimCommand::StartMission {
        mission: mission.clone(),
        unit: None,
    })
    .unwrap();
    mission
}

#[test]
fn thirty_power_cannot_take_a_defense_one_tile() {
    let (state, target) = common::assault_setup(&[1, 1, 1], 1);
    let mut sim = Simulation::new(state, EngineConfig::default()).unwrap();
    let mission = launch(&mut sim, &target);
    let before = sim.daos().get("raider").unwrap().clone();

    sim.run_ticks(12);

    assert_eq!(sim.mission(&mission).unwrap().status, MissionStatus::Failed);
    assert!(sim.territories().get(&target).unwrap().is_owned_by("holder"));
    let raider = sim.daos().get("raider").unwrap();
    assert_eq!(raider.level, before.level);
    assert_eq!(raider.battles_won, 0);
    assert!(raider.units.iter().all(|u| u.experience == 0));
    assert!(sim
        .activity()
        .iter()
        .any(|a| a.kind == ActivityKind::AssaultRepelled));
}

#[test]
fn sixty_power_captures_and_is_ranked_next_pass() {
    let (state, target) = common::assault_setup(&[3, 3], 1);
    let mut sim = Simulation::new(state, EngineConfig::default()).unwrap();
    let mission = launch(&mut sim, &target);
    let computing_before = sim.daos().get("raider").unwrap().resources.computing;

    sim.run_ticks(12);

    assert_eq!(sim.mission(&mission).unwrap().status, MissionStatus::Completed);
    assert!(sim.territories().get(&target).unwrap().is_owned_by("raider"));
    verify_ownership(sim.territories(), sim.daos()).unwrap();

    let raider = sim.daos().get("raider").unwrap();
    assert_eq!(raider.level, 2);
    assert_eq!(raider.battles_won, 1);
    assert!(raider.territories.contains(&target));
    assert!(raider.units.iter().all(|u| u.experience == 100 && u.level == 3));
    assert!(raider.resources.computing >= computing_before + 1000.0);
    assert!(!sim.daos().get("holder").unwrap().territories.contains(&target));

    let board = sim.leaderboard();
    let raider_entry = board.iter().find(|e| e.dao_id == "raider").unwrap();
    let holder_entry = board.iter().find(|e| e.dao_id == "holder").unwrap();
    assert_eq!(raider_entry.territories_controlled, 2);
    assert_eq!(raider_entry.battles_won, 1);
    assert_eq!(raider_entry.score, 2 * 100 + 2 * 50);
    assert_eq!(holder_entry.territories_controlled, 0);
    assert_eq!(raider_entry.rank, 1);
}

#[test]
fn assault_on_own_tile_is_rejected_up_front() {
    let (state, target) = common::assault_setup(&[5], 0);
    let mut sim = Simulation::new(state, EngineConfig::default()).unwrap();
    launch(&mut sim, &target);
    sim.run_ticks(12);
    assert!(sim.territories().get(&target).unwrap().is_owned_by("raider"));

    let err = sim
        .apply(SimCommand::CreateMission(MissionRequest::battle("raider", target.as_str())))
        .unwrap_err();
    assert!(err.to_string().contains(&target), "{err}");
}
