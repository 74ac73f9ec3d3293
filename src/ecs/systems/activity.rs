use bevy_app::App;
use bevy_ecs::message::MessageReader;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::ecs::clock::SimClock;
use crate::ecs::events::BattleResolved;
use crate::ecs::resources::ActivityLog;
use crate::ecs::schedule::{SimPhase, SimTick};
use crate::ecs::systems::battle::AttackOutcome;
use crate::model::ActivityKind;

pub fn add_activity_systems(app: &mut App) {
    app.add_systems(SimTick, record_battle_activity.in_set(SimPhase::Reactions));
}

/// Turn this tick's battle outcomes into feed entries.
pub fn record_battle_activity(
    clock: Res<SimClock>,
    mut resolved: MessageReader<BattleResolved>,
    mut log: ResMut<ActivityLog>,
) {
    for BattleResolved { mission, outcome } in resolved.read() {
        match outcome {
            AttackOutcome::Captured {
                territory,
                attacker,
                previous_owner,
                attacker_power,
                defender_power,
            } => {
                tracing::info!(
                    %mission,
                    %territory,
                    %attacker,
                    previous_owner = previous_owner.as_deref().unwrap_or("none"),
                    attacker_power,
                    defender_power,
                    "territory captured"
                );
                log.push(
                    clock.time,
                    ActivityKind::TerritoryCaptured,
                    Some(attacker.as_str()),
                    format!("{attacker} captured {territory} ({attacker_power} vs {defender_power})"),
                );
            }
            AttackOutcome::Repelled {
                territory,
                attacker,
                attacker_power,
                defender_power,
            } => {
                tracing::info!(%mission, %territory, %attacker, attacker_power, defender_power, "assault repelled");
                log.push(
                    clock.time,
                    ActivityKind::AssaultRepelled,
                    Some(attacker.as_str()),
                    format!("assault on {territory} repelled ({attacker_power} vs {defender_power})"),
                );
            }
            AttackOutcome::AlreadyHeld {
                territory,
                attacker,
            } => {
                log.push(
                    clock.time,
                    ActivityKind::MissionCompleted,
                    Some(attacker.as_str()),
                    format!("{mission} ended uncontested: {territory} already held"),
                );
            }
            AttackOutcome::Abandoned => {
                log.push(
                    clock.time,
                    ActivityKind::MissionCompleted,
                    None,
                    format!("{mission} abandoned"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ecs::test_helpers::{activity_kinds, test_app, tick_n};
    use crate::model::{ActivityKind, MissionKind, ResourceType, SimTime, UnitType};
    use crate::scenario::Scenario;

    #[test]
    fn battles_land_in_the_feed_once() {
        let mut scenario = Scenario::new();
        let easy = scenario.add_territory(ResourceType::Computing, 10, 0);
        let hard = scenario.add_territory(ResourceType::Computing, 10, 2);
        scenario.dao("alpha", "Alpha").unit(UnitType::Whale, 1);
        scenario.active_mission(MissionKind::Attack, "alpha", Some(&easy), 2, vec![], SimTime::ZERO);
        scenario.active_mission(MissionKind::Attack, "alpha", Some(&hard), 2, vec![], SimTime::ZERO);
        let mut app = test_app(scenario.build());

        tick_n(&mut app, 10);
        assert_eq!(
            activity_kinds(&app),
            vec![ActivityKind::TerritoryCaptured, ActivityKind::AssaultRepelled]
        );
    }
}
