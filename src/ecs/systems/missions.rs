//! Mission expiry, run in the Missions phase.
//!
//! Due attack missions are handed to the battle resolver as `MissionDue`
//! messages. Every other kind settles through the protocol's
//! `completeRemoteMission`, which runs outside the tick, so those are
//! queued on `PendingSettlements` instead.

use bevy_app::App;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::ecs::clock::SimClock;
use crate::ecs::events::MissionDue;
use crate::ecs::resources::{MissionBoard, PendingSettlements};
use crate::ecs::schedule::{SimPhase, SimTick};
use crate::model::MissionKind;

pub fn add_mission_systems(app: &mut App) {
    app.add_systems(SimTick, check_mission_expirations.in_set(SimPhase::Missions));
}

pub fn check_mission_expirations(
    clock: Res<SimClock>,
    board: Res<MissionBoard>,
    mut settlements: ResMut<PendingSettlements>,
    mut due: MessageWriter<MissionDue>,
) {
    for mission in board.0.iter().filter(|m| m.is_due(clock.time)) {
        if mission.kind == MissionKind::Attack {
            due.write(MissionDue {
                mission: mission.id.clone(),
            });
        } else if settlements.mark_due(&mission.id) {
            tracing::debug!(mission = %mission.id, kind = %mission.kind, "mission due for settlement");
        }
    }
}
