pub mod app;
pub mod clock;
pub mod commands;
pub mod events;
pub mod resources;
pub mod schedule;
pub mod snapshot;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::{build_sim_app, build_sim_app_with_executor};
pub use clock::SimClock;
pub use commands::{CommandOutcome, MissionRequest, SimCommand, apply_command, validate_start};
pub use events::{BattleResolved, MissionDue};
pub use resources::{
    ActivityLog, Daos, EcsIdGenerator, MissionBoard, PendingSettlements, ProductionSnapshot,
    SeasonInfo, SimSettings, Standings, Territories,
};
pub use schedule::{SimPhase, SimTick, configure_sim_schedule};
pub use snapshot::{install_state, snapshot_state};
pub use systems::battle::AttackOutcome;
