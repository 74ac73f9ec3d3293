pub mod accrual;
pub mod activity;
pub mod battle;
pub mod missions;
pub mod ranking;
pub mod season;

use bevy_app::App;

/// Register every per-tick system on the `SimTick` schedule.
pub fn add_core_systems(app: &mut App) {
    missions::add_mission_systems(app);
    battle::add_battle_systems(app);
    accrual::add_accrual_systems(app);
    ranking::add_ranking_systems(app);
    activity::add_activity_systems(app);
    season::add_season_systems(app);
}
