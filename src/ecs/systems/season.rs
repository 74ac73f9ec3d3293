use bevy_app::App;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::ecs::clock::{SimClock, advance_clock};
use crate::ecs::resources::{ActivityLog, SeasonInfo, SimSettings};
use crate::ecs::schedule::{SimPhase, SimTick};
use crate::model::ActivityKind;

pub fn add_season_systems(app: &mut App) {
    app.add_systems(
        SimTick,
        roll_season.after(advance_clock).in_set(SimPhase::Last),
    );
}

/// Open the next season once the clock reaches the current season's end.
///
/// At most one rollover per tick; a clock far past the end catches up over
/// the following ticks.
pub fn roll_season(
    clock: Res<SimClock>,
    settings: Res<SimSettings>,
    mut season: ResMut<SeasonInfo>,
    mut log: ResMut<ActivityLog>,
) {
    if clock.time < season.0.end {
        return;
    }
    season.0 = season.0.next(settings.0.season_length_secs);
    tracing::info!(
        season = season.0.number,
        start = %season.0.start,
        end = %season.0.end,
        "season rolled over"
    );
    log.push(
        clock.time,
        ActivityKind::SeasonRolledOver,
        None,
        format!("season {} begins", season.0.number),
    );
}
