use bevy_app::App;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::ecs::resources::{Daos, Standings, Territories};
use crate::ecs::schedule::{SimPhase, SimTick};
use crate::model::rank_daos;

pub fn add_ranking_systems(app: &mut App) {
    app.add_systems(SimTick, update_leaderboard.in_set(SimPhase::Ranking));
}

/// Recompute the leaderboard from scratch; counts come from territory
/// owner fields, not the DAOs' cached lists.
pub fn update_leaderboard(
    daos: Res<Daos>,
    territories: Res<Territories>,
    mut standings: ResMut<Standings>,
) {
    standings.0 = rank_daos(&daos.0, &territories.0);
}

#[cfg(test)]
mod tests {
    use crate::ecs::resources::Standings;
    use crate::ecs::test_helpers::{test_app, tick_n};
    use crate::model::ResourceType;
    use crate::scenario::Scenario;

    #[test]
    fn leaderboard_reflects_current_ownership() {
        let mut scenario = Scenario::new();
        let tiles: Vec<_> = (0..3)
            .map(|_| scenario.add_territory(ResourceType::Community, 10, 0))
            .collect();
        let mut a = scenario.dao("a", "A").level(2);
        for t in &tiles {
            a = a.owns(t);
        }
        a.id();
        scenario.dao("b", "B").level(5);
        let mut state = scenario.build();
        state.leaderboard.clear();

        let mut app = test_app(state);
        tick_n(&mut app, 1);
        let standings = &app.world().resource::<Standings>().0;
        assert_eq!(standings[0].dao_id, "b");
        assert_eq!((standings[0].score, standings[0].rank), (500, 1));
        assert_eq!((standings[1].score, standings[1].rank), (350, 2));
        assert_eq!(standings[1].territories_controlled, 3);
    }
}
