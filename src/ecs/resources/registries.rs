use bevy_ecs::resource::Resource;

use crate::model::{
    DaoRegistry, LeaderboardEntry, MissionLog, Season, TerritoryRegistry,
};

/// The territory grid. `Territory::owner` is authoritative for ownership.
#[derive(Resource, Debug, Clone, Default)]
pub struct Territories(pub TerritoryRegistry);

/// Every registered DAO with its units and resource pool.
#[derive(Resource, Debug, Clone, Default)]
pub struct Daos(pub DaoRegistry);

/// All missions, in creation order.
#[derive(Resource, Debug, Clone, Default)]
pub struct MissionBoard(pub MissionLog);

/// Leaderboard as of the most recent ranking pass.
#[derive(Resource, Debug, Clone, Default)]
pub struct Standings(pub Vec<LeaderboardEntry>);

#[derive(Resource, Debug, Clone, Copy)]
pub struct SeasonInfo(pub Season);
