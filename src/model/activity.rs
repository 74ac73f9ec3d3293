use serde::{Deserialize, Serialize};

use super::timestamp::SimTime;
use super::DaoId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    DaoRegistered,
    UnitDeployed,
    MissionStarted,
    TerritoryCaptured,
    AssaultRepelled,
    MissionCompleted,
    MissionRecalled,
    SeasonRolledOver,
}

/// One line of the activity feed shown next to the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub at: SimTime,
    pub kind: ActivityKind,
    pub dao: Option<DaoId>,
    pub message: String,
}
