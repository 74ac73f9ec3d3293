pub mod activity;
pub mod dao;
pub mod hex;
pub mod leaderboard;
pub mod mission;
pub mod resource;
pub mod state;
pub mod territory;
pub mod timestamp;

pub type DaoId = String;
pub type TerritoryId = String;
pub type UnitId = String;
pub type MissionId = String;

pub use activity::{Activity, ActivityKind};
pub use dao::{Dao, DaoRegistry, Unit, UnitType};
pub use hex::{HexCoord, disk_size, hex_disk};
pub use leaderboard::{LeaderboardEntry, rank_daos};
pub use mission::{
    Mission, MissionKind, MissionLog, MissionReward, MissionStatus, MissionTemplate, RewardKind,
};
pub use resource::{ResourcePool, ResourceType};
pub use state::{GameState, Season, rebuild_back_references, transfer_territory, verify_ownership};
pub use territory::{Territory, TerritoryRegistry};
pub use timestamp::SimTime;
