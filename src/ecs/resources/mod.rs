pub mod activity_log;
pub mod registries;
pub mod sim_resources;

pub use activity_log::ActivityLog;
pub use registries::{Daos, MissionBoard, SeasonInfo, Standings, Territories};
pub use sim_resources::{EcsIdGenerator, PendingSettlements, ProductionSnapshot, SimSettings};
