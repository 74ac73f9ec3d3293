pub mod config;
pub mod db;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod flush;
pub mod id;
pub mod model;
pub mod scenario;
pub mod simulation;
pub mod worldgen;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineOptions, ProtocolClient, RewardSet, SimulatedProtocol, TickMode};
pub use error::{ProtocolError, SimError, SimResult};
pub use id::IdGenerator;
pub use model::{
    Dao, GameState, HexCoord, LeaderboardEntry, Mission, MissionKind, MissionStatus,
    ResourcePool, ResourceType, SimTime, Territory, Unit, UnitType,
};
pub use simulation::{Simulation, TickReport};
pub use worldgen::GridConfig;
