pub mod applicator;
mod apply_dao;
mod apply_mission;

use crate::model::{
    DaoId, HexCoord, MissionId, MissionKind, MissionReward, MissionTemplate, TerritoryId, UnitId,
    UnitType,
};

pub use applicator::{apply_command, validate_start};

/// A request to change simulation state, applied between ticks.
///
/// Every command is validated in full before anything is written, so a
/// rejected command leaves the world exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum SimCommand {
    /// Register a DAO under an id issued by the protocol.
    RegisterDao {
        id: DaoId,
        name: String,
        leader: String,
    },
    /// Attach a unit the protocol created. Free of charge.
    AddUnit {
        dao: DaoId,
        unit: UnitId,
        unit_type: UnitType,
    },
    /// Pay for and deploy a new unit.
    DeployUnit {
        dao: DaoId,
        unit_type: UnitType,
        position: Option<HexCoord>,
    },
    CreateMission(MissionRequest),
    /// `pending -> active`; debits the mission cost and optionally assigns
    /// an idle unit.
    StartMission {
        mission: MissionId,
        unit: Option<UnitId>,
    },
    /// `active -> completed` without rewards.
    RecallMission { mission: MissionId },
    /// Complete a due non-attack mission and pay its rewards.
    SettleMission { mission: MissionId },
}

impl SimCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SimCommand::RegisterDao { .. } => "register_dao",
            SimCommand::AddUnit { .. } => "add_unit",
            SimCommand::DeployUnit { .. } => "deploy_unit",
            SimCommand::CreateMission(_) => "create_mission",
            SimCommand::StartMission { .. } => "start_mission",
            SimCommand::RecallMission { .. } => "recall_mission",
            SimCommand::SettleMission { .. } => "settle_mission",
        }
    }
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    DaoRegistered(DaoId),
    UnitAdded(UnitId),
    MissionCreated(MissionId),
    MissionStarted(MissionId),
    MissionRecalled(MissionId),
    MissionSettled {
        mission: MissionId,
        rewards: Vec<MissionReward>,
    },
}

impl CommandOutcome {
    /// Id of the object the command created or changed.
    pub fn id(&self) -> &str {
        match self {
            CommandOutcome::DaoRegistered(id)
            | CommandOutcome::UnitAdded(id)
            | CommandOutcome::MissionCreated(id)
            | CommandOutcome::MissionStarted(id)
            | CommandOutcome::MissionRecalled(id) => id,
            CommandOutcome::MissionSettled { mission, .. } => mission,
        }
    }

    pub fn into_id(self) -> String {
        match self {
            CommandOutcome::DaoRegistered(id)
            | CommandOutcome::UnitAdded(id)
            | CommandOutcome::MissionCreated(id)
            | CommandOutcome::MissionStarted(id)
            | CommandOutcome::MissionRecalled(id) => id,
            CommandOutcome::MissionSettled { mission, .. } => mission,
        }
    }
}

/// Parameters for a new mission. The start cost is not part of the
/// request; it comes from `EngineConfig::mission_costs`.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionRequest {
    pub kind: MissionKind,
    /// The first participant initiates and pays.
    pub participants: Vec<DaoId>,
    pub target: Option<TerritoryId>,
    pub duration_secs: u64,
    pub rewards: Vec<MissionReward>,
}

impl MissionRequest {
    pub fn from_template(
        template: MissionTemplate,
        dao: impl Into<DaoId>,
        target: Option<TerritoryId>,
    ) -> Self {
        Self {
            kind: template.kind,
            participants: vec![dao.into()],
            target,
            duration_secs: template.duration_secs,
            rewards: template.rewards,
        }
    }

    /// The quick-launch mission of `kind`.
    pub fn quick(kind: MissionKind, dao: impl Into<DaoId>, target: Option<TerritoryId>) -> Self {
        Self::from_template(MissionTemplate::quick(kind), dao, target)
    }

    /// A standard assault on `territory`.
    pub fn battle(dao: impl Into<DaoId>, territory: impl Into<TerritoryId>) -> Self {
        Self::from_template(MissionTemplate::battle(), dao, Some(territory.into()))
    }
}
