use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;

use crate::config::EngineConfig;
use crate::ecs::clock::SimClock;
use crate::ecs::resources::{
    ActivityLog, Daos, EcsIdGenerator, MissionBoard, PendingSettlements, SimSettings, Territories,
};
use crate::error::SimResult;
use crate::model::SimTime;

use super::apply_dao;
use super::apply_mission;
use super::{CommandOutcome, SimCommand};

/// Mutable access to everything a command may touch, lifted out of the
/// world for the duration of one command.
pub(crate) struct ApplyCtx {
    pub territories: Territories,
    pub daos: Daos,
    pub missions: MissionBoard,
    pub activity: ActivityLog,
    pub id_gen: EcsIdGenerator,
    pub settlements: PendingSettlements,
    pub config: EngineConfig,
    pub now: SimTime,
}

fn take<R: Resource>(world: &mut World) -> R {
    world
        .remove_resource::<R>()
        .expect("simulation resources are installed by build_sim_app")
}

impl ApplyCtx {
    fn extract(world: &mut World) -> Self {
        Self {
            now: world.resource::<SimClock>().time,
            config: world.resource::<SimSettings>().0.clone(),
            territories: take(world),
            daos: take(world),
            missions: take(world),
            activity: take(world),
            id_gen: take(world),
            settlements: take(world),
        }
    }

    fn restore(self, world: &mut World) {
        world.insert_resource(self.territories);
        world.insert_resource(self.daos);
        world.insert_resource(self.missions);
        world.insert_resource(self.activity);
        world.insert_resource(self.id_gen);
        world.insert_resource(self.settlements);
    }
}

/// Apply one command against the current state. Must not be called while
/// a tick is running; the single writer guarantees that.
pub fn apply_command(world: &mut World, command: SimCommand) -> SimResult<CommandOutcome> {
    let command_name = command.name();
    let mut ctx = ApplyCtx::extract(world);

    let result = match command {
        SimCommand::RegisterDao { id, name, leader } => {
            apply_dao::apply_register_dao(&mut ctx, id, name, leader)
        }
        SimCommand::AddUnit {
            dao,
            unit,
            unit_type,
        } => apply_dao::apply_add_unit(&mut ctx, &dao, unit, unit_type),
        SimCommand::DeployUnit {
            dao,
            unit_type,
            position,
        } => apply_dao::apply_deploy_unit(&mut ctx, &dao, unit_type, position),
        SimCommand::CreateMission(request) => apply_mission::apply_create_mission(&mut ctx, request),
        SimCommand::StartMission { mission, unit } => {
            apply_mission::apply_start_mission(&mut ctx, &mission, unit.as_deref())
        }
        SimCommand::RecallMission { mission } => {
            apply_mission::apply_recall_mission(&mut ctx, &mission)
        }
        SimCommand::SettleMission { mission } => {
            apply_mission::apply_settle_mission(&mut ctx, &mission)
        }
    };

    ctx.restore(world);
    if let Err(err) = &result {
        tracing::warn!(command = command_name, error = %err, "command rejected");
    }
    result
}

/// Read-only check that `StartMission { mission, unit }` would be accepted
/// right now.
pub fn validate_start(world: &World, mission: &str, unit: Option<&str>) -> SimResult<()> {
    apply_mission::check_start(
        &world.resource::<MissionBoard>().0,
        &world.resource::<Daos>().0,
        &world.resource::<Territories>().0,
        mission,
        unit,
    )
    .map(|_| ())
}
