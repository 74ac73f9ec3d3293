use crate::error::{RefKind, SimError, SimResult};
use crate::model::{
    ActivityKind, DaoId, DaoRegistry, Mission, MissionKind, MissionLog, MissionStatus,
    ResourcePool, TerritoryRegistry,
};

use super::applicator::ApplyCtx;
use super::{CommandOutcome, MissionRequest};

fn transition(mission: &Mission, to: MissionStatus) -> SimError {
    SimError::InvalidTransition {
        subject: format!("{} mission {}", mission.kind, mission.id),
        from: mission.status.to_string(),
        to: to.to_string(),
    }
}

fn find<'a>(missions: &'a MissionLog, id: &str) -> SimResult<&'a Mission> {
    missions
        .get(id)
        .ok_or_else(|| SimError::invalid_ref(RefKind::Mission, id))
}

pub(crate) fn apply_create_mission(
    ctx: &mut ApplyCtx,
    request: MissionRequest,
) -> SimResult<CommandOutcome> {
    let initiator = request
        .participants
        .first()
        .ok_or_else(|| SimError::invalid_ref(RefKind::Dao, ""))?;
    if let Some(unknown) = request.participants.iter().find(|p| !ctx.daos.0.contains(p)) {
        return Err(SimError::invalid_ref(RefKind::Dao, unknown.as_str()));
    }

    match &request.target {
        None if request.kind.requires_target() => {
            return Err(SimError::invalid_ref(RefKind::Territory, ""));
        }
        Some(target) if request.kind.forbids_target() => {
            return Err(SimError::invalid_ref(RefKind::Territory, target.as_str()));
        }
        Some(target) => {
            let tile = ctx
                .territories
                .0
                .get(target)
                .ok_or_else(|| SimError::invalid_ref(RefKind::Territory, target.as_str()))?;
            if request.kind == MissionKind::Attack && tile.is_owned_by(initiator) {
                return Err(SimError::invalid_ref(RefKind::Territory, target.as_str()));
            }
        }
        None => {}
    }

    let id = ctx.id_gen.0.next_tagged("mission");
    let cost = ctx.config.mission_costs.for_kind(request.kind);
    tracing::debug!(mission = %id, kind = %request.kind, dao = %initiator, "mission created");
    ctx.missions.0.push(Mission {
        id: id.clone(),
        kind: request.kind,
        participants: request.participants,
        target: request.target,
        duration_secs: request.duration_secs,
        rewards: request.rewards,
        cost,
        status: MissionStatus::Pending,
        start_time: None,
    });
    Ok(CommandOutcome::MissionCreated(id))
}

/// What a valid start request will debit, and from whom.
pub(crate) struct StartPlan {
    pub initiator: DaoId,
    pub cost: ResourcePool,
}

/// Every check `StartMission` makes, without touching state.
pub(crate) fn check_start(
    missions: &MissionLog,
    daos: &DaoRegistry,
    territories: &TerritoryRegistry,
    mission_id: &str,
    unit: Option<&str>,
) -> SimResult<StartPlan> {
    let mission = find(missions, mission_id)?;
    if !mission.status.can_transition_to(MissionStatus::Active) {
        return Err(transition(mission, MissionStatus::Active));
    }
    let initiator = mission.initiator().unwrap_or_default();
    let dao = daos
        .get(initiator)
        .ok_or_else(|| SimError::invalid_ref(RefKind::Dao, initiator))?;

    if let Some(target) = &mission.target {
        let tile = territories
            .get(target)
            .ok_or_else(|| SimError::invalid_ref(RefKind::Territory, target.as_str()))?;
        if mission.kind == MissionKind::Attack && tile.is_owned_by(initiator) {
            return Err(SimError::invalid_ref(RefKind::Territory, target.as_str()));
        }
    }

    if let Some(unit) = unit {
        let busy = dao
            .unit(unit)
            .ok_or_else(|| SimError::invalid_ref(RefKind::Unit, unit))?
            .current_mission
            .is_some();
        if busy {
            return Err(SimError::invalid_ref(RefKind::Unit, unit));
        }
    }

    if let Some(err) = dao.resources.shortfall(&mission.cost) {
        return Err(err);
    }
    Ok(StartPlan {
        initiator: initiator.to_string(),
        cost: mission.cost,
    })
}

pub(crate) fn apply_start_mission(
    ctx: &mut ApplyCtx,
    mission_id: &str,
    unit: Option<&str>,
) -> SimResult<CommandOutcome> {
    let plan = check_start(
        &ctx.missions.0,
        &ctx.daos.0,
        &ctx.territories.0,
        mission_id,
        unit,
    )?;

    let dao = ctx
        .daos
        .0
        .get_mut(&plan.initiator)
        .ok_or_else(|| SimError::invalid_ref(RefKind::Dao, plan.initiator.as_str()))?;
    dao.resources.spend(&plan.cost)?;
    if let Some(unit) = unit.and_then(|u| dao.unit_mut(u)) {
        unit.current_mission = Some(mission_id.to_string());
    }

    let now = ctx.now;
    let mission = ctx
        .missions
        .0
        .get_mut(mission_id)
        .ok_or_else(|| SimError::invalid_ref(RefKind::Mission, mission_id))?;
    mission.status = MissionStatus::Active;
    mission.start_time = Some(now);
    let kind = mission.kind;

    ctx.activity.push(
        now,
        ActivityKind::MissionStarted,
        Some(plan.initiator.as_str()),
        format!("{} started a {kind} mission", plan.initiator),
    );
    tracing::debug!(mission = mission_id, %kind, dao = %plan.initiator, "mission started");
    Ok(CommandOutcome::MissionStarted(mission_id.to_string()))
}

pub(crate) fn apply_recall_mission(
    ctx: &mut ApplyCtx,
    mission_id: &str,
) -> SimResult<CommandOutcome> {
    let mission = find(&ctx.missions.0, mission_id)?;
    if mission.status != MissionStatus::Active {
        return Err(transition(mission, MissionStatus::Completed));
    }
    let initiator = mission.initiator().map(str::to_string);

    if let Some(mission) = ctx.missions.0.get_mut(mission_id) {
        mission.status = MissionStatus::Completed;
    }
    for dao in ctx.daos.0.iter_mut() {
        dao.release_units(mission_id);
    }
    ctx.settlements.release(mission_id);
    ctx.activity.push(
        ctx.now,
        ActivityKind::MissionRecalled,
        initiator.as_deref(),
        format!("{mission_id} recalled"),
    );
    tracing::debug!(mission = mission_id, "mission recalled");
    Ok(CommandOutcome::MissionRecalled(mission_id.to_string()))
}

pub(crate) fn apply_settle_mission(
    ctx: &mut ApplyCtx,
    mission_id: &str,
) -> SimResult<CommandOutcome> {
    let mission = find(&ctx.missions.0, mission_id)?;
    if mission.kind == MissionKind::Attack || !mission.is_due(ctx.now) {
        return Err(transition(mission, MissionStatus::Completed));
    }
    let initiator = mission.initiator().unwrap_or_default().to_string();
    let rewards = mission.rewards.clone();
    let kind = mission.kind;

    let xp_per_level = ctx.config.xp_per_level;
    if let Some(dao) = ctx.daos.0.get_mut(&initiator) {
        dao.apply_rewards(&rewards, xp_per_level);
    }
    for dao in ctx.daos.0.iter_mut() {
        dao.release_units(mission_id);
    }
    if let Some(mission) = ctx.missions.0.get_mut(mission_id) {
        mission.status = MissionStatus::Completed;
    }
    ctx.settlements.release(mission_id);
    ctx.activity.push(
        ctx.now,
        ActivityKind::MissionCompleted,
        Some(initiator.as_str()),
        format!("{initiator} completed a {kind} mission"),
    );
    tracing::info!(mission = mission_id, %kind, dao = %initiator, "mission completed");
    Ok(CommandOutcome::MissionSettled {
        mission: mission_id.to_string(),
        rewards,
    })
}
