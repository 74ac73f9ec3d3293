use crate::error::{RefKind, SimError, SimResult};
use crate::model::{ActivityKind, Dao, DaoId, HexCoord, ResourcePool, Unit, UnitId, UnitType};

use super::CommandOutcome;
use super::applicator::ApplyCtx;

pub(crate) fn apply_register_dao(
    ctx: &mut ApplyCtx,
    id: DaoId,
    name: String,
    leader: String,
) -> SimResult<CommandOutcome> {
    if ctx.daos.0.contains(&id) {
        return Err(SimError::invalid_ref(RefKind::Dao, id));
    }
    let mut dao = Dao::new(id.clone(), name, leader);
    dao.resources = ResourcePool::uniform(ctx.config.starting_resources);
    ctx.activity.push(
        ctx.now,
        ActivityKind::DaoRegistered,
        Some(id.as_str()),
        format!("{} joined the arena", dao.name),
    );
    ctx.daos.0.insert(dao);
    tracing::info!(dao = %id, "dao registered");
    Ok(CommandOutcome::DaoRegistered(id))
}

pub(crate) fn apply_add_unit(
    ctx: &mut ApplyCtx,
    dao: &str,
    unit: UnitId,
    unit_type: UnitType,
) -> SimResult<CommandOutcome> {
    if ctx.daos.0.find_unit(&unit).is_some() {
        return Err(SimError::invalid_ref(RefKind::Unit, unit));
    }
    let owner = ctx
        .daos
        .0
        .get_mut(dao)
        .ok_or_else(|| SimError::invalid_ref(RefKind::Dao, dao))?;
    owner
        .units
        .push(Unit::new(unit.clone(), unit_type, dao.to_string(), None));
    tracing::debug!(dao, unit = %unit, %unit_type, "unit added");
    Ok(CommandOutcome::UnitAdded(unit))
}

pub(crate) fn apply_deploy_unit(
    ctx: &mut ApplyCtx,
    dao: &str,
    unit_type: UnitType,
    position: Option<HexCoord>,
) -> SimResult<CommandOutcome> {
    if let Some(coords) = position
        && ctx.territories.0.at(coords).is_none()
    {
        return Err(SimError::invalid_ref(RefKind::Territory, coords.to_string()));
    }
    let owner = ctx
        .daos
        .0
        .get_mut(dao)
        .ok_or_else(|| SimError::invalid_ref(RefKind::Dao, dao))?;
    owner.resources.spend(&unit_type.deployment_cost())?;

    let id = ctx.id_gen.0.next_tagged("unit");
    owner
        .units
        .push(Unit::new(id.clone(), unit_type, dao.to_string(), position));
    ctx.activity.push(
        ctx.now,
        ActivityKind::UnitDeployed,
        Some(dao),
        format!("{dao} deployed a {unit_type}"),
    );
    tracing::debug!(dao, unit = %id, %unit_type, "unit deployed");
    Ok(CommandOutcome::UnitAdded(id))
}

#[cfg(test)]
mod tests {
    use crate::ecs::commands::{CommandOutcome, SimCommand, apply_command};
    use crate::ecs::test_helpers::{activity_kinds, dao, test_app};
    use crate::error::{RefKind, SimError};
    use crate::model::{ActivityKind, HexCoord, ResourcePool, ResourceType, UnitType};
    use crate::scenario::Scenario;

    fn app_with(pool: ResourcePool) -> bevy_app::App {
        let mut scenario = Scenario::new();
        scenario.add_territory(ResourceType::Computing, 10, 0);
        scenario.dao("alpha", "Alpha").resources(pool);
        test_app(scenario.build())
    }

    #[test]
    fn deploy_debits_full_cost() {
        let mut app = app_with(ResourcePool::uniform(1000.0));
        let outcome = apply_command(
            app.world_mut(),
            SimCommand::DeployUnit {
                dao: "alpha".into(),
                unit_type: UnitType::Validator,
                position: Some(HexCoord::ORIGIN),
            },
        )
        .unwrap();
        let CommandOutcome::UnitAdded(id) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };

        let alpha = dao(&app, "alpha");
        assert_eq!(alpha.resources, ResourcePool::new(500.0, 800.0, 900.0, 950.0));
        let unit = alpha.unit(&id).unwrap();
        assert_eq!((unit.level, unit.experience), (1, 0));
        assert_eq!(unit.position, Some(HexCoord::ORIGIN));
        assert_eq!(activity_kinds(&app), vec![ActivityKind::UnitDeployed]);
    }

    #[test]
    fn unaffordable_deploy_changes_nothing() {
        let mut app = app_with(ResourcePool::new(900.0, 900.0, 100.0, 900.0));
        let err = apply_command(
            app.world_mut(),
            SimCommand::DeployUnit {
                dao: "alpha".into(),
                unit_type: UnitType::Developer,
                position: None,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SimError::InsufficientResources {
                resource: ResourceType::Community,
                ..
            }
        ));
        let alpha = dao(&app, "alpha");
        assert!(alpha.units.is_empty());
        assert_eq!(alpha.resources, ResourcePool::new(900.0, 900.0, 100.0, 900.0));
    }

    #[test]
    fn deploy_off_grid_is_rejected() {
        let mut app = app_with(ResourcePool::uniform(5000.0));
        let err = apply_command(
            app.world_mut(),
            SimCommand::DeployUnit {
                dao: "alpha".into(),
                unit_type: UnitType::Degen,
                position: Some(HexCoord::new(9, -9)),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidReference {
                kind: RefKind::Territory,
                ..
            }
        ));
        assert_eq!(dao(&app, "alpha").resources, ResourcePool::uniform(5000.0));
    }

    #[test]
    fn unknown_dao_is_rejected() {
        let mut app = app_with(ResourcePool::uniform(5000.0));
        let err = apply_command(
            app.world_mut(),
            SimCommand::DeployUnit {
                dao: "ghost".into(),
                unit_type: UnitType::Degen,
                position: None,
            },
        )
        .unwrap_err();
        assert_eq!(err, SimError::invalid_ref(RefKind::Dao, "ghost"));
    }

    #[test]
    fn register_grants_starting_pool_and_rejects_duplicates() {
        let mut app = app_with(ResourcePool::default());
        let register = SimCommand::RegisterDao {
            id: "profile_1".into(),
            name: "Beta".into(),
            leader: "b".into(),
        };
        apply_command(app.world_mut(), register.clone()).unwrap();
        assert_eq!(dao(&app, "profile_1").resources, ResourcePool::uniform(1000.0));

        let err = apply_command(app.world_mut(), register).unwrap_err();
        assert_eq!(err, SimError::invalid_ref(RefKind::Dao, "profile_1"));
    }

    #[test]
    fn protocol_units_are_free_and_unique() {
        let mut app = app_with(ResourcePool::default());
        let add = SimCommand::AddUnit {
            dao: "alpha".into(),
            unit: "character_1".into(),
            unit_type: UnitType::Whale,
        };
        apply_command(app.world_mut(), add.clone()).unwrap();
        assert_eq!(dao(&app, "alpha").units.len(), 1);
        assert_eq!(dao(&app, "alpha").resources, ResourcePool::default());

        let err = apply_command(app.world_mut(), add).unwrap_err();
        assert_eq!(err, SimError::invalid_ref(RefKind::Unit, "character_1"));
    }
}
