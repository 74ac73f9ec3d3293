//! Battle resolution for due attack missions, run in the Battles phase.
//!
//! The outcome is a pure function of the attacker's unit levels and the
//! target's defense level: attacker power is `Σ unit.level * unit_power`,
//! defender power is `defense_level * defense`, and the attacker wins only
//! on a strictly greater total.

use bevy_app::App;
use bevy_ecs::message::{MessageReader, MessageWriter};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::config::EngineConfig;
use crate::ecs::events::{BattleResolved, MissionDue};
use crate::ecs::resources::{Daos, MissionBoard, SimSettings, Territories};
use crate::ecs::schedule::{SimPhase, SimTick};
use crate::model::{
    Dao, DaoId, DaoRegistry, MissionKind, MissionLog, MissionStatus, Territory, TerritoryId,
    TerritoryRegistry, transfer_territory,
};

#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    Captured {
        territory: TerritoryId,
        attacker: DaoId,
        previous_owner: Option<DaoId>,
        attacker_power: u64,
        defender_power: u64,
    },
    Repelled {
        territory: TerritoryId,
        attacker: DaoId,
        attacker_power: u64,
        defender_power: u64,
    },
    /// The attacker already held the target when the mission fell due.
    AlreadyHeld {
        territory: TerritoryId,
        attacker: DaoId,
    },
    /// Attacker or target no longer resolvable; the mission fails.
    Abandoned,
}

pub fn attacker_power(dao: &Dao, unit_power: u32) -> u64 {
    dao.units
        .iter()
        .map(|u| u64::from(u.level) * u64::from(unit_power))
        .sum()
}

pub fn defender_power(territory: &Territory, defense: u32) -> u64 {
    u64::from(territory.defense_level) * u64::from(defense)
}

/// Ties go to the defender.
pub fn assault_succeeds(attacker: u64, defender: u64) -> bool {
    attacker > defender
}

/// Settle one due attack mission in place. Returns `None` if `mission_id`
/// does not name an active attack mission.
pub fn resolve_attack(
    mission_id: &str,
    missions: &mut MissionLog,
    territories: &mut TerritoryRegistry,
    daos: &mut DaoRegistry,
    config: &EngineConfig,
) -> Option<AttackOutcome> {
    let mission = missions.get_mut(mission_id)?;
    if mission.kind != MissionKind::Attack || mission.status != MissionStatus::Active {
        return None;
    }

    let attacker_id = mission.initiator().map(str::to_string);
    let target = mission.target.as_deref().and_then(|t| territories.get(t));
    let attacker = attacker_id.as_deref().and_then(|id| daos.get(id));

    let (attacker, target) = match (attacker, target) {
        (Some(attacker), Some(target)) => (attacker, target),
        _ => {
            mission.status = MissionStatus::Failed;
            if let Some(dao) = attacker_id.as_deref().and_then(|id| daos.get_mut(id)) {
                dao.release_units(mission_id);
            }
            tracing::warn!(mission = mission_id, "attack abandoned: attacker or target missing");
            return Some(AttackOutcome::Abandoned);
        }
    };
    let attacker_id = attacker.id.clone();
    let territory = target.id.clone();

    if target.is_owned_by(&attacker_id) {
        mission.status = MissionStatus::Completed;
        if let Some(dao) = daos.get_mut(&attacker_id) {
            dao.release_units(mission_id);
        }
        return Some(AttackOutcome::AlreadyHeld {
            territory,
            attacker: attacker_id,
        });
    }

    let attack = attacker_power(attacker, config.unit_power_coefficient);
    let defend = defender_power(target, config.defense_coefficient);

    let outcome = if assault_succeeds(attack, defend) {
        mission.status = MissionStatus::Completed;
        let previous_owner =
            transfer_territory(territories, daos, &territory, &attacker_id).flatten();
        if let Some(dao) = daos.get_mut(&attacker_id) {
            dao.level += 1;
            dao.battles_won += 1;
            dao.apply_rewards(&mission.rewards, config.xp_per_level);
        }
        AttackOutcome::Captured {
            territory,
            attacker: attacker_id.clone(),
            previous_owner,
            attacker_power: attack,
            defender_power: defend,
        }
    } else {
        mission.status = MissionStatus::Failed;
        AttackOutcome::Repelled {
            territory,
            attacker: attacker_id.clone(),
            attacker_power: attack,
            defender_power: defend,
        }
    };

    if let Some(dao) = daos.get_mut(&attacker_id) {
        dao.release_units(mission_id);
    }
    Some(outcome)
}

pub fn add_battle_systems(app: &mut App) {
    app.add_systems(SimTick, resolve_battles.in_set(SimPhase::Battles));
}

/// Resolve due attacks in the order they fell due (mission creation order).
pub fn resolve_battles(
    mut due: MessageReader<MissionDue>,
    settings: Res<SimSettings>,
    mut board: ResMut<MissionBoard>,
    mut territories: ResMut<Territories>,
    mut daos: ResMut<Daos>,
    mut resolved: MessageWriter<BattleResolved>,
) {
    for MissionDue { mission } in due.read() {
        let Some(outcome) = resolve_attack(
            mission,
            &mut board.0,
            &mut territories.0,
            &mut daos.0,
            &settings.0,
        ) else {
            continue;
        };
        tracing::debug!(mission = %mission, ?outcome, "attack resolved");
        resolved.write(BattleResolved {
            mission: mission.clone(),
            outcome,
        });
    }
}
