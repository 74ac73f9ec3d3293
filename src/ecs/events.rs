use bevy_ecs::message::Message;

use crate::model::MissionId;

use super::systems::battle::AttackOutcome;

/// An active attack mission whose duration has elapsed this tick.
#[derive(Message, Clone, Debug)]
pub struct MissionDue {
    pub mission: MissionId,
}

/// Emitted by the battle resolver for every attack it settles.
#[derive(Message, Clone, Debug)]
pub struct BattleResolved {
    pub mission: MissionId,
    pub outcome: AttackOutcome,
}
