use std::collections::BTreeSet;

use bevy_ecs::resource::Resource;

use crate::config::EngineConfig;
use crate::id::IdGenerator;
use crate::model::{DaoId, MissionId, ResourceType};

/// Engine tunables, read by every system.
#[derive(Resource, Debug, Clone, Default)]
pub struct SimSettings(pub EngineConfig);

/// Shared id counter for DAOs, units and missions created locally.
#[derive(Resource, Default)]
pub struct EcsIdGenerator(pub IdGenerator);

/// Non-attack missions that fell due and await the protocol's
/// `completeRemoteMission`.
///
/// `due` holds missions not yet handed out; `in_flight` holds missions whose
/// settlement call is running. A mission is in at most one of the two.
#[derive(Resource, Debug, Clone, Default)]
pub struct PendingSettlements {
    due: Vec<MissionId>,
    in_flight: BTreeSet<MissionId>,
}

impl PendingSettlements {
    /// Queue a due mission unless it is already queued or in flight.
    pub fn mark_due(&mut self, mission: &str) -> bool {
        if self.in_flight.contains(mission) || self.due.iter().any(|m| m == mission) {
            return false;
        }
        self.due.push(mission.to_string());
        true
    }

    /// Hand every queued mission out for settlement.
    pub fn take_due(&mut self) -> Vec<MissionId> {
        let due = std::mem::take(&mut self.due);
        self.in_flight.extend(due.iter().cloned());
        due
    }

    /// Settlement finished, successfully or not.
    pub fn release(&mut self, mission: &str) {
        self.in_flight.remove(mission);
        self.due.retain(|m| m != mission);
    }

    pub fn is_in_flight(&self, mission: &str) -> bool {
        self.in_flight.contains(mission)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn due_count(&self) -> usize {
        self.due.len()
    }
}

/// Production owed for the current tick, recorded from ownership as it
/// stood at tick start.
#[derive(Resource, Debug, Clone, Default)]
pub struct ProductionSnapshot(pub Vec<(DaoId, ResourceType, f64)>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_missions_are_handed_out_once() {
        let mut pending = PendingSettlements::default();
        assert!(pending.mark_due("mission_1"));
        assert!(!pending.mark_due("mission_1"));
        assert_eq!(pending.take_due(), vec!["mission_1".to_string()]);
        // In flight: the next tick must not queue it again.
        assert!(!pending.mark_due("mission_1"));
        assert!(pending.take_due().is_empty());
    }

    #[test]
    fn released_missions_can_be_queued_again() {
        let mut pending = PendingSettlements::default();
        pending.mark_due("mission_1");
        pending.take_due();
        pending.release("mission_1");
        assert_eq!(pending.in_flight_count(), 0);
        assert!(pending.mark_due("mission_1"));
    }
}
