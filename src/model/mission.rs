use std::fmt;

use serde::{Deserialize, Serialize};

use super::resource::{ResourcePool, ResourceType};
use super::timestamp::SimTime;
use super::{DaoId, MissionId, TerritoryId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    Attack,
    Defend,
    Harvest,
    Raid,
}

impl MissionKind {
    pub const ALL: [MissionKind; 4] = [
        MissionKind::Attack,
        MissionKind::Defend,
        MissionKind::Harvest,
        MissionKind::Raid,
    ];

    pub fn requires_target(self) -> bool {
        matches!(self, MissionKind::Attack | MissionKind::Defend)
    }

    pub fn forbids_target(self) -> bool {
        self == MissionKind::Harvest
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MissionKind::Attack => "attack",
            MissionKind::Defend => "defend",
            MissionKind::Harvest => "harvest",
            MissionKind::Raid => "raid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for MissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Pending,
    Active,
    Completed,
    Failed,
}

impl MissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MissionStatus::Pending => "pending",
            MissionStatus::Active => "active",
            MissionStatus::Completed => "completed",
            MissionStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [
            MissionStatus::Pending,
            MissionStatus::Active,
            MissionStatus::Completed,
            MissionStatus::Failed,
        ]
        .into_iter()
        .find(|st| st.as_str() == s)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MissionStatus::Completed | MissionStatus::Failed)
    }

    /// Forward-only: pending -> active -> {completed | failed}.
    pub fn can_transition_to(self, next: MissionStatus) -> bool {
        matches!(
            (self, next),
            (MissionStatus::Pending, MissionStatus::Active)
                | (MissionStatus::Active, MissionStatus::Completed)
                | (MissionStatus::Active, MissionStatus::Failed)
        )
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Xp,
    Resource,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionReward {
    pub kind: RewardKind,
    pub amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
}

impl MissionReward {
    pub fn xp(amount: u32) -> Self {
        Self {
            kind: RewardKind::Xp,
            amount,
            resource_type: None,
        }
    }

    pub fn resource(resource: ResourceType, amount: u32) -> Self {
        Self {
            kind: RewardKind::Resource,
            amount,
            resource_type: Some(resource),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub kind: MissionKind,
    /// The first participant is the initiating DAO.
    pub participants: Vec<DaoId>,
    pub target: Option<TerritoryId>,
    pub duration_secs: u64,
    pub rewards: Vec<MissionReward>,
    /// Debited from the initiator when the mission starts.
    #[serde(default)]
    pub cost: ResourcePool,
    pub status: MissionStatus,
    pub start_time: Option<SimTime>,
}

impl Mission {
    pub fn initiator(&self) -> Option<&str> {
        self.participants.first().map(String::as_str)
    }

    /// Active, started, and at least `duration_secs` old at `now`.
    pub fn is_due(&self, now: SimTime) -> bool {
        match (self.status, self.start_time) {
            (MissionStatus::Active, Some(start)) => now.since(start) >= self.duration_secs,
            _ => false,
        }
    }
}

/// Duration and rewards for a mission kind. The start cost comes from
/// `EngineConfig::mission_costs`.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionTemplate {
    pub kind: MissionKind,
    pub duration_secs: u64,
    pub rewards: Vec<MissionReward>,
}

impl MissionTemplate {
    /// The quick-launch mission of each kind: harvests run five minutes and
    /// pay double, everything else runs three; raids pay more XP.
    pub fn quick(kind: MissionKind) -> Self {
        let duration_secs = if kind == MissionKind::Harvest { 300 } else { 180 };
        let xp = if kind == MissionKind::Raid { 150 } else { 100 };
        let payout = if kind == MissionKind::Harvest { 500 } else { 250 };
        Self {
            kind,
            duration_secs,
            rewards: vec![
                MissionReward::xp(xp),
                MissionReward::resource(ResourceType::Computing, payout),
            ],
        }
    }

    /// A five-minute assault paying 100 XP and 1000 computing.
    pub fn battle() -> Self {
        Self {
            kind: MissionKind::Attack,
            duration_secs: 300,
            rewards: vec![
                MissionReward::xp(100),
                MissionReward::resource(ResourceType::Computing, 1000),
            ],
        }
    }
}

/// All missions in creation order; resolution within a tick follows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionLog {
    missions: Vec<Mission>,
}

impl MissionLog {
    pub fn new(missions: Vec<Mission>) -> Self {
        Self { missions }
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mission> {
        self.missions.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Mission> {
        self.missions.iter_mut().find(|m| m.id == id)
    }

    pub fn push(&mut self, mission: Mission) {
        self.missions.push(mission);
    }

    pub fn active(&self) -> impl Iterator<Item = &Mission> {
        self.missions
            .iter()
            .filter(|m| m.status == MissionStatus::Active)
    }

    pub fn as_slice(&self) -> &[Mission] {
        &self.missions
    }

    pub fn into_vec(self) -> Vec<Mission> {
        self.missions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission(status: MissionStatus, start: Option<u64>) -> Mission {
        Mission {
            id: "mission_1".into(),
            kind: MissionKind::Harvest,
            participants: vec!["alpha".into()],
            target: None,
            duration_secs: 60,
            rewards: vec![],
            cost: ResourcePool::default(),
            status,
            start_time: start.map(SimTime::from_secs),
        }
    }

    #[test]
    fn transitions_only_move_forward() {
        use MissionStatus::*;
        assert!(Pending.can_transition_to(Active));
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Failed));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Failed.can_transition_to(Completed));
        assert!(!Active.can_transition_to(Pending));
    }

    #[test]
    fn due_requires_active_and_start_time() {
        let now = SimTime::from_secs(100);
        assert!(mission(MissionStatus::Active, Some(40)).is_due(now));
        assert!(!mission(MissionStatus::Active, Some(41)).is_due(now));
        assert!(!mission(MissionStatus::Active, None).is_due(now));
        assert!(!mission(MissionStatus::Pending, Some(0)).is_due(now));
        assert!(!mission(MissionStatus::Completed, Some(0)).is_due(now));
    }

    #[test]
    fn quick_templates_follow_kind() {
        let harvest = MissionTemplate::quick(MissionKind::Harvest);
        assert_eq!(harvest.duration_secs, 300);
        assert_eq!(harvest.rewards[1].amount, 500);

        let raid = MissionTemplate::quick(MissionKind::Raid);
        assert_eq!(raid.duration_secs, 180);
        assert_eq!(raid.rewards[0], MissionReward::xp(150));
        assert_eq!(raid.rewards[1].amount, 250);
    }

    #[test]
    fn target_rules_per_kind() {
        assert!(MissionKind::Attack.requires_target());
        assert!(MissionKind::Defend.requires_target());
        assert!(!MissionKind::Raid.requires_target());
        assert!(!MissionKind::Raid.forbids_target());
        assert!(MissionKind::Harvest.forbids_target());
    }
}
