use std::fmt;

use serde::{Deserialize, Serialize};

use super::hex::HexCoord;
use super::mission::{MissionReward, RewardKind};
use super::resource::ResourcePool;
use super::{DaoId, MissionId, TerritoryId, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Validator,
    Developer,
    Degen,
    Whale,
}

impl UnitType {
    pub const ALL: [UnitType; 4] = [
        UnitType::Validator,
        UnitType::Developer,
        UnitType::Degen,
        UnitType::Whale,
    ];

    /// Resources debited when a DAO deploys a unit of this type.
    pub fn deployment_cost(self) -> ResourcePool {
        match self {
            UnitType::Validator => ResourcePool::new(500.0, 200.0, 100.0, 50.0),
            UnitType::Developer => ResourcePool::new(300.0, 100.0, 300.0, 100.0),
            UnitType::Degen => ResourcePool::new(200.0, 400.0, 200.0, 50.0),
            UnitType::Whale => ResourcePool::new(800.0, 1000.0, 500.0, 300.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitType::Validator => "validator",
            UnitType::Developer => "developer",
            UnitType::Degen => "degen",
            UnitType::Whale => "whale",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.as_str() == s)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub owner: DaoId,
    pub experience: u32,
    pub level: u32,
    pub current_mission: Option<MissionId>,
    pub position: Option<HexCoord>,
}

impl Unit {
    pub fn new(id: UnitId, unit_type: UnitType, owner: DaoId, position: Option<HexCoord>) -> Self {
        Self {
            id,
            unit_type,
            owner,
            experience: 0,
            level: 1,
            current_mission: None,
            position,
        }
    }

    /// Add experience. Crossing `level * xp_per_level` raises the level by one
    /// and resets experience to zero; the overflow is discarded.
    ///
    /// Returns true if the unit levelled up.
    pub fn gain_experience(&mut self, amount: u32, xp_per_level: u32) -> bool {
        self.experience = self.experience.saturating_add(amount);
        if self.experience >= self.level * xp_per_level {
            self.level += 1;
            self.experience = 0;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dao {
    pub id: DaoId,
    pub name: String,
    pub level: u32,
    /// Back-references to owned territories. Mirrors `Territory::owner`, which
    /// is authoritative; only
    /// [`transfer_territory`](super::state::transfer_territory) edits it.
    pub territories: Vec<TerritoryId>,
    pub units: Vec<Unit>,
    pub resources: ResourcePool,
    pub alliances: Vec<DaoId>,
    pub color: String,
    pub leader: String,
    pub battles_won: u32,
}

impl Dao {
    pub fn new(id: impl Into<DaoId>, name: impl Into<String>, leader: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: 1,
            territories: Vec::new(),
            units: Vec::new(),
            resources: ResourcePool::default(),
            alliances: Vec::new(),
            color: "#3b82f6".to_string(),
            leader: leader.into(),
            battles_won: 0,
        }
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Credit mission rewards: every XP reward goes to each of the DAO's
    /// units, resource rewards go to the pool. Returns the number of
    /// level-ups.
    pub fn apply_rewards(&mut self, rewards: &[MissionReward], xp_per_level: u32) -> usize {
        let mut promoted = 0;
        for reward in rewards {
            match (reward.kind, reward.resource_type) {
                (RewardKind::Xp, _) => {
                    for unit in &mut self.units {
                        if unit.gain_experience(reward.amount, xp_per_level) {
                            promoted += 1;
                        }
                    }
                }
                (RewardKind::Resource, Some(resource)) => {
                    self.resources.add(resource, f64::from(reward.amount));
                }
                (RewardKind::Resource, None) => {}
            }
        }
        promoted
    }

    /// Detach every unit from `mission`.
    pub fn release_units(&mut self, mission: &str) {
        for unit in &mut self.units {
            if unit.current_mission.as_deref() == Some(mission) {
                unit.current_mission = None;
            }
        }
    }
}

/// All DAOs in registration order. DAOs are never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaoRegistry {
    daos: Vec<Dao>,
}

impl DaoRegistry {
    pub fn new(daos: Vec<Dao>) -> Self {
        Self { daos }
    }

    pub fn len(&self) -> usize {
        self.daos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.daos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dao> {
        self.daos.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Dao> {
        self.daos.iter_mut()
    }

    pub fn get(&self, id: &str) -> Option<&Dao> {
        self.daos.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Dao> {
        self.daos.iter_mut().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Insert a DAO. Returns false (and changes nothing) if the id is taken.
    pub fn insert(&mut self, dao: Dao) -> bool {
        if self.contains(&dao.id) {
            return false;
        }
        self.daos.push(dao);
        true
    }

    /// Find a unit anywhere, with its owning DAO.
    pub fn find_unit(&self, unit: &str) -> Option<(&Dao, &Unit)> {
        self.daos
            .iter()
            .find_map(|d| d.unit(unit).map(|u| (d, u)))
    }

    pub fn as_slice(&self) -> &[Dao] {
        &self.daos
    }

    pub fn into_vec(self) -> Vec<Dao> {
        self.daos
    }
}
